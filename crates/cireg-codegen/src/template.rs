//! Minimal placeholder substitution over a typed context
//!
//! Templates use `{{ key }}` placeholders. Each generator supplies a context
//! record implementing [`TemplateContext`]; a key the context does not know
//! is an error rather than an empty string, so a template and its context
//! cannot drift apart unnoticed.

use crate::errors::TemplateError;
use std::borrow::Cow;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Values available to a template
pub trait TemplateContext {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// Render `template`, replacing every placeholder with its context value
pub fn render(template: &str, ctx: &impl TemplateContext) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + template.len() / 4);
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            return Err(TemplateError::Unterminated(offset + start));
        };

        let key = after_open[..end].trim();
        let value = ctx
            .lookup(key)
            .ok_or_else(|| TemplateError::UnknownPlaceholder(key.to_string()))?;
        out.push_str(&value);

        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Escape a value for use inside a single-quoted JavaScript string or a
/// template literal
pub fn escape_js(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '`' => out.push_str("\\`"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for use inside a Markdown table cell
pub fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting {
        name: &'static str,
    }

    impl TemplateContext for Greeting {
        fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
            match key {
                "name" => Some(Cow::Borrowed(self.name)),
                "count" => Some(Cow::Owned(3.to_string())),
                _ => None,
            }
        }
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let ctx = Greeting { name: "kv-cache" };
        let out = render("hello {{name}}, {{ count }} times {{name}}", &ctx);
        assert_eq!(out.as_deref(), Ok("hello kv-cache, 3 times kv-cache"));
    }

    #[test]
    fn test_single_braces_pass_through() {
        let ctx = Greeting { name: "x" };
        let out = render("const o = { a: `${b}` }; }}", &ctx);
        assert_eq!(out.as_deref(), Ok("const o = { a: `${b}` }; }}"));
    }

    #[test]
    fn test_unknown_placeholder_is_error() {
        let ctx = Greeting { name: "x" };
        assert_eq!(
            render("{{name}} {{port}}", &ctx),
            Err(TemplateError::UnknownPlaceholder("port".to_string()))
        );
    }

    #[test]
    fn test_unterminated_placeholder_reports_offset() {
        let ctx = Greeting { name: "x" };
        assert_eq!(
            render("{{name}} and {{oops", &ctx),
            Err(TemplateError::Unterminated(13))
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(escape_js(r"it's a\b"), r"it\'s a\\b");
        assert_eq!(escape_js("`${process.exit()}`"), r"\`\${process.exit()}\`");
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }
}
