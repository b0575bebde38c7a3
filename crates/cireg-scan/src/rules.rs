//! Heuristic rule tables used to infer a manifest skeleton
//!
//! Both tables are ordered lists of rules, so the heuristics can be tested on
//! their own and replaced without touching the scanner.

use cireg_config::DomainRule;
use cireg_manifest::{DEFAULT_DOMAIN, PLACEHOLDER_INPUT, PLACEHOLDER_OUTPUT};

const DEFAULT_DOMAIN_RULES: &[(&str, &str)] = &[
    ("mobile", "mobile"),
    ("mcp", "mcp"),
    ("ai", "ai-orchestration"),
    ("funding", "funding"),
    ("metrics", "observability"),
    ("security", "security"),
    ("scripts", "infrastructure"),
    ("src", "frontend"),
    ("app", "backend"),
    ("data", "data"),
];

// =============================================================================
// DOMAIN TABLE
// =============================================================================

/// Ordered path-segment to domain lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTable {
    rules: Vec<(String, String)>,
}

impl Default for DomainTable {
    fn default() -> Self {
        DomainTable::new(DEFAULT_DOMAIN_RULES.iter().copied())
    }
}

impl DomainTable {
    pub fn new<S: Into<String>>(rules: impl IntoIterator<Item = (S, S)>) -> Self {
        DomainTable {
            rules: rules
                .into_iter()
                .map(|(segment, domain)| (segment.into(), domain.into()))
                .collect(),
        }
    }

    /// Configured rules, or the built-in table when none are configured
    pub fn from_config(rules: &[DomainRule]) -> Self {
        if rules.is_empty() {
            return DomainTable::default();
        }
        DomainTable::new(
            rules
                .iter()
                .map(|r| (r.segment.clone(), r.domain.clone())),
        )
    }

    fn lookup(&self, segment: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(s, _)| s == segment)
            .map(|(_, domain)| domain.as_str())
    }

    /// Domain of the first path segment that has a rule, else `infrastructure`
    pub fn classify<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> &str {
        segments
            .into_iter()
            .find_map(|segment| self.lookup(segment))
            .unwrap_or(DEFAULT_DOMAIN)
    }
}

// =============================================================================
// I/O RULES
// =============================================================================

/// Test over the file names found in a component directory
pub trait FilePredicate: Send + Sync {
    fn matches(&self, file_names: &[String]) -> bool;
}

impl<F> FilePredicate for F
where
    F: Fn(&[String]) -> bool + Send + Sync,
{
    fn matches(&self, file_names: &[String]) -> bool {
        self(file_names)
    }
}

/// Matches when any file name contains any of the substrings
#[derive(Debug, Clone)]
pub struct NameContainsAny(pub Vec<String>);

impl NameContainsAny {
    pub fn new(needles: &[&str]) -> Self {
        NameContainsAny(needles.iter().map(|n| (*n).to_string()).collect())
    }
}

impl FilePredicate for NameContainsAny {
    fn matches(&self, file_names: &[String]) -> bool {
        file_names
            .iter()
            .any(|name| self.0.iter().any(|needle| name.contains(needle.as_str())))
    }
}

/// Tags contributed when a rule matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoEffect {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl IoEffect {
    pub fn new(inputs: &[&str], outputs: &[&str]) -> Self {
        IoEffect {
            inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
            outputs: outputs.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

pub struct IoRule {
    pub predicate: Box<dyn FilePredicate>,
    pub effect: IoEffect,
}

impl IoRule {
    pub fn new(predicate: impl FilePredicate + 'static, effect: IoEffect) -> Self {
        IoRule {
            predicate: Box::new(predicate),
            effect,
        }
    }
}

impl std::fmt::Debug for IoRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoRule")
            .field("effect", &self.effect)
            .finish_non_exhaustive()
    }
}

/// Inferred interface tags for one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredIo {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Ordered list of I/O rules; every matching rule contributes
#[derive(Debug)]
pub struct IoRuleTable {
    rules: Vec<IoRule>,
}

impl Default for IoRuleTable {
    fn default() -> Self {
        IoRuleTable {
            rules: vec![
                IoRule::new(
                    NameContainsAny::new(&["api", "server"]),
                    IoEffect::new(&["http_requests"], &["api_responses"]),
                ),
                IoRule::new(
                    NameContainsAny::new(&["dashboard", "ui"]),
                    IoEffect::new(&[], &["ui_components"]),
                ),
                IoRule::new(
                    NameContainsAny::new(&["worker", "processor"]),
                    IoEffect::new(&["task_queue"], &["processed_data"]),
                ),
                IoRule::new(
                    NameContainsAny::new(&["test"]),
                    IoEffect::new(&["test_data"], &["test_results"]),
                ),
            ],
        }
    }
}

impl IoRuleTable {
    pub fn empty() -> Self {
        IoRuleTable { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: IoRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Accumulate the effects of every matching rule
    ///
    /// Falls back to `["configuration"]` / `["logs"]` for whichever side
    /// stays empty.
    pub fn infer(&self, file_names: &[String]) -> InferredIo {
        let mut inputs: Vec<String> = Vec::new();
        let mut outputs: Vec<String> = Vec::new();

        for rule in self.rules.iter().filter(|r| r.predicate.matches(file_names)) {
            extend_unique(&mut inputs, &rule.effect.inputs);
            extend_unique(&mut outputs, &rule.effect.outputs);
        }

        if inputs.is_empty() {
            inputs.push(PLACEHOLDER_INPUT.to_string());
        }
        if outputs.is_empty() {
            outputs.push(PLACEHOLDER_OUTPUT.to_string());
        }
        InferredIo { inputs, outputs }
    }
}

fn extend_unique(target: &mut Vec<String>, tags: &[String]) {
    for tag in tags {
        if !target.contains(tag) {
            target.push(tag.clone());
        }
    }
}
