//! cireg library - command handlers exposed for testing
//!
//! The binary in `main.rs` parses arguments and dispatches to the handlers in
//! [`commands`]; every handler returns `Result<Outcome, CliError>`.

pub mod commands;
pub mod common;
pub mod errors;
pub mod project;

pub use cireg_logger as logger;
pub use common::{GlobalOpts, Outcome};
pub use errors::CliError;
pub use project::Project;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the `tracing` subscriber for library diagnostics
///
/// `RUST_LOG` wins; otherwise the level follows the logger verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logger::verbosity_to_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
