//! Configuration for the cireg registry tooling
//!
//! Settings live in `cireg.toml` at the project root (or wherever
//! `CIREG_CONFIG` points). Every key is optional; unset keys resolve to the
//! registry's conventional layout under the project root.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;

pub use config::{Config, ConfigError, DomainRule, CONFIG_ENV, CONFIG_FILE_NAME};
