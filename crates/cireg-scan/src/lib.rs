//! Component discovery for the integration registry
//!
//! Walks a fixed set of source directories and infers a manifest skeleton for
//! every component that does not have one yet. Inference is heuristic: the
//! domain comes from the directory's path segments, and inputs/outputs come
//! from substrings of the file names inside it.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod rules;
pub mod scanner;

pub use rules::{
    DomainTable, FilePredicate, InferredIo, IoEffect, IoRule, IoRuleTable, NameContainsAny,
};
pub use scanner::{Candidate, Conflict, ScanReport, Scanner};
