//! Workflow driven by the command line entry point.

pub mod orchestration;

pub use orchestration::{run, run_with_repository, RunArgs, RunReport, ScopeReport};
