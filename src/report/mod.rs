// src/report/mod.rs

//! User-facing output of a run.
//!
//! Diagnostics go through `tracing` to stderr. What the pipeline user reads
//! (remote output, warnings, the exit code, the step output variable) goes
//! through a [`Reporter`], so the controller does not depend on the CI
//! platform.

pub mod actions;

pub use actions::ActionsReporter;

use crate::errors::Result;

pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);

    /// Start a collapsible section. Groups do not nest.
    fn start_group(&self, name: &str);
    fn end_group(&self);

    /// Publish a named step output.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;
}
