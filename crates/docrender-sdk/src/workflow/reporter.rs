//! Progress reporting port
//!
//! Workflows emit one human-readable line per milestone. The CLI renders
//! them on the terminal; library users get them as tracing events.

use tracing::{info, warn};

/// Sink for line-oriented workflow status messages
pub trait ProgressReporter: Send + Sync {
    /// A step is being taken or an observation was made
    fn step(&self, message: &str);

    /// A milestone completed
    fn success(&self, message: &str);

    /// Something went wrong
    fn warn(&self, message: &str);
}

/// Forwards status lines to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn step(&self, message: &str) {
        info!("{}", message);
    }

    fn success(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}
