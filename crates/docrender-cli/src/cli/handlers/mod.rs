//! Command handlers for the docrender CLI

pub mod config;
pub mod info;
pub mod run;
pub mod services;
pub mod upload;

use crate::output::TerminalReporter;
use docrender_sdk::ProgressReporter;
use std::sync::Arc;

/// Progress sink for a workflow command; quiet when stdout carries JSON
pub(crate) fn reporter(json: bool) -> Arc<dyn ProgressReporter> {
    if json {
        Arc::new(TerminalReporter::quiet())
    } else {
        Arc::new(TerminalReporter::new())
    }
}
