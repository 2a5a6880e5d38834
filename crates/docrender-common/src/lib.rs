//! Shared infrastructure for docrender binaries

pub mod logging;
