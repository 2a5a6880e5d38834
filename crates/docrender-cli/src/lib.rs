//! # docrender CLI
//!
//! Command-line front end for the document rendering API:
//! - `upload` publishes a shape file and keeps its resources current
//! - `run` renders the data file and downloads the result
//! - `info`, `services` and `delete-service` inspect and clean up the server
//! - `config` reads and writes the layered TOML/env configuration

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::*;
pub use error::*;
