//! Run command

use super::reporter;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{compress_path, json_output, print_info, print_success};
use docrender_sdk::JobRunner;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle the `run` command - render the data file through its service.
///
/// Ctrl-C cancels the run; the current status read still completes.
pub async fn handle_run(config: &CliConfig, json: bool) -> Result<()> {
    let files = config.document_files();
    let policy = config.poll_policy();
    debug!(
        "Running {} with {} attempts every {:?}",
        files.data_file.display(),
        policy.max_attempts,
        policy.interval
    );

    let cancel = CancellationToken::new();
    let runner = JobRunner::new(config.client()?, files, reporter(json))
        .with_policy(policy)
        .run(cancel.clone());
    tokio::pin!(runner);

    let result = tokio::select! {
        result = &mut runner => result,
        Ok(()) = signal::ctrl_c() => {
            print_info("Interrupted, stopping after the current status check");
            cancel.cancel();
            runner.await
        }
    };
    let report = result?;

    if json {
        json_output(&report)?;
    } else {
        print_success(&format!(
            "Rendered {} ({} bytes, {} status checks)",
            compress_path(&report.output),
            report.output_bytes,
            report.polls
        ));
    }

    Ok(())
}
