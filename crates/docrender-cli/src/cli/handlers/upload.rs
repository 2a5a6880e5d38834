//! Upload command

use super::reporter;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{compress_path, json_output, print_success};
use docrender_sdk::Reconciler;
use tracing::debug;

/// Handle the `upload` command - publish the shape and reconcile resources
pub async fn handle_upload(config: &CliConfig, json: bool) -> Result<()> {
    let files = config.document_files();
    debug!("Uploading {}", files.shape_file.display());

    let reporter = reporter(json);
    let report = Reconciler::new(config.client()?, files.clone(), reporter)
        .upload()
        .await?;

    if json {
        json_output(&report)?;
    } else {
        print_success(&format!(
            "Service {} for {} is up to date",
            report.service_id,
            compress_path(&files.shape_file)
        ));
        if !report.uploaded.is_empty() {
            println!("  Uploaded: {}", report.uploaded.join(", "));
        }
        if !report.updated.is_empty() {
            println!("  Updated:  {}", report.updated.join(", "));
        }
        if !report.deleted.is_empty() {
            println!("  Deleted:  {}", report.deleted.join(", "));
        }
    }

    Ok(())
}
