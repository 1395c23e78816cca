//! `docroute submit`: run an outgoing-message document through the pipeline.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use docroute_pipeline::{OutgoingMessage, Pipeline, PreparedSubmission};
use serde::Serialize;

use crate::{build_pipeline, print_json, runtime, EXIT_UNSUCCESSFUL};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Outgoing-message JSON file, or `-` for stdin.
    pub file: PathBuf,

    /// Only run the pre-flight checks; contact no collaborator.
    #[arg(long)]
    pub dry_run: bool,
}

/// Pre-flight summary printed by `--dry-run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunSummary {
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(rename = "documentTypeID")]
    pub document_type_id: String,
    #[serde(rename = "processID")]
    pub process_id: String,
    pub transport_profile: String,
    /// Content IDs in payload order; the first is the validated payload.
    pub content_ids: Vec<String>,
}

/// Read and parse an outgoing-message document.
pub fn read_submission(path: &Path) -> Result<OutgoingMessage> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read submission from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).with_context(|| format!("{} is not an outgoing message", path.display()))
}

pub fn dry_run(pipeline: &Pipeline, submission: &OutgoingMessage) -> Result<DryRunSummary> {
    let PreparedSubmission { input, message } = pipeline.prepare(submission)?;
    Ok(DryRunSummary {
        sender_id: input.sender().uri_encoded(),
        receiver_id: input.receiver().uri_encoded(),
        document_type_id: input.document_type().uri_encoded(),
        process_id: input.process().uri_encoded(),
        transport_profile: input.transport_profile().to_string(),
        content_ids: message
            .payloads()
            .iter()
            .map(|p| p.content_id().to_string())
            .collect(),
    })
}

/// Print the submission report. Exits 2 when the message was not sent.
pub fn run_submit(args: &SubmitArgs, config_file: Option<&Path>) -> Result<u8> {
    let submission = read_submission(&args.file)?;
    let pipeline = build_pipeline(config_file)?;

    if args.dry_run {
        print_json(&dry_run(&pipeline, &submission)?)?;
        return Ok(0);
    }

    let report = runtime()?.block_on(pipeline.submit(&submission))?;
    print_json(&report)?;
    Ok(if report.success { 0 } else { EXIT_UNSUCCESSFUL })
}
