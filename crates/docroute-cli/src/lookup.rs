//! `docroute lookup`: standalone directory lookup.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::{build_pipeline, print_json, runtime, EXIT_UNSUCCESSFUL};

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Receiver participant, URI-encoded.
    pub participant: String,

    /// Document type, URI-encoded.
    pub document_type: String,
}

/// Print the lookup report. Exits 2 when the directory has no entry or the
/// lookup failed.
pub fn run_lookup(args: &LookupArgs, config_file: Option<&Path>) -> Result<u8> {
    let pipeline = build_pipeline(config_file)?;
    let report = runtime()?.block_on(pipeline.lookup(&args.participant, &args.document_type))?;
    print_json(&report)?;
    Ok(if report.success { 0 } else { EXIT_UNSUCCESSFUL })
}
