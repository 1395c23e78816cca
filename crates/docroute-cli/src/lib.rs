//! # docroute-cli — Command-Line Interface
//!
//! ```bash
//! docroute parse-id participant "iso6523-actorid-upis::0088:5798000000001" --factory peppol
//! docroute lookup "s::receiver" "d::invoice"
//! docroute submit message.json
//! docroute submit message.json --dry-run
//! ```
//!
//! `lookup` and `submit` read the same configuration as the API service
//! (`DOCROUTE_*` variables, optionally a YAML file). Reports are printed as
//! JSON on stdout.

pub mod identifier;
pub mod lookup;
pub mod submit;

use std::path::Path;

use anyhow::{Context, Result};
use docroute_pipeline::config::CONFIG_PATH_VAR;
use docroute_pipeline::{Pipeline, PipelineConfig};
use serde::Serialize;

/// Exit code for a command that ran but whose outcome was unsuccessful.
pub const EXIT_UNSUCCESSFUL: u8 = 2;

/// Load pipeline configuration from the environment. `config_file`, when
/// given, takes the place of `DOCROUTE_CONFIG`.
pub fn load_config(config_file: Option<&Path>) -> Result<PipelineConfig> {
    let override_path = config_file.map(|p| p.display().to_string());
    PipelineConfig::load(|key| {
        if key == CONFIG_PATH_VAR && override_path.is_some() {
            return override_path.clone();
        }
        std::env::var(key).ok()
    })
    .context("failed to load pipeline configuration")
}

pub fn build_pipeline(config_file: Option<&Path>) -> Result<Pipeline> {
    let config = load_config(config_file)?;
    Pipeline::from_config(&config).context("failed to build collaborator clients")
}

/// Single-threaded runtime for one command.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
