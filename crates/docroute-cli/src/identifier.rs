//! `docroute parse-id`: parse a URI-encoded identifier and show its parts.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use docroute_core::IdentifierFactory;
use serde::Serialize;

use crate::print_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdKind {
    Participant,
    DocumentType,
    Process,
}

#[derive(Args, Debug)]
pub struct ParseIdArgs {
    /// Which identifier type to parse as.
    pub kind: IdKind,

    /// URI-encoded identifier, `scheme::value`.
    pub raw: String,

    /// Identifier factory: `simple` or `peppol`.
    #[arg(long, default_value = "simple")]
    pub factory: IdentifierFactory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIdentifier {
    pub factory: String,
    pub scheme: String,
    pub value: String,
    pub uri_encoded: String,
}

pub fn parse(args: &ParseIdArgs) -> Result<ParsedIdentifier> {
    let factory = args.factory;
    let (scheme, value, uri_encoded) = match args.kind {
        IdKind::Participant => {
            let id = factory.parse_participant(&args.raw)?;
            (id.scheme().to_string(), id.value().to_string(), id.uri_encoded())
        }
        IdKind::DocumentType => {
            let id = factory.parse_document_type(&args.raw)?;
            (id.scheme().to_string(), id.value().to_string(), id.uri_encoded())
        }
        IdKind::Process => {
            let id = factory.parse_process(&args.raw)?;
            (id.scheme().to_string(), id.value().to_string(), id.uri_encoded())
        }
    };
    Ok(ParsedIdentifier {
        factory: factory.to_string(),
        scheme,
        value,
        uri_encoded,
    })
}

pub fn run_parse_id(args: &ParseIdArgs) -> Result<u8> {
    let parsed = parse(args).with_context(|| format!("cannot parse {:?} identifier", args.kind))?;
    print_json(&parsed)?;
    Ok(0)
}
