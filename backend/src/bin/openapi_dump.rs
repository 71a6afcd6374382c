//! Print the OpenAPI document as JSON or YAML.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]

use std::io::{self, Write};

use clap::{Parser, ValueEnum};
use parking_backend::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

/// Dump the REST API's OpenAPI document to stdout.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about)]
struct Args {
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn render(format: Format) -> io::Result<String> {
    let doc = ApiDoc::openapi();
    match format {
        Format::Json => doc.to_pretty_json().map_err(io::Error::other),
        Format::Yaml => doc.to_yaml().map_err(io::Error::other),
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let rendered = render(args.format)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")
}
