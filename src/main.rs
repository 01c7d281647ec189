//! jxcat - resolve a Jsonnet import path and write the document to stdout.
//!
//! Resolution uses the full import machinery: the library search path
//! (`-J` flags plus the `JXPATH` environment variable), netpath fetching
//! over HTTPS, and the stdin marker. Useful for checking what an import
//! statement would actually load, and for piping remote documents.

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

use jsonnext::cli::ConfigArgs;

/// Search path environment variable, appended after -J flags.
const PATH_ENV_VAR: &str = "JXPATH";

/// Fetch a Jsonnet document through the import resolver
#[derive(Parser)]
#[command(name = "jxcat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// File to fetch. stdin is used if omitted or "-"
    filename: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.to_config()?;
    let importer = config.importer(Some(PATH_ENV_VAR));

    let spec = cli.filename.as_deref().unwrap_or("-");
    let (contents, _location) = importer.import("", spec)?;

    io::stdout().write_all(contents.as_str().as_bytes())?;
    Ok(())
}
