use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod sort;
pub mod validate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate JSON data against a schema file.
    Validate(ValidateArgs),
    /// Check a sort parameter against an allow-list.
    Sort(SortArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Validate(args) => validate::run(args, format),
        Command::Sort(args) => sort::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Which preconfigured validation context to use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ContextKind {
    /// JSON pointer paths, no type coercion.
    #[default]
    Body,
    /// `?name` paths, string values coerced to schema types.
    Query,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON).
    pub schema: PathBuf,
    /// Validation context.
    #[arg(long, value_enum, default_value_t = ContextKind::Body)]
    pub context: ContextKind,
    /// Schema id used in output. Default: schema file name without extensions.
    #[arg(long)]
    pub id: Option<String>,
    /// JSON data to validate.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read data from file. Default: stdin.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SortArgs {
    /// Sort parameter, e.g. `a,-b,+c`.
    #[arg(allow_hyphen_values = true)]
    pub candidate: String,
    /// Allowed sort options (comma-separated), e.g. `a,-b,+c`.
    #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
    pub allow: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
