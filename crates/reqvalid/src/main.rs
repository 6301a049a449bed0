mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{LogFormat, LogLevel, LogSettings};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "reqvalid", version, about = "Request validation CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        value_enum,
        default_value_t = LogFormat::default(),
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        value_enum,
        default_value_t = LogLevel::default(),
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    LogSettings {
        format: cli.log_format,
        level: cli.log_level,
    }
    .init();

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::ContextKind;

    #[test]
    fn parses_validate_subcommand() {
        let cli = Cli::try_parse_from([
            "reqvalid",
            "validate",
            "/tmp/query.schema.json",
            "--context",
            "query",
            "--json",
            "{\"sort\":\"a\"}",
        ])
        .expect("validate args should parse");

        match cli.command {
            Command::Validate(args) => assert_eq!(args.context, ContextKind::Query),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_data_args() {
        let err = Cli::try_parse_from([
            "reqvalid",
            "validate",
            "/tmp/query.schema.json",
            "--json",
            "{}",
            "--file",
            "/tmp/data.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_signed_sort_arguments() {
        let cli = Cli::try_parse_from(["reqvalid", "sort", "-b,a", "--allow", "a,-b,+c"])
            .expect("sort args should parse");

        match cli.command {
            Command::Sort(args) => {
                assert_eq!(args.candidate, "-b,a");
                assert_eq!(args.allow, vec!["a", "-b", "+c"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_flags_default_to_quiet_text() {
        let cli = Cli::try_parse_from(["reqvalid", "version"]).expect("version should parse");
        assert_eq!(cli.log_format, LogFormat::default());
        assert_eq!(cli.log_level, LogLevel::Warn);

        let cli = Cli::try_parse_from([
            "reqvalid",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "version",
        ])
        .expect("log flags should parse");
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }
}
