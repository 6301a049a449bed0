use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use reqvalid_schema::{Direction, SortKey, ValidationError};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
pub struct ValidateOutput<'a> {
    pub schema_id: &'a str,
    pub context: &'a str,
    pub valid: bool,
    pub errors: &'a [ValidationError],
    pub data: &'a Value,
}

#[derive(Serialize)]
struct SortKeyOutput<'a> {
    field: &'a str,
    direction: &'static str,
}

#[derive(Serialize)]
pub struct SortOutput<'a> {
    candidate: &'a str,
    valid: bool,
    keys: Vec<SortKeyOutput<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

impl<'a> SortOutput<'a> {
    pub fn new(candidate: &'a str, result: &'a Result<Vec<SortKey>, &'static str>) -> Self {
        match result {
            Ok(keys) => Self {
                candidate,
                valid: true,
                keys: keys
                    .iter()
                    .map(|key| SortKeyOutput {
                        field: &key.field,
                        direction: direction_name(key.direction),
                    })
                    .collect(),
                error: None,
            },
            Err(message) => Self {
                candidate,
                valid: false,
                keys: Vec::new(),
                error: Some(*message),
            },
        }
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Ascending => "asc",
        Direction::Descending => "desc",
    }
}

pub fn print_validation(output: &ValidateOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            if output.valid {
                println!("{}: valid", output.schema_id);
                return;
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CODE", "PATH", "MESSAGE"]);
            for err in output.errors {
                table.add_row(vec![
                    err.code.clone(),
                    display_path(&err.path).to_string(),
                    err.message.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if output.valid {
                println!(
                    "schema={} context={} valid data={}",
                    output.schema_id, output.context, output.data
                );
                return;
            }
            for err in output.errors {
                println!(
                    "code={} path={} message={}",
                    err.code,
                    display_path(&err.path),
                    err.message
                );
            }
        }
    }
}

pub fn print_sort(output: &SortOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            if let Some(error) = output.error {
                println!("{}: {error}", output.candidate);
                return;
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "FIELD", "DIRECTION"]);
            for (i, key) in output.keys.iter().enumerate() {
                table.add_row(vec![
                    (i + 1).to_string(),
                    key.field.to_string(),
                    key.direction.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => match output.error {
            Some(error) => println!("candidate={} error={error}", output.candidate),
            None => {
                let keys: Vec<String> = output
                    .keys
                    .iter()
                    .map(|key| format!("{}:{}", key.field, key.direction))
                    .collect();
                println!("candidate={} keys={}", output.candidate, keys.join(","));
            }
        },
    }
}

fn print_json<T: Serialize>(output: &T) {
    println!(
        "{}",
        serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
    );
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}
