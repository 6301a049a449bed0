use std::fs;
use std::io::Read;
use std::path::Path;

use reqvalid_schema::{RequestValidator, SchemaError};
use serde_json::Value;

use crate::cmd::{ContextKind, ValidateArgs};
use crate::exit::{io_error, schema_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_validation, OutputFormat, ValidateOutput};

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let schema_id = args
        .id
        .clone()
        .unwrap_or_else(|| schema_id_from_path(&args.schema));

    let schema_json = fs::read_to_string(&args.schema).map_err(|err| {
        io_error(&format!("failed reading {}", args.schema.display()), err)
    })?;

    let mut validator = match args.context {
        ContextKind::Body => RequestValidator::body(),
        ContextKind::Query => RequestValidator::query(),
    };
    validator
        .add_schema_json(&schema_id, &schema_json)
        .map_err(|err| match err {
            SchemaError::InvalidJson(_) => {
                CliError::new(USAGE, format!("schema load failed: {err}"))
            }
            other => schema_error("schema load failed", other),
        })?;

    let mut data = resolve_data(&args)?;
    let errors = validator
        .errors(&schema_id, &mut data)
        .map_err(|err| schema_error("validation failed", err))?;

    let errors = errors.unwrap_or_default();
    tracing::info!(
        schema_id = %schema_id,
        context = context_name(args.context),
        errors = errors.len(),
        "validated data"
    );

    let output = ValidateOutput {
        schema_id: &schema_id,
        context: context_name(args.context),
        valid: errors.is_empty(),
        errors: &errors,
        data: &data,
    };
    print_validation(&output, format);

    if errors.is_empty() {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

fn resolve_data(args: &ValidateArgs) -> CliResult<Value> {
    let raw = if let Some(json) = &args.json {
        json.clone()
    } else if let Some(path) = &args.file {
        fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|err| io_error("failed reading stdin", err))?;
        buf
    };

    serde_json::from_str(&raw).map_err(|err| {
        if args.json.is_some() {
            CliError::new(USAGE, format!("--json is not valid JSON: {err}"))
        } else {
            schema_error("data load failed", SchemaError::InvalidJson(err))
        }
    })
}

fn schema_id_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => "schema".to_string(),
    }
}

fn context_name(kind: ContextKind) -> &'static str {
    match kind {
        ContextKind::Body => "body",
        ContextKind::Query => "query",
    }
}
