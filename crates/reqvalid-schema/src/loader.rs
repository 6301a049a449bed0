use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ValidatorConfig;
use crate::error::{Result, SchemaError};

const SCHEMA_SUFFIX: &str = ".schema.json";

/// Read every `<id>.schema.json` file in `path`.
///
/// Symlinked schema files are refused. File count and size are bounded by the
/// config. Entries are returned sorted by id.
pub(crate) fn read_schema_dir(path: &Path, config: &ValidatorConfig) -> Result<Vec<(String, Value)>> {
    let mut schemas = Vec::new();

    let entries = std::fs::read_dir(path)
        .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

    for entry in entries {
        let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let entry_path = entry.path();

        let Some(schema_id) = schema_id_from_file_name(&file_name) else {
            debug!(file = %file_name, "skipping non-schema file");
            continue;
        };

        let path_metadata = std::fs::symlink_metadata(&entry_path)
            .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
        let file_type = path_metadata.file_type();

        if file_type.is_symlink() {
            return Err(SchemaError::LoadFailed(format!(
                "refusing to load schema symlink: {file_name}"
            )));
        }
        if !file_type.is_file() {
            warn!(file = %file_name, "schema path is not a regular file; skipping");
            continue;
        }

        if schemas.len() >= config.max_schemas_from_directory {
            return Err(SchemaError::LoadFailed(format!(
                "schema count exceeds configured max ({})",
                config.max_schemas_from_directory
            )));
        }

        let content = read_bounded(&entry_path, &file_name, &path_metadata, config)?;
        let schema: Value = serde_json::from_str(&content)
            .map_err(|err| SchemaError::LoadFailed(format!("{file_name}: {err}")))?;

        debug!(schema_id, file = %file_name, "read schema file");
        schemas.push((schema_id.to_string(), schema));
    }

    schemas.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(schemas)
}

fn read_bounded(
    entry_path: &Path,
    file_name: &str,
    path_metadata: &std::fs::Metadata,
    config: &ValidatorConfig,
) -> Result<String> {
    let file = std::fs::File::open(entry_path).map_err(|err| {
        SchemaError::LoadFailed(format!(
            "failed opening schema {}: {err}",
            entry_path.display()
        ))
    })?;
    let opened_metadata = file
        .metadata()
        .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;

    #[cfg(unix)]
    {
        if !same_file_identity(path_metadata, &opened_metadata) {
            return Err(SchemaError::LoadFailed(format!(
                "schema file changed during load: {file_name}"
            )));
        }
    }
    #[cfg(not(unix))]
    let _ = path_metadata;

    let max_bytes = config.max_schema_file_size;
    if opened_metadata.len() > max_bytes as u64 {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large ({} bytes): {file_name}",
            opened_metadata.len()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            SchemaError::LoadFailed(format!(
                "failed reading schema {}: {err}",
                entry_path.display()
            ))
        })?;
    if content.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large while reading: {file_name}"
        )));
    }

    Ok(content)
}

fn schema_id_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(SCHEMA_SUFFIX)
        .filter(|id| !id.is_empty())
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}
