//! Loads worker definitions from JSON and YAML files into the registry
//!
//! A file may hold a single definition with an `id`, a list of definitions,
//! or an object with an `agents` list. Definitions name their id with `id` or
//! `agent_id` and their endpoint with `endpoint` or `url`. Files that fail to
//! parse are logged and skipped.

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::worker::{validate_worker_id, WorkerMetadata};
use crate::orchestration::WorkerRegistry;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Option<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Some(Format::Json),
        Some("yaml") | Some("yml") => Some(Format::Yaml),
        _ => None,
    }
}

/// Register every definition found under `dir`, recursively
///
/// Returns the number of workers registered. A missing directory is not an
/// error.
pub fn load_directory(dir: &Path, registry: &WorkerRegistry) -> usize {
    if !dir.is_dir() {
        warn!("Definitions directory {} does not exist.", dir.display());
        return 0;
    }

    let mut files = Vec::new();
    collect_files(dir, &mut files);
    files.sort();

    let mut loaded = 0;
    for path in files {
        match load_file(&path, registry) {
            Ok(count) => loaded += count,
            Err(e) => error!("{}", e),
        }
    }

    info!("Loaded {} worker definitions from {}", loaded, dir.display());
    loaded
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to read directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files);
        } else if format_of(&path).is_some() {
            files.push(path);
        }
    }
}

/// Register the definitions in one file
pub fn load_file(path: &Path, registry: &WorkerRegistry) -> Result<usize, DefinitionError> {
    let Some(format) = format_of(path) else {
        return Ok(0);
    };

    let raw = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value = match format {
        Format::Json => serde_json::from_str(&raw).map_err(|source| DefinitionError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Format::Yaml => serde_yaml::from_str(&raw).map_err(|source| DefinitionError::Yaml {
            path: path.to_path_buf(),
            source,
        })?,
    };

    Ok(register_document(document, path, registry))
}

fn definitions_in(document: Value) -> Vec<Value> {
    match document {
        Value::Object(mut map) if map.contains_key("agents") => match map.remove("agents") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Object(map) if map.contains_key("id") => vec![Value::Object(map)],
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

fn register_document(document: Value, path: &Path, registry: &WorkerRegistry) -> usize {
    let mut registered = 0;

    for definition in definitions_in(document) {
        let id = definition
            .get("id")
            .or_else(|| definition.get("agent_id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let Some(id) = id else {
            warn!("Worker definition in {} missing 'id' field", path.display());
            continue;
        };

        if let Err(e) = validate_worker_id(&id) {
            warn!("Skipping worker definition in {}: {}", path.display(), e);
            continue;
        }

        match serde_json::from_value::<WorkerMetadata>(definition) {
            Ok(metadata) => {
                registry.register(id, metadata);
                registered += 1;
            }
            Err(e) => warn!("Invalid worker definition {} in {}: {}", id, path.display(), e),
        }
    }

    registered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_all_supported_layouts_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("marketing");
        fs::create_dir(&nested).unwrap();

        fs::write(
            dir.path().join("single.json"),
            r#"{"id": "seo_agent_001", "name": "SEO", "url": "http://seo:5001", "category": "Marketing"}"#,
        )
        .unwrap();
        fs::write(
            nested.join("bundle.yaml"),
            "agents:\n  - agent_id: copywriter\n    endpoint: http://copy:5002\n    capabilities: [text_generation]\n  - id: editor\n",
        )
        .unwrap();
        fs::write(
            nested.join("list.yml"),
            "- id: scorer\n  category: Sales\n",
        )
        .unwrap();
        fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let registry = WorkerRegistry::new();
        assert_eq!(load_directory(dir.path(), &registry), 4);

        assert_eq!(registry.resolve("seo_agent_001").unwrap(), "http://seo:5001");
        assert_eq!(registry.resolve("copywriter").unwrap(), "http://copy:5002");
        assert!(registry.get("copywriter").unwrap().capabilities.contains("text_generation"));
        assert_eq!(registry.get("scorer").unwrap().category.as_deref(), Some("Sales"));
        assert!(registry.contains("editor"));
    }

    #[test]
    fn broken_files_and_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        fs::write(
            dir.path().join("mixed.json"),
            r#"[{"name": "no id"}, {"id": "has space"}, {"id": "ok"}]"#,
        )
        .unwrap();

        let registry = WorkerRegistry::new();
        assert_eq!(load_directory(dir.path(), &registry), 1);
        assert!(registry.contains("ok"));

        let error = load_file(&dir.path().join("bad.json"), &registry).unwrap_err();
        assert!(matches!(error, DefinitionError::Json { .. }));
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let registry = WorkerRegistry::new();
        assert_eq!(load_directory(Path::new("/definitely/not/here"), &registry), 0);
        assert!(registry.is_empty());
    }
}
