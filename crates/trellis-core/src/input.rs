//! Loading objects and label tables from disk

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, TrellisError};
use crate::localization::LabelTable;
use crate::model::AppObject;

/// Accepted document shapes: a bare array, or `{"objects": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectDocument {
    List(Vec<AppObject>),
    Wrapped { objects: Vec<AppObject> },
}

pub fn parse_objects(json: &str) -> Result<Vec<AppObject>> {
    let document: ObjectDocument = serde_json::from_str(json)?;
    Ok(match document {
        ObjectDocument::List(objects) => objects,
        ObjectDocument::Wrapped { objects } => objects,
    })
}

pub fn load_objects(path: &Path) -> Result<Vec<AppObject>> {
    let content = std::fs::read_to_string(path).map_err(|e| TrellisError::io(path, e))?;
    let objects = parse_objects(&content)?;
    info!("Loaded {} objects from {}", objects.len(), path.display());
    Ok(objects)
}

/// Merge `.properties` files in order. Unreadable files are skipped with a warning.
pub fn load_labels(paths: &[PathBuf]) -> LabelTable {
    let mut labels = LabelTable::new();
    for path in paths {
        match std::fs::read(path) {
            Ok(bytes) => labels.parse_properties(&String::from_utf8_lossy(&bytes)),
            Err(e) => warn!("Skipping label file {}: {}", path.display(), e),
        }
    }
    if !paths.is_empty() {
        info!("Loaded {} labels from {} files", labels.len(), paths.len());
    }
    labels
}
