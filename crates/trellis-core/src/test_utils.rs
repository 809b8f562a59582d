//! Test utilities for Trellis core

use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::model::{AppObject, ObjectType};

/// Deterministic standard UUID for fixture `n`.
pub fn uuid(n: u32) -> String {
    format!("{n:08x}-0000-4000-8000-{n:012x}")
}

/// Prefixed form of [`uuid`] with a numeric id and application suffix.
pub fn prefixed(n: u32, numeric: u32, app: &str) -> String {
    format!("_a-{}_{numeric}{app}", uuid(n))
}

pub fn object(id: &str, name: &str, object_type: ObjectType, attributes: Value) -> AppObject {
    AppObject::new(id, name, object_type, attributes)
}

pub fn rule(id: &str, name: &str, sail_code: &str) -> AppObject {
    object(id, name, ObjectType::ExpressionRule, json!({ "sail_code": sail_code }))
}

/// Write files into a fresh temporary directory.
pub fn write_files(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
    let dir = TempDir::new().unwrap();
    let paths = files
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            fs::write(&path, content).unwrap();
            path
        })
        .collect();
    (dir, paths)
}
