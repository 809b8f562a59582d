//! Engine configuration, loadable from TOML

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrellisError};
use crate::model::ObjectType;
use crate::policy::PolicyTable;

pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_HUB_THRESHOLD: usize = 20;
pub const DEFAULT_TRANSLATION_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub locale: String,
    /// Inbound edge count at which a hub-type object stops being expanded.
    pub hub_threshold: usize,
    pub stop_types: Vec<ObjectType>,
    pub hub_types: Vec<ObjectType>,
    pub translation_max_len: usize,
    pub resolve_reference_fields: bool,
    /// Object type name → additional text field paths.
    pub extra_code_fields: BTreeMap<String, Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            locale: DEFAULT_LOCALE.to_string(),
            hub_threshold: DEFAULT_HUB_THRESHOLD,
            stop_types: vec![ObjectType::RecordType],
            hub_types: vec![ObjectType::ExpressionRule],
            translation_max_len: DEFAULT_TRANSLATION_MAX_LEN,
            resolve_reference_fields: true,
            extra_code_fields: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TrellisError::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Standard policies plus any configured extra text fields.
    pub fn policy_table(&self) -> PolicyTable {
        let mut table = PolicyTable::standard();
        for (type_name, paths) in &self.extra_code_fields {
            for path in paths {
                table.add_code_field(ObjectType::from_name(type_name), path);
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.hub_threshold, 20);
        assert_eq!(config.stop_types, vec![ObjectType::RecordType]);
    }

    #[test]
    fn overrides_and_extra_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
locale = "es-MX"
hub_threshold = 5
stop_types = ["Record Type", "CDT"]

[extra_code_fields]
"Web API" = ["response_expr"]
"#,
        )
        .unwrap();
        assert_eq!(config.locale, "es-MX");
        assert_eq!(config.hub_threshold, 5);
        assert_eq!(config.stop_types, vec![ObjectType::RecordType, ObjectType::Cdt]);
        assert_eq!(config.hub_types, vec![ObjectType::ExpressionRule]);

        let table = config.policy_table();
        let fields: Vec<&str> = table
            .policy(&ObjectType::WebApi)
            .code_fields
            .iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(fields, vec!["sail_code", "response_expr"]);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("hub_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, TrellisError::Config(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let err = EngineConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
