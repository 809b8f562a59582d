//! Core data structures for the object catalog and dependency graph

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Object type tag as exported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectType {
    // ── Logic ───────────────────────────────────────────────
    ExpressionRule,
    Interface,
    ProcessModel,
    Constant,

    // ── Data ────────────────────────────────────────────────
    RecordType,
    Cdt,
    DataType,

    // ── Connectivity ────────────────────────────────────────
    Integration,
    ConnectedSystem,
    WebApi,

    // ── Surfaces ────────────────────────────────────────────
    Site,
    ControlPanel,
    Group,

    // ── Localization ────────────────────────────────────────
    TranslationSet,
    TranslationString,

    // ── Fallback ────────────────────────────────────────────
    Other(String),
}

impl ObjectType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Expression Rule" => ObjectType::ExpressionRule,
            "Interface" => ObjectType::Interface,
            "Process Model" => ObjectType::ProcessModel,
            "Constant" => ObjectType::Constant,
            "Record Type" => ObjectType::RecordType,
            "CDT" => ObjectType::Cdt,
            "Data Type" => ObjectType::DataType,
            "Integration" => ObjectType::Integration,
            "Connected System" => ObjectType::ConnectedSystem,
            "Web API" => ObjectType::WebApi,
            "Site" => ObjectType::Site,
            "Control Panel" => ObjectType::ControlPanel,
            "Group" => ObjectType::Group,
            "Translation Set" => ObjectType::TranslationSet,
            "Translation String" => ObjectType::TranslationString,
            other => ObjectType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::ExpressionRule => "Expression Rule",
            ObjectType::Interface => "Interface",
            ObjectType::ProcessModel => "Process Model",
            ObjectType::Constant => "Constant",
            ObjectType::RecordType => "Record Type",
            ObjectType::Cdt => "CDT",
            ObjectType::DataType => "Data Type",
            ObjectType::Integration => "Integration",
            ObjectType::ConnectedSystem => "Connected System",
            ObjectType::WebApi => "Web API",
            ObjectType::Site => "Site",
            ObjectType::ControlPanel => "Control Panel",
            ObjectType::Group => "Group",
            ObjectType::TranslationSet => "Translation Set",
            ObjectType::TranslationString => "Translation String",
            ObjectType::Other(name) => name,
        }
    }

    /// Plural snake_case key used when grouping objects by type.
    pub fn collection_key(&self) -> String {
        match self {
            ObjectType::ExpressionRule => "expression_rules".to_string(),
            ObjectType::ProcessModel => "processes".to_string(),
            ObjectType::Cdt => "cdts".to_string(),
            ObjectType::WebApi => "web_apis".to_string(),
            other => format!("{}s", other.as_str().to_lowercase().replace(' ', "_")),
        }
    }
}

impl From<String> for ObjectType {
    fn from(name: String) -> Self {
        ObjectType::from_name(&name)
    }
}

impl From<ObjectType> for String {
    fn from(object_type: ObjectType) -> Self {
        object_type.as_str().to_string()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted application object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppObject {
    #[serde(alias = "uuid")]
    pub id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub object_type: ObjectType,
    /// Attribute tree; text fields are rewritten in place during resolution.
    #[serde(default = "empty_attributes", alias = "data")]
    pub attributes: Value,
}

fn empty_attributes() -> Value {
    Value::Object(Default::default())
}

impl AppObject {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        object_type: ObjectType,
        attributes: Value,
    ) -> Self {
        AppObject {
            id: id.into(),
            name: name.into(),
            object_type,
            attributes,
        }
    }

    /// Top-level attribute lookup.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Top-level attribute as a non-empty string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Top-level attribute as a list, empty when absent.
    pub fn attr_list(&self, key: &str) -> &[Value] {
        self.attr(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// What kind of dependency an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    Calls,
    UsesConstant,
    UsesCdt,
    UsesRecordType,
    UsesIntegration,
    UsesConnectedSystem,
    UsesGroup,
    UsesSite,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Calls => "CALLS",
            EdgeKind::UsesConstant => "USES_CONSTANT",
            EdgeKind::UsesCdt => "USES_CDT",
            EdgeKind::UsesRecordType => "USES_RECORD_TYPE",
            EdgeKind::UsesIntegration => "USES_INTEGRATION",
            EdgeKind::UsesConnectedSystem => "USES_CONNECTED_SYSTEM",
            EdgeKind::UsesGroup => "USES_GROUP",
            EdgeKind::UsesSite => "USES_SITE",
        }
    }
}

/// A directed, typed dependency between two objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source_id: String,
    pub source_name: String,
    pub source_type: ObjectType,
    pub target_id: String,
    pub target_name: String,
    pub target_type: ObjectType,
    pub kind: EdgeKind,
    /// Field path the reference was found in.
    pub context: String,
    pub resolved: bool,
}

/// Where a discovered entry point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryPointKind {
    #[serde(rename = "Record Type Action")]
    RecordTypeAction,
    #[serde(rename = "Record Type Page")]
    RecordTypePage,
    #[serde(rename = "Site")]
    Site,
    #[serde(rename = "Control Panel")]
    ControlPanel,
    #[serde(rename = "Web API")]
    WebApi,
    #[serde(rename = "Process Model")]
    ProcessModel,
}

/// Bundle category. Variant order matches the serialized names alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleCategory {
    Action,
    Dashboard,
    Page,
    Process,
    Site,
    WebApi,
}

/// Category-specific payload carried by an entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum EntryPointDetail {
    Plain,
    Action { action: Value, record_type_id: String },
    Page { views: Vec<Value> },
}

/// A named root from which one bundle is grown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// May name an object missing from the catalog.
    pub id: String,
    pub name: String,
    pub kind: EntryPointKind,
    pub category: BundleCategory,
    pub parent_name: Option<String>,
    #[serde(flatten)]
    pub detail: EntryPointDetail,
}
