//! Per-object-type policy: which fields carry text, which carry raw
//! references, which are structural foreign keys, and how a type is named
//! and linked when referenced.

use std::collections::HashMap;

use crate::field_path::FieldPath;
use crate::model::{EdgeKind, ObjectType};

#[derive(Debug, Clone)]
pub struct StructuralField {
    pub path: FieldPath,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone)]
pub struct TypePolicy {
    /// Text blobs scanned for embedded references and rewritten by the resolvers.
    pub code_fields: Vec<FieldPath>,
    /// Attributes holding a bare identifier, rewritten to the target's name.
    pub reference_fields: Vec<FieldPath>,
    pub structural_fields: Vec<StructuralField>,
    /// Prefix used when a reference to this type is rendered.
    pub sigil: &'static str,
    /// Edge kind for an identifier reference that lands on this type.
    pub edge_kind: EdgeKind,
}

impl TypePolicy {
    fn new(sigil: &'static str, edge_kind: EdgeKind) -> Self {
        TypePolicy {
            code_fields: Vec::new(),
            reference_fields: Vec::new(),
            structural_fields: Vec::new(),
            sigil,
            edge_kind,
        }
    }

    fn code(mut self, paths: &[&str]) -> Self {
        self.code_fields
            .extend(paths.iter().map(|p| FieldPath::parse(p)));
        self
    }

    fn references(mut self, paths: &[&str]) -> Self {
        self.reference_fields
            .extend(paths.iter().map(|p| FieldPath::parse(p)));
        self
    }

    fn structural(mut self, fields: &[(&str, EdgeKind)]) -> Self {
        self.structural_fields
            .extend(fields.iter().map(|(p, kind)| StructuralField {
                path: FieldPath::parse(p),
                kind: *kind,
            }));
        self
    }
}

/// Policy lookup injected into the resolvers, the extractor and the partitioner.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: HashMap<ObjectType, TypePolicy>,
    fallback: TypePolicy,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PolicyTable {
    /// No fields configured; every type renders with `rule!` and links with CALLS.
    pub fn empty() -> Self {
        PolicyTable {
            policies: HashMap::new(),
            fallback: TypePolicy::new("rule!", EdgeKind::Calls),
        }
    }

    pub fn standard() -> Self {
        use EdgeKind::*;
        use ObjectType as T;

        let mut table = Self::empty();

        table.set(
            T::Interface,
            TypePolicy::new("rule!", Calls).code(&["sail_code", "test_inputs[].input_value"]),
        );
        table.set(
            T::ExpressionRule,
            TypePolicy::new("rule!", Calls).code(&[
                "sail_code",
                "definition",
                "test_cases[].test_inputs[].input_value",
                "test_cases[].assertions[].assertion_value",
            ]),
        );
        table.set(
            T::ProcessModel,
            TypePolicy::new("rule!", Calls)
                .code(&[
                    "nodes[].form_expression",
                    "nodes[].gateway_conditions[].condition",
                    "nodes[].inputs[].input_expression",
                    "nodes[].outputs[].output_expression",
                    "nodes[].pre_triggers[].rules[].expression",
                    "nodes[].subprocess_config.input_mappings[].expression",
                    "nodes[].subprocess_config.output_mappings[].save_into",
                    "start_form_expression",
                ])
                .references(&[
                    "nodes[].interface_uuid",
                    "nodes[].subprocess_uuid",
                    "start_form_interface_uuid",
                ])
                .structural(&[
                    ("nodes[].interface_uuid", Calls),
                    ("nodes[].subprocess_uuid", Calls),
                    ("start_form_interface_uuid", Calls),
                ]),
        );
        table.set(
            T::RecordType,
            TypePolicy::new("rule!", UsesRecordType)
                .code(&[
                    "actions[].expressions.TITLE",
                    "actions[].expressions.DESCRIPTION",
                    "actions[].expressions.VISIBILITY",
                    "actions[].expressions.CONTEXT",
                    "views[].visibility_expr",
                    "views[].ui_expr",
                    "views[].view_name",
                ])
                .references(&[
                    "relationships[].target_record_type_uuid",
                    "actions[].target_uuid",
                ])
                .structural(&[
                    ("relationships[].target_record_type_uuid", UsesRecordType),
                    ("actions[].target_uuid", Calls),
                ]),
        );
        table.set(T::WebApi, TypePolicy::new("rule!", Calls).code(&["sail_code"]));
        table.set(
            T::Site,
            TypePolicy::new("rule!", UsesSite)
                .code(&[
                    "pages[].visibility_expr",
                    "display_name",
                    "header_background_color_expr",
                    "selected_tab_background_color_expr",
                    "accent_color_expr",
                    "logo_expr",
                    "favicon_expr",
                    "loading_bar_color_expr",
                ])
                .references(&["pages[].ui_object_uuid"])
                .structural(&[("pages[].ui_object_uuid", Calls)]),
        );
        table.set(
            T::ControlPanel,
            TypePolicy::new("rule!", Calls)
                .code(&["settings_json_raw"])
                .references(&[
                    "primary_record_type_uuid",
                    "interfaces[].interface_uuid",
                    "custom_pages[].interface_uuid",
                ])
                .structural(&[
                    ("primary_record_type_uuid", UsesRecordType),
                    ("interfaces[].interface_uuid", Calls),
                    ("custom_pages[].interface_uuid", Calls),
                ]),
        );
        table.set(
            T::Integration,
            TypePolicy::new("rule!", UsesIntegration)
                .code(&["url", "request_body", "test_inputs[].input_value"])
                .references(&["connected_system_uuid"])
                .structural(&[("connected_system_uuid", UsesConnectedSystem)]),
        );
        table.set(
            T::Group,
            TypePolicy::new("rule!", UsesGroup)
                .references(&["parent_group_uuid", "members[].member_uuid"])
                .structural(&[("parent_group_uuid", UsesGroup)]),
        );
        table.set(
            T::Constant,
            TypePolicy::new("cons!", UsesConstant).references(&["value"]),
        );
        table.set(T::Cdt, TypePolicy::new("type!", UsesCdt));
        table.set(T::DataType, TypePolicy::new("type!", UsesCdt));
        table.set(
            T::ConnectedSystem,
            TypePolicy::new("rule!", UsesConnectedSystem),
        );

        table
    }

    pub fn set(&mut self, object_type: ObjectType, policy: TypePolicy) {
        self.policies.insert(object_type, policy);
    }

    pub fn policy(&self, object_type: &ObjectType) -> &TypePolicy {
        self.policies.get(object_type).unwrap_or(&self.fallback)
    }

    pub fn sigil(&self, object_type: &ObjectType) -> &'static str {
        self.policy(object_type).sigil
    }

    pub fn edge_kind(&self, object_type: &ObjectType) -> EdgeKind {
        self.policy(object_type).edge_kind
    }

    /// Add a text field for a type, creating a fallback-based policy if needed.
    pub fn add_code_field(&mut self, object_type: ObjectType, path: &str) {
        let fallback = self.fallback.clone();
        let policy = self.policies.entry(object_type).or_insert(fallback);
        let path = FieldPath::parse(path);
        if !policy.code_fields.contains(&path) {
            policy.code_fields.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigils_follow_target_type() {
        let table = PolicyTable::standard();
        assert_eq!(table.sigil(&ObjectType::ExpressionRule), "rule!");
        assert_eq!(table.sigil(&ObjectType::Interface), "rule!");
        assert_eq!(table.sigil(&ObjectType::Constant), "cons!");
        assert_eq!(table.sigil(&ObjectType::Cdt), "type!");
        assert_eq!(table.sigil(&ObjectType::DataType), "type!");
        assert_eq!(table.sigil(&ObjectType::RecordType), "rule!");
        assert_eq!(table.sigil(&ObjectType::Other("Widget".into())), "rule!");
    }

    #[test]
    fn edge_kind_defaults_to_calls() {
        let table = PolicyTable::standard();
        assert_eq!(table.edge_kind(&ObjectType::Group), EdgeKind::UsesGroup);
        assert_eq!(table.edge_kind(&ObjectType::Site), EdgeKind::UsesSite);
        assert_eq!(table.edge_kind(&ObjectType::TranslationString), EdgeKind::Calls);
    }

    #[test]
    fn extra_code_fields_extend_unknown_types() {
        let mut table = PolicyTable::standard();
        table.add_code_field(ObjectType::Other("Report".into()), "query_expr");
        table.add_code_field(ObjectType::Other("Report".into()), "query_expr");
        let policy = table.policy(&ObjectType::Other("Report".into()));
        assert_eq!(policy.code_fields.len(), 1);
        assert_eq!(policy.code_fields[0].as_str(), "query_expr");
    }
}
