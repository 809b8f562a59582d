//! Unit tests for trellis-core

use serde_json::json;

use crate::catalog::ObjectCatalog;
use crate::error::TrellisError;
use crate::graph::DependencyGraph;
use crate::input::{load_labels, load_objects, parse_objects};
use crate::model::*;
use crate::test_utils::*;

#[test]
fn test_catalog_exact_alias_and_name() {
    let helper_id = prefixed(1, 9, "");
    let objects = vec![
        rule(&helper_id, "Helper", ""),
        rule(&uuid(2), "Other", ""),
    ];
    let catalog = ObjectCatalog::build(&objects);

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(&helper_id).unwrap().name, "Helper");
    assert_eq!(catalog.get(&helper_id.to_uppercase()).unwrap().name, "Helper");
    assert_eq!(catalog.get_base(&format!("{}-suffix", uuid(1))).unwrap().name, "Helper");
    assert_eq!(catalog.get(&uuid(1)).unwrap().name, "Helper");
    assert_eq!(catalog.find_by_name("OTHER").unwrap().id, uuid(2));
    assert!(catalog.get(&uuid(3)).is_none());
}

#[test]
fn test_catalog_canonical_match_across_applications() {
    let objects = vec![rule(&prefixed(1, 77, "_app_one"), "Shared", "")];
    let catalog = ObjectCatalog::build(&objects);

    let foreign = prefixed(1, 77, "_app_two");
    assert!(catalog.get(&foreign).is_none());
    assert_eq!(catalog.get_canonical(&foreign).unwrap().name, "Shared");
    assert_eq!(catalog.resolve_identifier(&foreign).unwrap().name, "Shared");
}

#[test]
fn test_catalog_first_writer_wins_and_records_collision() {
    // Same base UUID exported under two different numeric ids.
    let first = prefixed(5, 1, "");
    let second = prefixed(5, 2, "");
    let objects = vec![rule(&first, "First", ""), rule(&second, "Second", "")];
    let catalog = ObjectCatalog::build(&objects);

    assert_eq!(catalog.get(&uuid(5)).unwrap().name, "First");
    assert_eq!(catalog.get(&second).unwrap().name, "Second");
    assert_eq!(catalog.collisions().len(), 1);
    let collision = &catalog.collisions()[0];
    assert_eq!(collision.key, uuid(5));
    assert_eq!(collision.kept, first);
    assert_eq!(collision.shadowed, second);
}

#[test]
fn test_catalog_exact_id_beats_alias() {
    // The bare id of the second object is the base alias of the first.
    let objects = vec![
        rule(&prefixed(6, 1, ""), "Prefixed", ""),
        rule(&uuid(6), "Bare", ""),
    ];
    let catalog = ObjectCatalog::build(&objects);
    assert_eq!(catalog.get(&uuid(6)).unwrap().name, "Bare");
}

#[test]
fn test_catalog_duplicate_ids_keep_first() {
    let objects = vec![rule(&uuid(1), "One", ""), rule(&uuid(1), "Again", "")];
    let catalog = ObjectCatalog::build(&objects);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(&uuid(1)).unwrap().name, "One");
}

#[test]
fn test_resolve_reference_by_id_then_name() {
    let objects = vec![rule(&uuid(1), "Helper", "")];
    let catalog = ObjectCatalog::build(&objects);
    assert_eq!(catalog.resolve_reference(&uuid(1)).unwrap().name, "Helper");
    assert_eq!(catalog.resolve_reference("helper").unwrap().id, uuid(1));
    assert!(catalog.resolve_reference("").is_none());
}

#[test]
fn test_graph_deduplicates_and_counts() {
    let mut graph = DependencyGraph::new();
    graph.add_edge("a", "b", EdgeKind::Calls);
    graph.add_edge("a", "b", EdgeKind::UsesConstant);
    graph.add_edge("c", "b", EdgeKind::Calls);
    graph.add_edge("b", "d", EdgeKind::UsesCdt);

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.inbound_count("b"), 2);
    assert_eq!(graph.inbound_count("zzz"), 0);
    assert_eq!(graph.edge_kind("a", "b"), Some(EdgeKind::Calls));
    assert_eq!(graph.outgoing("b").collect::<Vec<_>>(), vec!["d"]);
    assert!(graph.outgoing("missing").next().is_none());

    let members = ["a", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(graph.degree_within("b", &members), 1);
}

#[test]
fn test_object_document_shapes() {
    let list = parse_objects(r#"[{"uuid": "x", "name": "X", "type": "Interface"}]"#).unwrap();
    assert_eq!(list[0].id, "x");
    assert_eq!(list[0].object_type, ObjectType::Interface);
    assert_eq!(list[0].attributes, json!({}));

    let wrapped = parse_objects(
        r#"{"objects": [{"id": "y", "name": "Y", "object_type": "Widget", "data": {"k": 1}}]}"#,
    )
    .unwrap();
    assert_eq!(wrapped[0].object_type, ObjectType::Other("Widget".to_string()));
    assert_eq!(wrapped[0].attr("k"), Some(&json!(1)));

    assert!(matches!(parse_objects("{"), Err(TrellisError::Document(_))));
}

#[test]
fn test_load_objects_and_labels_from_disk() {
    let (_dir, paths) = write_files(&[
        ("objects.json", r#"[{"id": "a", "name": "A", "object_type": "Site"}]"#),
        ("one.properties", "lbl_a=Alpha\n"),
        ("two.properties", "lbl_a=Ignored\nlbl_b=Beta\n"),
    ]);
    let objects = load_objects(&paths[0]).unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].object_type, ObjectType::Site);

    let mut label_paths = paths[1..].to_vec();
    label_paths.push(paths[0].with_file_name("missing.properties"));
    let labels = load_labels(&label_paths);
    assert_eq!(labels.get("lbl_a"), Some("Alpha"));
    assert_eq!(labels.get("lbl_b"), Some("Beta"));
}

#[test]
fn test_serialized_names() {
    insta::assert_snapshot!(
        serde_json::to_string(&EdgeKind::UsesConnectedSystem).unwrap(),
        @r#""USES_CONNECTED_SYSTEM""#
    );
    insta::assert_snapshot!(
        serde_json::to_string(&ObjectType::ControlPanel).unwrap(),
        @r#""Control Panel""#
    );
    insta::assert_snapshot!(
        serde_json::to_string(&BundleCategory::WebApi).unwrap(),
        @r#""web_api""#
    );
    assert_eq!(ObjectType::ProcessModel.collection_key(), "processes");
    assert_eq!(ObjectType::ConnectedSystem.collection_key(), "connected_systems");
}
