use pathgraph::{
    Attr, Cardinality, Endpoint, Namespace, ReportPolicy, ValidationError, ValidatorConfig,
    validate, validate_all, validate_with,
};
use serde_json::{Value, json};

fn resource(name: &str) -> Attr {
    let text = match name {
        "minimal" => include_str!("resource/minimal.json"),
        "valid" => include_str!("resource/valid.json"),
        "duplicate-id" => include_str!("resource/duplicate-id.json"),
        "empty-nodes" => include_str!("resource/empty-nodes.json"),
        "unknown-node" => include_str!("resource/unknown-node.json"),
        "negative-cost" => include_str!("resource/negative-cost.json"),
        "malformed-edge" => include_str!("resource/malformed-edge.json"),
        other => panic!("unknown resource {other}"),
    };
    serde_json::from_str(text).expect("resource parses")
}

fn graph(nodes: Value, edges: Value) -> Attr {
    Attr::from_json(&json!({
        "graph": { "id": "g", "name": "test", "nodes": nodes, "edges": edges }
    }))
}

fn edge(id: &str, from: &str, to: &str) -> Value {
    json!({ "id": id, "from": from, "to": to })
}

#[test]
fn accepts_minimal_document() {
    assert_eq!(validate(&resource("minimal")), Ok(()));
}

#[test]
fn accepts_typical_document() {
    assert_eq!(validate(&resource("valid")), Ok(()));
}

#[test]
fn rejects_duplicated_node_ids() {
    assert_eq!(
        validate(&resource("duplicate-id")),
        Err(ValidationError::duplicate(Namespace::Node, "a"))
    );
}

#[test]
fn rejects_empty_nodes_list() {
    assert_eq!(
        validate(&resource("empty-nodes")),
        Err(ValidationError::cardinality(
            "node",
            Cardinality::AtLeast(1),
            0
        ))
    );
}

#[test]
fn rejects_undeclared_nodes_in_edges() {
    assert_eq!(
        validate(&resource("unknown-node")),
        Err(ValidationError::undeclared("z", "e2", Endpoint::To))
    );
}

#[test]
fn rejects_negative_cost() {
    assert_eq!(
        validate(&resource("negative-cost")),
        Err(ValidationError::invalid_numeric("-1.5"))
    );
}

#[test]
fn rejects_malformed_edge() {
    assert_eq!(
        validate(&resource("malformed-edge")),
        Err(ValidationError::missing("to"))
    );
}

#[test]
fn missing_graph_root() {
    let doc = Attr::from_json(&json!({ "network": {} }));
    assert_eq!(validate(&doc), Err(ValidationError::missing("graph")));
    assert_eq!(
        validate(&Attr::from_json(&Value::Null)),
        Err(ValidationError::missing("graph"))
    );
}

#[test]
fn graph_root_needs_exactly_one_id_and_name() {
    let doc = Attr::from_json(&json!({
        "graph": { "id": ["g1", "g2"], "name": "n", "nodes": { "node": { "id": "a" } }, "edges": null }
    }));
    assert_eq!(
        validate(&doc),
        Err(ValidationError::cardinality("id", Cardinality::Exactly(1), 2))
    );

    let doc = Attr::from_json(&json!({
        "graph": { "id": "g1", "nodes": { "node": { "id": "a" } }, "edges": null }
    }));
    assert_eq!(
        validate(&doc),
        Err(ValidationError::cardinality("name", Cardinality::Exactly(1), 0))
    );
}

#[test]
fn edges_collection_must_be_present() {
    let doc = Attr::from_json(&json!({
        "graph": { "id": "g", "name": "n", "nodes": { "node": { "id": "a" } } }
    }));
    assert_eq!(validate(&doc), Err(ValidationError::missing("edges")));
}

#[test]
fn zero_nodes_is_a_cardinality_violation() {
    for nodes in [json!(null), json!(""), json!({ "node": [] }), json!({})] {
        let err = validate(&graph(nodes.clone(), json!(null))).unwrap_err();
        assert!(
            matches!(err, ValidationError::CardinalityViolation { .. }),
            "{nodes} gave {err}"
        );
    }
}

#[test]
fn single_node_without_edges_passes() {
    assert!(validate(&graph(json!({ "node": { "id": "a" } }), json!(null))).is_ok());
    assert!(validate(&graph(json!({ "node": { "id": "a" } }), json!({ "edge": [] }))).is_ok());
}

#[test]
fn node_without_id() {
    let doc = graph(json!({ "node": [{ "id": "a" }, { "name": "b" }] }), json!(null));
    assert_eq!(validate(&doc), Err(ValidationError::missing("id")));
}

#[test]
fn duplicate_edge_ids() {
    let doc = graph(
        json!({ "node": [{ "id": "a" }, { "id": "b" }] }),
        json!({ "edge": [edge("e1", "a", "b"), edge("e1", "b", "a")] }),
    );
    assert_eq!(
        validate(&doc),
        Err(ValidationError::duplicate(Namespace::Edge, "e1"))
    );
}

#[test]
fn node_and_edge_ids_do_not_collide() {
    let doc = graph(
        json!({ "node": [{ "id": "a" }, { "id": "b" }] }),
        json!({ "edge": edge("a", "a", "b") }),
    );
    assert_eq!(validate(&doc), Ok(()));
}

#[test]
fn undeclared_from_is_reported() {
    let doc = graph(
        json!({ "node": { "id": "a" } }),
        json!({ "edge": edge("e1", "x", "a") }),
    );
    assert_eq!(
        validate(&doc),
        Err(ValidationError::undeclared("x", "e1", Endpoint::From))
    );
}

#[test]
fn edges_may_reference_nodes_declared_anywhere() {
    let doc = Attr::from_json(&json!({
        "graph": {
            "edges": { "edge": edge("e1", "b", "a") },
            "id": "g",
            "name": "n",
            "nodes": { "node": [{ "id": "a" }, { "id": "b" }] },
        }
    }));
    assert_eq!(validate(&doc), Ok(()));
}

#[test]
fn cost_checks() {
    let with_cost = |cost: Value| {
        graph(
            json!({ "node": [{ "id": "a" }, { "id": "b" }] }),
            json!({ "edge": { "id": "e1", "from": "a", "to": "b", "cost": cost } }),
        )
    };
    assert!(validate(&with_cost(json!("12.5"))).is_ok());
    assert!(validate(&with_cost(json!(0))).is_ok());
    assert!(validate(&with_cost(json!(""))).is_ok());
    assert!(validate(&with_cost(json!(null))).is_ok());
    for bad in [json!("-3"), json!("cheap"), json!(-1)] {
        assert!(matches!(
            validate(&with_cost(bad)),
            Err(ValidationError::InvalidNumeric { .. })
        ));
    }
    assert_eq!(
        validate(&with_cost(json!(["1", "2"]))),
        Err(ValidationError::cardinality("cost", Cardinality::AtMost(1), 2))
    );
}

#[test]
fn nested_id_is_not_a_scalar() {
    let doc = graph(json!({ "node": { "id": { "value": "a" } } }), json!(null));
    assert_eq!(validate(&doc), Err(ValidationError::malformed_value("id")));
}

#[test]
fn error_messages_name_the_offender() {
    let err = validate(&resource("unknown-node")).unwrap_err();
    assert_eq!(err.to_string(), "undeclared identifier z in to of edge e2");
    let err = validate(&resource("empty-nodes")).unwrap_err();
    assert_eq!(err.to_string(), "expected at least 1 but was 0: node");
}

#[test]
fn validation_does_not_touch_the_document() {
    let doc = resource("valid");
    let before = doc.clone();
    validate(&doc).unwrap();
    validate(&doc).unwrap();
    assert_eq!(doc, before);
}

#[test]
fn collect_all_reports_every_item_violation() {
    let doc = graph(
        json!({ "node": [{ "id": "a" }, { "id": "a" }, { "id": "b" }] }),
        json!({ "edge": [
            edge("e1", "a", "z"),
            { "id": "e2", "from": "a", "to": "b", "cost": "-4" },
            edge("e3", "a", "b"),
        ] }),
    );
    let report = validate_all(&doc);
    assert_eq!(
        report.violations,
        vec![
            ValidationError::duplicate(Namespace::Node, "a"),
            ValidationError::undeclared("z", "e1", Endpoint::To),
            ValidationError::invalid_numeric("-4"),
        ]
    );
    assert!(!report.is_valid());

    let fail_fast = validate_with(&doc, &ValidatorConfig::default());
    assert_eq!(fail_fast.violations.len(), 1);
    assert_eq!(validate(&doc), Err(report.violations[0].clone()));
}

#[test]
fn collect_all_stops_at_root_violations() {
    let report = validate_with(
        &resource("empty-nodes"),
        &ValidatorConfig {
            policy: ReportPolicy::CollectAll,
        },
    );
    assert_eq!(report.violations.len(), 1);
    assert!(validate_all(&resource("valid")).is_valid());
}

#[test]
fn report_serializes_messages() {
    let report = validate_all(&resource("duplicate-id"));
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({ "violations": ["duplicate node identifier a"] })
    );
}
