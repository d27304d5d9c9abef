//! Structural validation of graph documents.
//!
//! Every check is a free function returning `Result<(), ValidationError>` so a
//! validation pass reads as a sequence of `?`-chained calls. The two
//! bookkeeping sets (ids seen per namespace and node ids declared as reference
//! targets) are owned by the pass and handed to the checks explicitly.

use ahash::AHashSet;
use serde::Serialize;

use crate::{
    config::{ReportPolicy, ValidatorConfig},
    document::{Attr, Element, OneOrMany},
    errors::{Cardinality, Endpoint, Namespace, ValidationError},
};

const GRAPH: &str = "graph";
const ID: &str = "id";
const NAME: &str = "name";
const NODES: &str = "nodes";
const NODE: &str = "node";
const EDGES: &str = "edges";
const EDGE: &str = "edge";
const FROM: &str = "from";
const TO: &str = "to";
const COST: &str = "cost";

/// Every violation found by a collecting pass, in encounter order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    #[serde(serialize_with = "serialize_messages")]
    pub violations: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.violations.first()
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.violations.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn serialize_messages<S>(violations: &[ValidationError], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(violations.iter().map(ToString::to_string))
}

/// Validates a document, stopping at the first violation.
pub fn validate(document: &Attr) -> Result<(), ValidationError> {
    validate_with(document, &ValidatorConfig::default()).into_result()
}

/// Validates a document and reports every node and edge violation.
///
/// This goes beyond the fail-fast contract of [`validate`]: after a bad node
/// or edge the scan moves on to the next one. Violations on the graph root
/// still end the scan since nothing below them can be checked.
pub fn validate_all(document: &Attr) -> ValidationReport {
    validate_with(
        document,
        &ValidatorConfig {
            policy: ReportPolicy::CollectAll,
        },
    )
}

pub fn validate_with(document: &Attr, config: &ValidatorConfig) -> ValidationReport {
    tracing::debug!(policy = ?config.policy, "validating graph document");
    let mut report = ValidationReport::default();
    let graph = match check_root(document) {
        Ok(graph) => graph,
        Err(err) => {
            tracing::debug!(%err, "graph root rejected");
            report.violations.push(err);
            return report;
        }
    };

    let mut node_ids = AHashSet::new();
    let mut edge_ids = AHashSet::new();
    let mut declared = AHashSet::new();
    let policy = config.policy;
    let violations = &mut report.violations;

    let scan = for_each(children_of(graph, NODES, NODE), |node| {
        absorb(policy, check_node(node, &mut node_ids, &mut declared), violations)
    })
    .and_then(|()| {
        for_each(children_of(graph, EDGES, EDGE), |edge| {
            absorb(policy, check_edge(edge, &mut edge_ids, &declared), violations)
        })
    });
    if let Err(err) = scan {
        tracing::debug!(%err, "graph document rejected");
        violations.push(err);
        return report;
    }

    tracing::debug!(
        nodes = declared.len(),
        edges = edge_ids.len(),
        violations = report.violations.len(),
        "graph document scanned"
    );
    report
}

/// Keeps the scan going under [`ReportPolicy::CollectAll`].
fn absorb(
    policy: ReportPolicy,
    result: Result<(), ValidationError>,
    violations: &mut Vec<ValidationError>,
) -> Result<(), ValidationError> {
    match (result, policy) {
        (Err(err), ReportPolicy::CollectAll) => {
            violations.push(err);
            Ok(())
        }
        (result, _) => result,
    }
}

fn check_root(document: &Attr) -> Result<&Attr, ValidationError> {
    let root = element_of(document);
    require_present(root, GRAPH)?;
    require_count(root, GRAPH, 1)?;
    let graph = first_child(root, GRAPH)?;
    let graph_element = element_of(graph);
    require_count(graph_element, ID, 1)?;
    require_count(graph_element, NAME, 1)?;
    require_count(graph_element, NODES, 1)?;
    require_present(graph_element, EDGES)?;
    require_at_most(graph_element, EDGES, 1)?;
    let nodes = first_child(graph_element, NODES)?;
    require_at_least(element_of(nodes), NODE, 1)?;
    Ok(graph)
}

fn check_node(
    node: &Attr,
    seen: &mut AHashSet<String>,
    declared: &mut AHashSet<String>,
) -> Result<(), ValidationError> {
    let element = element_of(node);
    require_present(element, ID)?;
    require_count(element, ID, 1)?;
    let id = scalar(element, ID)?;
    require_unique(id, Namespace::Node, seen)?;
    declare_node(id, declared);
    Ok(())
}

fn check_edge(
    edge: &Attr,
    seen: &mut AHashSet<String>,
    declared: &AHashSet<String>,
) -> Result<(), ValidationError> {
    let element = element_of(edge);
    for child in [ID, TO, FROM] {
        require_present(element, child)?;
        require_count(element, child, 1)?;
    }
    let id = scalar(element, ID)?;
    let to = scalar(element, TO)?;
    let from = scalar(element, FROM)?;
    require_unique(id, Namespace::Edge, seen)?;
    require_declared(to, id, Endpoint::To, declared)?;
    require_declared(from, id, Endpoint::From, declared)?;
    require_at_most(element, COST, 1)?;
    let cost = match element.child(COST).and_then(OneOrMany::first) {
        Some(_) => Some(scalar(element, COST)?),
        None => None,
    };
    require_non_negative_if_present(cost)
}

static EMPTY_ELEMENT: Element = Element::EMPTY;
static NO_CHILDREN: OneOrMany<Attr> = OneOrMany::Empty;

/// A text leaf behaves as an element without children.
fn element_of(attr: &Attr) -> &Element {
    attr.as_element().unwrap_or(&EMPTY_ELEMENT)
}

fn first_child<'a>(element: &'a Element, child: &str) -> Result<&'a Attr, ValidationError> {
    element
        .child(child)
        .and_then(OneOrMany::first)
        .ok_or_else(|| ValidationError::missing(child))
}

fn children_of<'a>(graph: &'a Attr, collection: &str, item: &str) -> &'a OneOrMany<Attr> {
    graph
        .child(collection)
        .and_then(OneOrMany::first)
        .and_then(|attr| attr.child(item))
        .unwrap_or(&NO_CHILDREN)
}

fn count_of(element: &Element, child: &str) -> usize {
    element.child(child).map_or(0, OneOrMany::len)
}

pub fn require_present(element: &Element, child: &str) -> Result<(), ValidationError> {
    if element.contains(child) {
        Ok(())
    } else {
        Err(ValidationError::missing(child))
    }
}

/// Absent children and children present with no entries both count as zero.
pub fn require_count(element: &Element, child: &str, exact: usize) -> Result<(), ValidationError> {
    require_cardinality(element, child, Cardinality::Exactly(exact))
}

pub fn require_at_least(
    element: &Element,
    child: &str,
    minimum: usize,
) -> Result<(), ValidationError> {
    require_cardinality(element, child, Cardinality::AtLeast(minimum))
}

pub fn require_at_most(
    element: &Element,
    child: &str,
    maximum: usize,
) -> Result<(), ValidationError> {
    require_cardinality(element, child, Cardinality::AtMost(maximum))
}

fn require_cardinality(
    element: &Element,
    child: &str,
    expected: Cardinality,
) -> Result<(), ValidationError> {
    let found = count_of(element, child);
    if expected.admits(found) {
        Ok(())
    } else {
        Err(ValidationError::cardinality(child, expected, found))
    }
}

/// Records `id` in `seen`, failing if it was already there.
pub fn require_unique(
    id: &str,
    namespace: Namespace,
    seen: &mut AHashSet<String>,
) -> Result<(), ValidationError> {
    if seen.insert(id.to_string()) {
        Ok(())
    } else {
        Err(ValidationError::duplicate(namespace, id))
    }
}

pub fn declare_node(id: &str, declared: &mut AHashSet<String>) {
    declared.insert(id.to_string());
}

pub fn require_declared(
    id: &str,
    edge: &str,
    endpoint: Endpoint,
    declared: &AHashSet<String>,
) -> Result<(), ValidationError> {
    if declared.contains(id) {
        Ok(())
    } else {
        Err(ValidationError::undeclared(id, edge, endpoint))
    }
}

/// Blank values count as absent. Anything else must be a finite number `>= 0`.
pub fn require_non_negative_if_present(value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(None), parse_cost).map(|_| ())
}

/// Parses an edge cost. `Ok(None)` for a blank value.
pub fn parse_cost(value: &str) -> Result<Option<f64>, ValidationError> {
    let raw = value.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => Ok(Some(number)),
        _ => Err(ValidationError::invalid_numeric(raw)),
    }
}

/// Applies `check` to every entry in encounter order, stopping at the first error.
pub fn for_each<T, F>(children: &OneOrMany<T>, mut check: F) -> Result<(), ValidationError>
where
    F: FnMut(&T) -> Result<(), ValidationError>,
{
    children.iter().try_for_each(|child| check(child))
}

/// Text of the first entry under `child`.
pub fn scalar<'a>(element: &'a Element, child: &str) -> Result<&'a str, ValidationError> {
    first_child(element, child)?
        .as_text()
        .ok_or_else(|| ValidationError::malformed_value(child))
}
