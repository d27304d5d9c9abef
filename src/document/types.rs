use serde::{Deserialize, Serialize};

use crate::{
    document::{Attr, Element, OneOrMany},
    errors::ValidationError,
    validator::{self, parse_cost, scalar},
};

/// Cost charged for an edge that carries no `cost`.
pub const UNWEIGHTED_COST: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub cost: Option<f64>,
}

impl Edge {
    pub fn weight(&self) -> f64 {
        self.cost.unwrap_or(UNWEIGHTED_COST)
    }
}

/// Typed view of a document that passed validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDocument {
    pub id: String,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    /// Validates `tree` and extracts the typed document from it.
    pub fn from_tree(tree: &Attr) -> Result<Self, ValidationError> {
        validator::validate(tree)?;
        let graph = first(tree, "graph")?;
        let graph_element = element(graph, "graph")?;
        let nodes = collection(graph, "nodes", "node")
            .iter()
            .map(|node| {
                Ok(Node {
                    id: scalar(element(node, "node")?, "id")?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        let edges = collection(graph, "edges", "edge")
            .iter()
            .map(edge_from_attr)
            .collect::<Result<Vec<_>, ValidationError>>()?;
        Ok(Self {
            id: scalar(graph_element, "id")?.to_string(),
            name: scalar(graph_element, "name")?.to_string(),
            nodes,
            edges,
        })
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.id.as_str())
    }

    /// Edges leaving `from`, in document order.
    pub fn outgoing<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.from == from)
    }

    /// Cost of walking `path`, taking the cheapest edge for every hop.
    ///
    /// Returns `None` when some hop has no edge in the document. A path with a
    /// single node costs nothing.
    pub fn total_cost(&self, path: &[String]) -> Option<f64> {
        path.windows(2).try_fold(0.0, |total, hop| {
            self.outgoing(&hop[0])
                .filter(|edge| edge.to == hop[1])
                .map(Edge::weight)
                .min_by(f64::total_cmp)
                .map(|cost| total + cost)
        })
    }
}

fn first<'a>(attr: &'a Attr, child: &str) -> Result<&'a Attr, ValidationError> {
    attr.child(child)
        .and_then(OneOrMany::first)
        .ok_or_else(|| ValidationError::missing(child))
}

fn element<'a>(attr: &'a Attr, name: &str) -> Result<&'a Element, ValidationError> {
    attr.as_element()
        .ok_or_else(|| ValidationError::malformed_value(name))
}

fn collection<'a>(graph: &'a Attr, collection: &str, item: &str) -> &'a [Attr] {
    graph
        .child(collection)
        .and_then(OneOrMany::first)
        .and_then(|attr| attr.child(item))
        .map(OneOrMany::as_slice)
        .unwrap_or(&[])
}

fn edge_from_attr(attr: &Attr) -> Result<Edge, ValidationError> {
    let element = element(attr, "edge")?;
    let cost = match element.child("cost").and_then(OneOrMany::first) {
        Some(_) => parse_cost(scalar(element, "cost")?)?,
        None => None,
    };
    Ok(Edge {
        id: scalar(element, "id")?.to_string(),
        from: scalar(element, "from")?.to_string(),
        to: scalar(element, "to")?.to_string(),
        cost,
    })
}
