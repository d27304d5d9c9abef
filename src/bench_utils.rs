use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::{Value, json};

use crate::rows::ResultRow;

#[derive(Clone, Debug)]
pub enum DocumentShape {
    Line,
    Star,
    Random { edges: usize },
}

/// Demarshaler-shaped graph document with `node_count` nodes named `n0..`.
///
/// Edges are named `e0..`; roughly one in four carries no cost.
pub fn generate_document(shape: DocumentShape, node_count: usize, seed: u64) -> Value {
    assert!(node_count > 1, "node_count must exceed 1");
    let mut rng = StdRng::seed_from_u64(seed);
    let pairs: Vec<(usize, usize)> = match shape {
        DocumentShape::Line => (0..node_count - 1).map(|idx| (idx, idx + 1)).collect(),
        DocumentShape::Star => (1..node_count).map(|leaf| (0, leaf)).collect(),
        DocumentShape::Random { edges } => (0..edges)
            .map(|_| {
                (
                    rng.gen_range(0..node_count),
                    rng.gen_range(0..node_count),
                )
            })
            .collect(),
    };
    let nodes: Vec<Value> = (0..node_count)
        .map(|idx| json!({ "id": node_name(idx) }))
        .collect();
    let edges: Vec<Value> = pairs
        .into_iter()
        .enumerate()
        .map(|(idx, (from, to))| {
            let mut edge = json!({
                "id": format!("e{idx}"),
                "from": node_name(from),
                "to": node_name(to),
            });
            if rng.gen_ratio(3, 4) {
                edge["cost"] = json!(format!("{:.2}", rng.r#gen::<f64>() * 10.0));
            }
            edge
        })
        .collect();
    json!({
        "graph": {
            "id": format!("g{seed}"),
            "name": "generated",
            "nodes": { "node": nodes },
            "edges": { "edge": edges },
        }
    })
}

/// Tree-encoded rows of a random reachability tree rooted at `n0`.
#[derive(Clone, Debug)]
pub struct TreeRows {
    pub rows: Vec<ResultRow>,
    /// Node with the longest path from the root.
    pub deepest: String,
    pub depth: usize,
}

pub fn generate_tree_rows(node_count: usize, seed: u64) -> TreeRows {
    assert!(node_count > 0, "node_count must be positive");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut depths = vec![0usize; node_count];
    let mut rows = Vec::with_capacity(node_count);
    rows.push(ResultRow::root(node_name(0)));
    for child in 1..node_count {
        // Bias towards recent nodes so trees get deep rather than bushy.
        let low = child.saturating_sub(4);
        let parent = rng.gen_range(low..child);
        depths[child] = depths[parent] + 1;
        rows.push(ResultRow::link(node_name(parent), node_name(child)));
    }
    let (deepest, depth) = depths
        .iter()
        .enumerate()
        .max_by_key(|(idx, depth)| (**depth, std::cmp::Reverse(*idx)))
        .map(|(idx, depth)| (idx, *depth))
        .unwrap_or((0, 0));
    TreeRows {
        rows,
        deepest: node_name(deepest),
        depth,
    }
}

/// Flat-encoded rows holding `segments` delimited paths of 1..=`max_len` nodes.
pub fn generate_flat_segments(segments: usize, max_len: usize, seed: u64) -> Vec<ResultRow> {
    assert!(max_len > 0, "max_len must be positive");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::new();
    for _ in 0..segments {
        let len = rng.gen_range(1..=max_len);
        for _ in 0..len {
            let id = rng.gen_range(0..max_len * 4);
            rows.push(ResultRow::marker(node_name(id)));
        }
        rows.push(ResultRow::delimiter());
    }
    rows
}

fn node_name(idx: usize) -> String {
    format!("n{idx}")
}
