//! Rebuilding paths from the rows an external path engine returns.
//!
//! Engines report results in one of two encodings. In the tree encoding every
//! row is a `(parent, child)` pair of the reachability tree grown from the
//! search origin; the path to a target is recovered by walking parent
//! pointers back from it. In the flat encoding rows list path nodes in order
//! and a null marker closes each path. The encoding is read off the first row
//! unless [`ReconstructConfig`] pins one.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::{
    config::ReconstructConfig,
    errors::PathGraphError,
    query::{Answer, Outcome, Path, PathQuery, QueryKind, Request, Response},
    rows::{ResultRow, ResultSet, non_blank},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowEncoding {
    /// `(parent, child)` pairs of a reachability tree.
    Tree,
    /// Node-id markers with null delimiters.
    Flat,
}

impl RowEncoding {
    /// Encoding of a result, judged by its first row. `None` for no rows.
    pub fn detect(rows: &[ResultRow]) -> Option<Self> {
        rows.first().map(|row| {
            if row.is_link() {
                RowEncoding::Tree
            } else {
                RowEncoding::Flat
            }
        })
    }
}

/// A decoding strategy for one row encoding.
pub trait PathDecoder {
    fn encoding(&self) -> RowEncoding;

    /// Decodes the single path ending at `target`, or `None` if there is none.
    fn decode_path(
        &self,
        target: &str,
        rows: &[ResultRow],
    ) -> Result<Option<Path>, PathGraphError>;

    /// Decodes every path in the result, or `None` if there is none.
    fn decode_paths(&self, rows: &[ResultRow]) -> Result<Option<Vec<Path>>, PathGraphError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TreeDecoder;

#[derive(Clone, Copy, Debug, Default)]
pub struct FlatDecoder;

pub fn decoder_for(encoding: RowEncoding) -> &'static dyn PathDecoder {
    match encoding {
        RowEncoding::Tree => &TreeDecoder,
        RowEncoding::Flat => &FlatDecoder,
    }
}

impl TreeDecoder {
    /// Maps every child to its parent; the root maps to `None`.
    fn parent_map(rows: &[ResultRow]) -> Result<AHashMap<&str, Option<&str>>, PathGraphError> {
        let mut parents = AHashMap::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let ResultRow::Link { parent, child } = row else {
                return Err(mixed_encoding(idx, RowEncoding::Tree));
            };
            let child = non_blank(child.as_deref()).ok_or_else(|| {
                PathGraphError::malformed(format!("row {idx} links to no child"))
            })?;
            parents.insert(child, non_blank(parent.as_deref()));
        }
        Ok(parents)
    }
}

impl PathDecoder for TreeDecoder {
    fn encoding(&self) -> RowEncoding {
        RowEncoding::Tree
    }

    fn decode_path(
        &self,
        target: &str,
        rows: &[ResultRow],
    ) -> Result<Option<Path>, PathGraphError> {
        let parents = Self::parent_map(rows)?;
        if !parents.contains_key(target) {
            return Ok(None);
        }
        let mut path = Vec::new();
        let mut visited = AHashSet::new();
        let mut current = Some(target);
        while let Some(node) = current {
            if !visited.insert(node) {
                return Err(PathGraphError::malformed(format!(
                    "parent pointers loop back to {node}"
                )));
            }
            path.push(node.to_string());
            current = parents.get(node).copied().flatten();
        }
        path.reverse();
        Ok(Some(path))
    }

    fn decode_paths(&self, _rows: &[ResultRow]) -> Result<Option<Vec<Path>>, PathGraphError> {
        Err(PathGraphError::malformed(
            "multi-path results must use the flat encoding",
        ))
    }
}

impl FlatDecoder {
    fn marker_ids(
        rows: &[ResultRow],
    ) -> impl Iterator<Item = Result<Option<&str>, PathGraphError>> {
        rows.iter().enumerate().map(|(idx, row)| match row {
            ResultRow::Marker(_) => Ok(row.marker_id()),
            ResultRow::Link { .. } => Err(mixed_encoding(idx, RowEncoding::Flat)),
        })
    }
}

impl PathDecoder for FlatDecoder {
    fn encoding(&self) -> RowEncoding {
        RowEncoding::Flat
    }

    /// Rows already are the path; null markers are dropped wherever they sit.
    fn decode_path(
        &self,
        _target: &str,
        rows: &[ResultRow],
    ) -> Result<Option<Path>, PathGraphError> {
        let mut path = Vec::new();
        for id in Self::marker_ids(rows) {
            if let Some(id) = id? {
                path.push(id.to_string());
            }
        }
        Ok((!path.is_empty()).then_some(path))
    }

    /// A segment is kept only once a null marker closes it; ids after the
    /// last delimiter are dropped.
    fn decode_paths(&self, rows: &[ResultRow]) -> Result<Option<Vec<Path>>, PathGraphError> {
        let mut paths = Vec::new();
        let mut segment = Vec::new();
        for id in Self::marker_ids(rows) {
            match id? {
                Some(id) => segment.push(id.to_string()),
                None if !segment.is_empty() => paths.push(std::mem::take(&mut segment)),
                None => {}
            }
        }
        if !segment.is_empty() {
            tracing::warn!(
                dropped = segment.len(),
                "discarding unterminated trailing path segment"
            );
        }
        Ok((!paths.is_empty()).then_some(paths))
    }
}

fn mixed_encoding(idx: usize, expected: RowEncoding) -> PathGraphError {
    PathGraphError::malformed(format!(
        "row {idx} does not match the {expected:?} encoding of the result"
    ))
}

/// Decodes the rows of one query into its answer.
pub fn reconstruct(query: &PathQuery, rows: &[ResultRow]) -> Result<Answer, PathGraphError> {
    reconstruct_with(query, rows, &ReconstructConfig::default())
}

pub fn reconstruct_with(
    query: &PathQuery,
    rows: &[ResultRow],
    config: &ReconstructConfig,
) -> Result<Answer, PathGraphError> {
    // A forced encoding only applies once there is something to decode.
    let encoding = match (RowEncoding::detect(rows), config.encoding) {
        (None, _) => {
            tracing::debug!(from = %query.from, to = %query.to, "empty result");
            return Ok(Answer::new(query, absent(query.kind)));
        }
        (Some(_), Some(forced)) => forced,
        (Some(detected), None) => detected,
    };
    let decoder = decoder_for(encoding);
    tracing::trace!(?encoding, kind = ?query.kind, rows = rows.len(), "decoding result");
    let outcome = match query.kind {
        QueryKind::Cheapest => Outcome::Path(decoder.decode_path(&query.to, rows)?),
        QueryKind::Paths => Outcome::Paths(decoder.decode_paths(rows)?),
    };
    Ok(Answer::new(query, outcome))
}

fn absent(kind: QueryKind) -> Outcome {
    match kind {
        QueryKind::Cheapest => Outcome::Path(None),
        QueryKind::Paths => Outcome::Paths(None),
    }
}

/// Answers a batch of queries, one result set per query, preserving order.
///
/// An unreachable target only marks its own answer. A result that cannot be
/// decoded fails the batch, naming the query it belongs to.
pub fn build_response(
    queries: &[PathQuery],
    results: &[ResultSet],
) -> Result<Response, PathGraphError> {
    build_response_with(queries, results, &ReconstructConfig::default())
}

pub fn build_response_with(
    queries: &[PathQuery],
    results: &[ResultSet],
    config: &ReconstructConfig,
) -> Result<Response, PathGraphError> {
    if queries.len() != results.len() {
        return Err(PathGraphError::invalid_input(format!(
            "{} queries but {} results",
            queries.len(),
            results.len()
        )));
    }
    tracing::debug!(queries = queries.len(), "building response");
    let answers = queries
        .iter()
        .zip(results)
        .enumerate()
        .map(|(idx, (query, result))| {
            reconstruct_with(query, &result.rows, config).map_err(|err| match err {
                PathGraphError::MalformedResult(msg) => {
                    PathGraphError::malformed(format!("query {idx}: {msg}"))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Response { answers })
}

pub fn answer_request(
    request: &Request,
    results: &[ResultSet],
) -> Result<Response, PathGraphError> {
    build_response(&request.queries, results)
}
