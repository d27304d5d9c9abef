//! Result rows produced by the external path engine.
//!
//! Rows come in two shapes: a bare node-id marker (flat encoding) or a
//! parent/child pair (tree encoding). They arrive either as JSON objects or as
//! SQLite rows; both are decoded by column name.

use rusqlite::{Params, Row, Statement, types::ValueRef};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::PathGraphError;

const ID_COLUMN: &str = "id";
const PARENT_COLUMNS: [&str; 2] = ["parent", "source_node"];
const CHILD_COLUMNS: [&str; 2] = ["child", "dest_node"];

/// One row of an engine result.
///
/// `None` (or an empty id) is the null sentinel: the delimiter between flat
/// path segments, or the missing parent of the search root in a tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Value")]
pub enum ResultRow {
    Marker(Option<String>),
    Link {
        parent: Option<String>,
        child: Option<String>,
    },
}

impl ResultRow {
    pub fn marker<T: Into<String>>(id: T) -> Self {
        ResultRow::Marker(Some(id.into()))
    }

    pub fn delimiter() -> Self {
        ResultRow::Marker(None)
    }

    pub fn link<P: Into<String>, C: Into<String>>(parent: P, child: C) -> Self {
        ResultRow::Link {
            parent: Some(parent.into()),
            child: Some(child.into()),
        }
    }

    /// Link for the search root, which has no parent.
    pub fn root<C: Into<String>>(child: C) -> Self {
        ResultRow::Link {
            parent: None,
            child: Some(child.into()),
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, ResultRow::Link { .. })
    }

    /// Id carried by a marker row; `None` for delimiters and links.
    pub fn marker_id(&self) -> Option<&str> {
        match self {
            ResultRow::Marker(id) => non_blank(id.as_deref()),
            ResultRow::Link { .. } => None,
        }
    }

    /// Decodes a JSON row.
    ///
    /// Objects with a `parent`/`child` (or `source_node`/`dest_node`) column are
    /// links, objects with an `id` column are markers. A bare string, integer
    /// or `null` is accepted as a marker as well.
    pub fn from_json(value: &Value) -> Result<Self, PathGraphError> {
        match value {
            Value::Object(map) => row_from_map(map),
            Value::Null | Value::String(_) | Value::Number(_) => {
                Ok(ResultRow::Marker(json_id(value)?))
            }
            other => Err(PathGraphError::malformed(format!(
                "unrecognized result row: {other}"
            ))),
        }
    }

    /// Decodes a SQLite row by column name. TEXT and INTEGER ids are accepted,
    /// NULL is the sentinel.
    pub fn from_sql_row(row: &Row<'_>) -> Result<Self, PathGraphError> {
        let stmt: &Statement<'_> = row.as_ref();
        let parent = column_of(stmt, &PARENT_COLUMNS);
        let child = column_of(stmt, &CHILD_COLUMNS);
        match (parent, child) {
            (Some(parent), Some(child)) => Ok(ResultRow::Link {
                parent: sql_id(row, parent)?,
                child: sql_id(row, child)?,
            }),
            (None, None) => match column_of(stmt, &[ID_COLUMN]) {
                Some(id) => Ok(ResultRow::Marker(sql_id(row, id)?)),
                None => Err(PathGraphError::malformed(format!(
                    "result columns {:?} carry neither an id nor a parent/child pair",
                    stmt.column_names()
                ))),
            },
            _ => Err(PathGraphError::malformed(
                "result columns carry only one side of a parent/child pair",
            )),
        }
    }
}

impl TryFrom<Value> for ResultRow {
    type Error = PathGraphError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        ResultRow::from_json(&value)
    }
}

/// The rows returned for one query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ResultSet {
    pub rows: Vec<ResultRow>,
}

impl ResultSet {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    pub fn from_statement<P: Params>(
        stmt: &mut Statement<'_>,
        params: P,
    ) -> Result<Self, PathGraphError> {
        rows_from_statement(stmt, params).map(Self::new)
    }
}

impl From<Vec<ResultRow>> for ResultSet {
    fn from(rows: Vec<ResultRow>) -> Self {
        Self::new(rows)
    }
}

/// Runs a prepared statement and decodes every row it yields.
pub fn rows_from_statement<P: Params>(
    stmt: &mut Statement<'_>,
    params: P,
) -> Result<Vec<ResultRow>, PathGraphError> {
    let mut rows = stmt
        .query(params)
        .map_err(|e| PathGraphError::query(e.to_string()))?;
    let mut decoded = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|e| PathGraphError::query(e.to_string()))?
    {
        decoded.push(ResultRow::from_sql_row(row)?);
    }
    tracing::trace!(rows = decoded.len(), "decoded result rows");
    Ok(decoded)
}

pub(crate) fn non_blank(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty())
}

fn row_from_map(map: &Map<String, Value>) -> Result<ResultRow, PathGraphError> {
    let parent = PARENT_COLUMNS.iter().find_map(|name| map.get(*name));
    let child = CHILD_COLUMNS.iter().find_map(|name| map.get(*name));
    match (parent, child) {
        (Some(parent), Some(child)) => Ok(ResultRow::Link {
            parent: json_id(parent)?,
            child: json_id(child)?,
        }),
        (None, None) => match map.get(ID_COLUMN) {
            Some(id) => Ok(ResultRow::Marker(json_id(id)?)),
            None => Err(PathGraphError::malformed(format!(
                "result row carries neither an id nor a parent/child pair: {}",
                Value::Object(map.clone())
            ))),
        },
        _ => Err(PathGraphError::malformed(
            "result row carries only one side of a parent/child pair",
        )),
    }
}

fn json_id(value: &Value) -> Result<Option<String>, PathGraphError> {
    match value {
        Value::Null => Ok(None),
        Value::String(id) => Ok(non_blank(Some(id.as_str())).map(str::to_string)),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
        other => Err(PathGraphError::malformed(format!(
            "node id must be a string or an integer, found {other}"
        ))),
    }
}

fn column_of(stmt: &Statement<'_>, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| stmt.column_index(name).ok())
}

fn sql_id(row: &Row<'_>, idx: usize) -> Result<Option<String>, PathGraphError> {
    let value = row
        .get_ref(idx)
        .map_err(|e| PathGraphError::query(e.to_string()))?;
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(id) => Ok(Some(id.to_string())),
        ValueRef::Text(bytes) => {
            let id = std::str::from_utf8(bytes)
                .map_err(|e| PathGraphError::malformed(e.to_string()))?;
            Ok(non_blank(Some(id)).map(str::to_string))
        }
        ValueRef::Real(_) | ValueRef::Blob(_) => {
            let column = row.as_ref().column_name(idx).unwrap_or("?");
            Err(PathGraphError::malformed(format!(
                "column {column} must hold a text or integer node id"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_shapes() {
        assert_eq!(
            ResultRow::from_json(&json!({"id": "a"})).unwrap(),
            ResultRow::marker("a")
        );
        assert_eq!(
            ResultRow::from_json(&json!({"id": null})).unwrap(),
            ResultRow::delimiter()
        );
        assert_eq!(
            ResultRow::from_json(&json!({"source_node": "a", "dest_node": "b"})).unwrap(),
            ResultRow::link("a", "b")
        );
        assert_eq!(
            ResultRow::from_json(&json!({"parent": null, "child": 7})).unwrap(),
            ResultRow::root("7")
        );
        assert_eq!(ResultRow::from_json(&json!("")).unwrap(), ResultRow::delimiter());
    }

    #[test]
    fn unknown_shapes_are_malformed() {
        for value in [
            json!({"node": "a"}),
            json!({"parent": "a"}),
            json!({"id": 1.5}),
            json!(true),
            json!([1, 2]),
        ] {
            let err = ResultRow::from_json(&value).unwrap_err();
            assert!(err.is_malformed(), "{value} gave {err}");
        }
    }
}
