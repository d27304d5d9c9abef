//! Graph document validation and path reconstruction.
//!
//! Two independent, pure components:
//!
//! - [`validator`] checks a demarshaled graph document ([`Attr`] tree) for
//!   the cardinality, uniqueness and referential rules a graph description
//!   must satisfy, reporting the first violation as a [`ValidationError`].
//! - [`reconstruct`] turns the flat rows a path engine returns ([`ResultRow`])
//!   back into ordered paths, answering each [`PathQuery`] with an [`Answer`].
//!
//! # Quick Start
//!
//! ```rust
//! use pathgraph::{Attr, PathQuery, ResultRow, reconstruct, validate};
//! use serde_json::json;
//!
//! let doc = Attr::from_json(&json!({
//!     "graph": {
//!         "id": "g1",
//!         "name": "demo",
//!         "nodes": { "node": [{ "id": "a" }, { "id": "b" }] },
//!         "edges": { "edge": { "id": "e1", "from": "a", "to": "b", "cost": "2" } },
//!     }
//! }));
//! validate(&doc)?;
//!
//! let rows = vec![ResultRow::root("a"), ResultRow::link("a", "b")];
//! let answer = reconstruct(&PathQuery::cheapest("a", "b"), &rows)?;
//! assert_eq!(answer.path(), Some(&vec!["a".to_string(), "b".to_string()]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Fetching documents, parsing markup, building engine queries and managing
//! engine connections are left to the caller.

pub mod bench_utils;
pub mod config;
pub mod document;
pub mod errors;
pub mod query;
pub mod reconstruct;
pub mod rows;
pub mod validator;

pub use crate::config::{PathGraphConfig, ReconstructConfig, ReportPolicy, ValidatorConfig};
pub use crate::document::{Attr, Edge, Element, GraphDocument, Node, OneOrMany};
pub use crate::errors::{Cardinality, Endpoint, Namespace, PathGraphError, ValidationError};
pub use crate::query::{Answer, Outcome, Path, PathQuery, QueryKind, Request, Response};
pub use crate::reconstruct::{
    PathDecoder, RowEncoding, answer_request, build_response, reconstruct, reconstruct_with,
};
pub use crate::rows::{ResultRow, ResultSet, rows_from_statement};
pub use crate::validator::{ValidationReport, validate, validate_all, validate_with};
