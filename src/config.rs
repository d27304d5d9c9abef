//! Configuration for validation reporting and row decoding.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the baseline behaviour: fail-fast validation and row encodings
//! detected from the first result row.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{errors::PathGraphError, reconstruct::RowEncoding};

/// How many violations a validation pass reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPolicy {
    /// Stop at the first violation.
    #[default]
    FailFast,
    /// Keep scanning nodes and edges after a violation and report all of them.
    CollectAll,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub policy: ReportPolicy,
}

/// Options for decoding path-engine result rows.
///
/// # Examples
///
/// ```rust
/// use pathgraph::{ReconstructConfig, reconstruct::RowEncoding};
///
/// let detect = ReconstructConfig::default();
/// assert!(detect.encoding.is_none());
///
/// let forced = ReconstructConfig::forced(RowEncoding::Flat);
/// assert_eq!(forced.encoding, Some(RowEncoding::Flat));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructConfig {
    /// Decode every result set with this encoding instead of inspecting the
    /// first row. Rows of the other shape are then reported as malformed.
    ///
    /// **Default:** `None`
    pub encoding: Option<RowEncoding>,
}

impl ReconstructConfig {
    pub fn forced(encoding: RowEncoding) -> Self {
        Self {
            encoding: Some(encoding),
        }
    }
}

/// Top-level configuration, usually read from a `config.json` next to the caller.
///
/// ```json
/// { "validator": { "policy": "collect_all" }, "reconstruct": { "encoding": "flat" } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathGraphConfig {
    pub validator: ValidatorConfig,
    pub reconstruct: ReconstructConfig,
}

impl PathGraphConfig {
    pub fn from_json_str(text: &str) -> Result<Self, PathGraphError> {
        serde_json::from_str(text).map_err(|e| PathGraphError::config(e.to_string()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PathGraphError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PathGraphError::config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }
}
