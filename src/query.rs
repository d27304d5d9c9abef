//! Query descriptors and the answers assembled for them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered node ids from source to target.
pub type Path = Vec<String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Single cheapest path; answered with a `path` field.
    Cheapest,
    /// Every path found; answered with a `paths` field.
    Paths,
}

/// One path question sent to the engine. `start`/`end` are accepted for `from`/`to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuery {
    #[serde(rename = "type")]
    pub kind: QueryKind,
    #[serde(alias = "start")]
    pub from: String,
    #[serde(alias = "end")]
    pub to: String,
}

impl PathQuery {
    pub fn cheapest<F: Into<String>, T: Into<String>>(from: F, to: T) -> Self {
        Self {
            kind: QueryKind::Cheapest,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn paths<F: Into<String>, T: Into<String>>(from: F, to: T) -> Self {
        Self {
            kind: QueryKind::Paths,
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub queries: Vec<PathQuery>,
}

/// Decoded result of one query. `None` means nothing was found and is
/// written as `false` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Path(#[serde(with = "absent_as_false")] Option<Path>),
    Paths(#[serde(with = "absent_as_false")] Option<Vec<Path>>),
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        match self {
            Outcome::Path(path) => path.is_some(),
            Outcome::Paths(paths) => paths.is_some(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "type")]
    pub kind: QueryKind,
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Answer {
    pub fn new(query: &PathQuery, outcome: Outcome) -> Self {
        Self {
            kind: query.kind,
            from: query.from.clone(),
            to: query.to.clone(),
            outcome,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.outcome {
            Outcome::Path(path) => path.as_ref(),
            Outcome::Paths(_) => None,
        }
    }

    pub fn paths(&self) -> Option<&[Path]> {
        match &self.outcome {
            Outcome::Paths(paths) => paths.as_deref(),
            Outcome::Path(_) => None,
        }
    }
}

/// Answers in the same order as the queries they belong to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub answers: Vec<Answer>,
}

mod absent_as_false {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire<T> {
        Flag(bool),
        Value(Option<T>),
    }

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        match Wire::<T>::deserialize(deserializer)? {
            Wire::Flag(false) => Ok(None),
            Wire::Flag(true) => Err(serde::de::Error::custom(
                "`true` is not a valid path value",
            )),
            Wire::Value(value) => Ok(value),
        }
    }
}
