use std::fmt;

use thiserror::Error;

/// Expected number of children for a cardinality check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl Cardinality {
    pub fn admits(self, found: usize) -> bool {
        match self {
            Cardinality::Exactly(n) => found == n,
            Cardinality::AtLeast(n) => found >= n,
            Cardinality::AtMost(n) => found <= n,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Exactly(n) => write!(f, "{n}"),
            Cardinality::AtLeast(n) => write!(f, "at least {n}"),
            Cardinality::AtMost(n) => write!(f, "at most {n}"),
        }
    }
}

/// Identifier namespace. Node ids and edge ids never collide with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Node,
    Edge,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Node => f.write_str("node"),
            Namespace::Edge => f.write_str("edge"),
        }
    }
}

/// Which end of an edge holds a reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::From => f.write_str("from"),
            Endpoint::To => f.write_str("to"),
        }
    }
}

/// A single structural violation found in a graph document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing child: {child}")]
    MissingChild { child: String },
    #[error("expected {expected} but was {found}: {child}")]
    CardinalityViolation {
        child: String,
        expected: Cardinality,
        found: usize,
    },
    #[error("duplicate {namespace} identifier {id}")]
    DuplicateIdentifier { namespace: Namespace, id: String },
    #[error("undeclared identifier {id} in {endpoint} of edge {edge}")]
    UndeclaredReference {
        id: String,
        edge: String,
        endpoint: Endpoint,
    },
    #[error("expected non-negative number: {value}")]
    InvalidNumeric { value: String },
    #[error("expected a scalar value: {child}")]
    MalformedValue { child: String },
}

impl ValidationError {
    pub fn missing<T: Into<String>>(child: T) -> Self {
        ValidationError::MissingChild {
            child: child.into(),
        }
    }

    pub fn cardinality<T: Into<String>>(child: T, expected: Cardinality, found: usize) -> Self {
        ValidationError::CardinalityViolation {
            child: child.into(),
            expected,
            found,
        }
    }

    pub fn duplicate<T: Into<String>>(namespace: Namespace, id: T) -> Self {
        ValidationError::DuplicateIdentifier {
            namespace,
            id: id.into(),
        }
    }

    pub fn undeclared<T, E>(id: T, edge: E, endpoint: Endpoint) -> Self
    where
        T: Into<String>,
        E: Into<String>,
    {
        ValidationError::UndeclaredReference {
            id: id.into(),
            edge: edge.into(),
            endpoint,
        }
    }

    pub fn invalid_numeric<T: Into<String>>(value: T) -> Self {
        ValidationError::InvalidNumeric {
            value: value.into(),
        }
    }

    pub fn malformed_value<T: Into<String>>(child: T) -> Self {
        ValidationError::MalformedValue {
            child: child.into(),
        }
    }
}

/// Error type for everything outside the validation taxonomy.
#[derive(Debug, Error)]
pub enum PathGraphError {
    #[error("malformed result: {0}")]
    MalformedResult(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("query error: {0}")]
    QueryError(String),
    #[error("config error: {0}")]
    ConfigError(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PathGraphError {
    pub fn malformed<T: Into<String>>(msg: T) -> Self {
        PathGraphError::MalformedResult(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        PathGraphError::InvalidInput(msg.into())
    }

    pub fn query<T: Into<String>>(msg: T) -> Self {
        PathGraphError::QueryError(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        PathGraphError::ConfigError(msg.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, PathGraphError::MalformedResult(_))
    }
}
