use std::{error::Error as StdError, fmt};

use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Schema,
    Table,
    View,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Schema => "schema",
            Self::Table => "table",
            Self::View => "view",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Connection,
    Cursor,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connection => "connection",
            Self::Cursor => "cursor",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid connection url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid value `{value}` for connection option `{key}`: expected {expected}")]
    InvalidOption {
        key: String,
        value: String,
        expected: String,
    },
    #[error("conflicting connection options: `{first}` cannot be combined with `{second}`")]
    Conflict { first: String, second: String },
    #[error("no dialect registered for url scheme `{scheme}`")]
    UnknownDialect { scheme: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: BoxError,
    },
    #[error("{kind} not found: {name}")]
    NotFound { kind: ObjectKind, name: String },
    #[error("internal invariant violated: {message}")]
    Internal { message: String },
    #[error("operation `{operation}` is not supported by dialect `{dialect}`")]
    Unsupported { operation: String, dialect: String },
    #[error("statement failed: {sql}")]
    Execution {
        sql: String,
        #[source]
        source: BoxError,
    },
    #[error("unable to run `{operation}`: {resource} is already closed")]
    Closed {
        resource: Resource,
        operation: &'static str,
    },
    #[error("no result has been produced")]
    NoResult,
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("cannot convert `{value}` to {target}")]
    Coercion { value: String, target: String },
}

impl Error {
    pub fn connection(message: impl Into<String>, source: BoxError) -> Self {
        Self::Connection {
            message: message.into(),
            source,
        }
    }

    pub fn execution(sql: impl Into<String>, source: BoxError) -> Self {
        Self::Execution {
            sql: sql.into(),
            source,
        }
    }

    pub fn not_found(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn unsupported(operation: impl Into<String>, dialect: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            dialect: dialect.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn coercion(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Coercion {
            value: value.into(),
            target: target.into(),
        }
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Connection { .. } => "connection",
            Self::NotFound { .. } => "not-found",
            Self::Internal { .. } => "internal",
            Self::Unsupported { .. } => "unsupported",
            Self::Execution { .. } => "execute",
            Self::Closed { .. } => "closed",
            Self::NoResult => "no-result",
            Self::InvalidArgument { .. } => "argument",
            Self::Coercion { .. } => "coercion",
        }
    }
}
