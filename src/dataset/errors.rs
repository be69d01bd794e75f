use thiserror::Error;
use tracing::{debug, error};

use super::data_type::DataType;
use crate::rpc::TransportError;

/// Errors surfaced by a result set to its caller.
#[derive(Debug, Error)]
pub enum DataSetError {
    #[error("Server failed to execute the request (code {code}): {message}")]
    ServerExecution { code: i32, message: String },

    #[error("{context}: {source}")]
    Connection {
        context: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("The value got by {0} (column name) is NULL.")]
    NullValue(String),

    #[error("Column index {index} out of range 1..={count}")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("No record remains")]
    NoCurrentRow,

    #[error("Data type {0} is not supported.")]
    UnsupportedType(String),

    #[error("Result set is closed")]
    Closed,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid column schema: {0}")]
    InvalidSchema(String),

    #[error("Timestamp {0} ms is outside the representable range")]
    TimestampOutOfRange(i64),

    #[error("Column {column} holds {actual}, cannot read it as {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: DataType,
    },

    #[error("Page truncated while reading {what}: need {needed} bytes, {remaining} remain")]
    Truncated {
        what: String,
        needed: usize,
        remaining: usize,
    },

    #[error("Malformed page: {0}")]
    MalformedPage(String),

    #[error("Column {column} holds invalid UTF-8 text")]
    InvalidUtf8 { column: String },

    #[error("Result set stopped after an earlier page decode failure: {0}")]
    Failed(String),
}

impl DataSetError {
    /// Errors that mean client and server disagree on the schema or wire format.
    /// The result set cannot make progress after one of these.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DataSetError::UnsupportedType(_)
                | DataSetError::Truncated { .. }
                | DataSetError::MalformedPage(_)
                | DataSetError::Failed(_)
        )
    }

    pub fn log_error(&self) {
        match self {
            DataSetError::ServerExecution { code, message } => {
                error!(code, "Server execution failed: {}", message);
            }
            DataSetError::Connection { context, source } => {
                error!("{}", context);
                debug!("Transport error details: {:?}", source);
            }
            DataSetError::UnsupportedType(t) => {
                error!("Unsupported data type: {}", t);
            }
            DataSetError::Truncated {
                what,
                needed,
                remaining,
            } => {
                error!("Page truncated while reading {}", what);
                debug!(needed, remaining, "Truncation details");
            }
            DataSetError::MalformedPage(e) => {
                error!("Malformed page: {}", e);
            }
            other => {
                debug!("Result set error: {}", other);
            }
        }
    }
}
