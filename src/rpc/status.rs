use std::fmt;

use crate::dataset::errors::DataSetError;

pub const SUCCESS_STATUS: i32 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcStatus {
    pub code: i32,
    pub message: Option<String>,
}

impl RpcStatus {
    pub fn success() -> Self {
        Self {
            code: SUCCESS_STATUS,
            message: None,
        }
    }

    pub fn failure(code: i32, message: impl ToString) -> Self {
        Self {
            code,
            message: Some(message.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_STATUS
    }

    /// Turns a non-success status into `ServerExecution`, keeping the server's text as-is.
    pub fn verify_success(&self) -> Result<(), DataSetError> {
        if self.is_success() {
            return Ok(());
        }
        Err(DataSetError::ServerExecution {
            code: self.code,
            message: self.message.clone().unwrap_or_default(),
        })
    }
}

impl fmt::Display for RpcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.code, msg),
            None => write!(f, "{}", self.code),
        }
    }
}
