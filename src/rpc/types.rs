use bytes::Bytes;
use thiserror::Error;

use super::status::RpcStatus;

/// One column-major page as delivered by the server.
///
/// `bitmaps` and `values` are positioned by deduplicated column slot (ordinal - 2).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDataSet {
    pub time: Bytes,
    pub bitmaps: Vec<Bytes>,
    pub values: Vec<Bytes>,
}

impl QueryDataSet {
    pub fn new(time: impl Into<Bytes>, bitmaps: Vec<Bytes>, values: Vec<Bytes>) -> Self {
        Self {
            time: time.into(),
            bitmaps,
            values,
        }
    }

    pub fn row_count(&self) -> usize {
        self.time.len() / 8
    }

    pub fn byte_len(&self) -> usize {
        self.time.len()
            + self.bitmaps.iter().map(Bytes::len).sum::<usize>()
            + self.values.iter().map(Bytes::len).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResultsRequest {
    pub session_id: i64,
    pub statement: String,
    pub fetch_size: i32,
    pub query_id: i64,
    pub is_align: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResultsResponse {
    pub status: RpcStatus,
    pub has_result_set: bool,
    pub query_data_set: Option<QueryDataSet>,
}

impl FetchResultsResponse {
    pub fn page(page: QueryDataSet) -> Self {
        Self {
            status: RpcStatus::success(),
            has_result_set: true,
            query_data_set: Some(page),
        }
    }

    pub fn exhausted() -> Self {
        Self {
            status: RpcStatus::success(),
            has_result_set: false,
            query_data_set: None,
        }
    }

    pub fn failed(status: RpcStatus) -> Self {
        Self {
            status,
            has_result_set: false,
            query_data_set: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOperationRequest {
    pub session_id: i64,
    pub query_id: i64,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection lost: {0}")]
    Disconnected(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),
}
