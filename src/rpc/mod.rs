pub mod client;
pub mod status;
pub mod types;

pub use client::RpcClient;
pub use status::{RpcStatus, SUCCESS_STATUS};
pub use types::{
    CloseOperationRequest, FetchResultsRequest, FetchResultsResponse, QueryDataSet,
    TransportError,
};

#[cfg(test)]
mod status_test;
