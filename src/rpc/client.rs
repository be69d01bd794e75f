use super::status::RpcStatus;
use super::types::{
    CloseOperationRequest, FetchResultsRequest, FetchResultsResponse, TransportError,
};

/// Capability to talk to the query service on behalf of one session.
///
/// Both calls block until the round trip completes or the transport gives up;
/// timeouts and reconnects are the implementor's business.
pub trait RpcClient: Send + Sync {
    fn fetch_results(
        &self,
        req: &FetchResultsRequest,
    ) -> Result<FetchResultsResponse, TransportError>;

    fn close_operation(&self, req: &CloseOperationRequest) -> Result<RpcStatus, TransportError>;
}
