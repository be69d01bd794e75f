use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::rpc::{
    CloseOperationRequest, FetchResultsRequest, FetchResultsResponse, QueryDataSet, RpcClient,
    RpcStatus, TransportError,
};

/// RPC client that replays queued replies and records every request.
///
/// Once the fetch queue runs dry it answers "no more data".
pub struct ScriptedClient {
    fetch_replies: Mutex<VecDeque<Result<FetchResultsResponse, TransportError>>>,
    close_reply: Mutex<Option<Result<RpcStatus, TransportError>>>,
    fetch_log: Mutex<Vec<FetchResultsRequest>>,
    close_log: Mutex<Vec<CloseOperationRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            fetch_replies: Mutex::new(VecDeque::new()),
            close_reply: Mutex::new(None),
            fetch_log: Mutex::new(Vec::new()),
            close_log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(self, page: QueryDataSet) -> Self {
        self.fetch_replies
            .lock()
            .push_back(Ok(FetchResultsResponse::page(page)));
        self
    }

    pub fn with_exhausted(self) -> Self {
        self.fetch_replies
            .lock()
            .push_back(Ok(FetchResultsResponse::exhausted()));
        self
    }

    pub fn with_fetch_response(self, resp: FetchResultsResponse) -> Self {
        self.fetch_replies.lock().push_back(Ok(resp));
        self
    }

    pub fn with_fetch_error(self, err: TransportError) -> Self {
        self.fetch_replies.lock().push_back(Err(err));
        self
    }

    pub fn with_close_status(self, status: RpcStatus) -> Self {
        *self.close_reply.lock() = Some(Ok(status));
        self
    }

    pub fn with_close_error(self, err: TransportError) -> Self {
        *self.close_reply.lock() = Some(Err(err));
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_log.lock().len()
    }

    pub fn close_count(&self) -> usize {
        self.close_log.lock().len()
    }

    pub fn fetch_requests(&self) -> Vec<FetchResultsRequest> {
        self.fetch_log.lock().clone()
    }

    pub fn close_requests(&self) -> Vec<CloseOperationRequest> {
        self.close_log.lock().clone()
    }
}

impl RpcClient for ScriptedClient {
    fn fetch_results(
        &self,
        req: &FetchResultsRequest,
    ) -> Result<FetchResultsResponse, TransportError> {
        self.fetch_log.lock().push(req.clone());
        self.fetch_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(FetchResultsResponse::exhausted()))
    }

    fn close_operation(&self, req: &CloseOperationRequest) -> Result<RpcStatus, TransportError> {
        self.close_log.lock().push(req.clone());
        self.close_reply
            .lock()
            .take()
            .unwrap_or_else(|| Ok(RpcStatus::success()))
    }
}
