use crate::dataset::errors::DataSetError;
use crate::rpc::status::{RpcStatus, SUCCESS_STATUS};

#[test]
fn success_status_verifies() {
    let status = RpcStatus::success();
    assert_eq!(status.code, SUCCESS_STATUS);
    assert!(status.is_success());
    assert!(status.verify_success().is_ok());
}

#[test]
fn failure_status_keeps_server_message_unchanged() {
    let status = RpcStatus::failure(301, "Statement is not right: select * fro root");
    match status.verify_success() {
        Err(DataSetError::ServerExecution { code, message }) => {
            assert_eq!(code, 301);
            assert_eq!(message, "Statement is not right: select * fro root");
        }
        other => panic!("expected ServerExecution, got {other:?}"),
    }
}

#[test]
fn failure_without_message_yields_empty_text() {
    let status = RpcStatus {
        code: 500,
        message: None,
    };
    match status.verify_success() {
        Err(DataSetError::ServerExecution { message, .. }) => assert!(message.is_empty()),
        other => panic!("expected ServerExecution, got {other:?}"),
    }
}

#[test]
fn display_includes_code_and_message() {
    assert_eq!(RpcStatus::success().to_string(), "200");
    assert_eq!(RpcStatus::failure(400, "bad").to_string(), "400: bad");
}
