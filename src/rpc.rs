//! Request, response and status types shared by the handler chain.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metadata::Metadata;

/// An outbound call: fully qualified method path plus an opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: String,
    payload: Value,
}

impl Request {
    /// Creates a request for `method` (e.g. `/pkg.Service/Method`).
    pub fn new(method: impl Into<String>, payload: Value) -> Self {
        Self {
            method: method.into(),
            payload,
        }
    }

    /// The method path.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// A successful response payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    payload: Value,
}

impl Response {
    /// Wraps a response payload.
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// The response payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consumes the response, returning its payload.
    pub fn into_payload(self) -> Value {
        self.payload
    }
}

/// gRPC status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    /// Not an error.
    Ok,
    /// The operation was cancelled.
    Cancelled,
    /// Unknown error.
    Unknown,
    /// Client specified an invalid argument.
    InvalidArgument,
    /// Deadline expired before the operation completed.
    DeadlineExceeded,
    /// Requested entity was not found.
    NotFound,
    /// Entity already exists.
    AlreadyExists,
    /// Caller lacks permission.
    PermissionDenied,
    /// A resource has been exhausted.
    ResourceExhausted,
    /// System is not in a state required for the operation.
    FailedPrecondition,
    /// The operation was aborted.
    Aborted,
    /// Operation attempted past the valid range.
    OutOfRange,
    /// Operation is not implemented.
    Unimplemented,
    /// Internal error.
    Internal,
    /// Service is currently unavailable.
    Unavailable,
    /// Unrecoverable data loss.
    DataLoss,
    /// Request lacks valid authentication credentials.
    Unauthenticated,
}

impl Code {
    /// Maps a numeric gRPC code; unknown values become [`Code::Unknown`].
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Code::Ok,
            1 => Code::Cancelled,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }

    /// The numeric gRPC code.
    pub fn as_i32(self) -> i32 {
        match self {
            Code::Ok => 0,
            Code::Cancelled => 1,
            Code::Unknown => 2,
            Code::InvalidArgument => 3,
            Code::DeadlineExceeded => 4,
            Code::NotFound => 5,
            Code::AlreadyExists => 6,
            Code::PermissionDenied => 7,
            Code::ResourceExhausted => 8,
            Code::FailedPrecondition => 9,
            Code::Aborted => 10,
            Code::OutOfRange => 11,
            Code::Unimplemented => 12,
            Code::Internal => 13,
            Code::Unavailable => 14,
            Code::DataLoss => 15,
            Code::Unauthenticated => 16,
        }
    }
}

/// A failed call as reported by the transport or the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    /// Creates a status.
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The status code.
    pub fn code(&self) -> Code {
        self.code
    }

    /// The status message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} ({}): {}",
            self.code,
            self.code.as_i32(),
            self.message
        )
    }
}

impl std::error::Error for Status {}

/// A stage that completes an outbound call.
///
/// The transport at the end of the chain implements this, and so does
/// [`Chain`](crate::interceptor::Chain) so interceptor stacks can be nested.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Sends `request` with `metadata` and waits for the outcome.
    async fn handle(&self, request: Request, metadata: Metadata) -> Result<Response, Status>;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for std::sync::Arc<H> {
    async fn handle(&self, request: Request, metadata: Metadata) -> Result<Response, Status> {
        (**self).handle(request, metadata).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_numbers_round_trip() {
        for n in 0..=16 {
            assert_eq!(Code::from_i32(n).as_i32(), n);
        }
        assert_eq!(Code::from_i32(99), Code::Unknown);
    }

    #[test]
    fn status_display_includes_code_and_message() {
        let status = Status::new(Code::Unauthenticated, "token expired");
        let out = status.to_string();

        assert!(out.contains("Unauthenticated"));
        assert!(out.contains("16"));
        assert!(out.contains("token expired"));
    }

    #[test]
    fn request_accessors() {
        let req = Request::new("/svc/Method", serde_json::json!({"id": "1"}));
        assert_eq!(req.method(), "/svc/Method");
        assert_eq!(req.payload()["id"], "1");
    }
}
