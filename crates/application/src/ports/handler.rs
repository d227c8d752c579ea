//! Handler port
//!
//! The system under test. A handler receives fully built requests and
//! returns complete responses; the runner never opens a socket itself.

use std::future::Future;

use bytes::Bytes;
use http::{Request, Response};
use thiserror::Error;

/// Errors raised by a handler instead of a response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler could not accept the request.
    #[error("handler not ready: {0}")]
    NotReady(String),

    /// The handler failed while serving the request.
    #[error("handler failed: {0}")]
    Failed(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Port for the HTTP handler a scenario runs against.
pub trait Handler: Send {
    /// Serves one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler produced no response.
    fn handle(
        &mut self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, HandlerError>> + Send;
}
