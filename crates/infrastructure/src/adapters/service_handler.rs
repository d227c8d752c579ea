//! Handler adapter over a tower service.
//!
//! This adapter implements the `Handler` port for any `tower::Service` that
//! speaks `http` types, such as an axum `Router`. Requests are served in
//! process; no socket is opened.

use std::fmt::Display;
use std::future::Future;

use bytes::Bytes;
use http::{Request, Response};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use iffy_application::ports::{Handler, HandlerError};
use tower::{Service, ServiceExt};

/// Serves calls through a tower service.
#[derive(Debug, Clone)]
pub struct ServiceHandler<S> {
    service: S,
}

impl<S> ServiceHandler<S> {
    /// Wraps `service`.
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// Returns the wrapped service.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Unwraps the service.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.service
    }
}

impl<S, B> Handler for ServiceHandler<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<B>> + Send,
    S::Future: Send,
    S::Error: Display,
    B: Body + Send,
    B::Data: Send,
    B::Error: Display,
{
    fn handle(
        &mut self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, HandlerError>> + Send {
        let request = request.map(Full::new);
        async move {
            let service = ServiceExt::<Request<Full<Bytes>>>::ready(&mut self.service)
                .await
                .map_err(|e| HandlerError::NotReady(e.to_string()))?;

            let response = service
                .call(request)
                .await
                .map_err(|e| HandlerError::Failed(e.to_string()))?;

            // Read body
            let (parts, body) = response.into_parts();
            let bytes = body
                .collect()
                .await
                .map_err(|e| HandlerError::Body(e.to_string()))?
                .to_bytes();

            Ok(Response::from_parts(parts, bytes))
        }
    }
}
