//! Handler adapter over a plain closure.

use std::future::{Future, ready};

use bytes::Bytes;
use http::{Request, Response};
use iffy_application::ports::{Handler, HandlerError};

/// Serves calls with a synchronous closure. Created by [`handler_fn`].
#[derive(Debug, Clone)]
pub struct FnHandler<F> {
    respond: F,
}

/// Wraps a closure mapping each request to a response.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use http::Response;
/// use iffy_infrastructure::handler_fn;
///
/// let handler = handler_fn(|_request| Response::new(Bytes::from_static(b"{}")));
/// # let _ = handler;
/// ```
pub const fn handler_fn<F>(respond: F) -> FnHandler<F>
where
    F: FnMut(Request<Bytes>) -> Response<Bytes> + Send,
{
    FnHandler { respond }
}

impl<F> Handler for FnHandler<F>
where
    F: FnMut(Request<Bytes>) -> Response<Bytes> + Send,
{
    fn handle(
        &mut self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, HandlerError>> + Send {
        ready(Ok((self.respond)(request)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_closure_sees_every_request() {
        let mut count = 0;
        let mut handler = handler_fn(move |request: Request<Bytes>| {
            count += 1;
            Response::builder()
                .status(StatusCode::ACCEPTED)
                .body(Bytes::from(format!("{} #{count}", request.uri().path())))
                .unwrap()
        });

        handler.handle(Request::new(Bytes::new())).await.unwrap();
        let response = handler
            .handle(Request::builder().uri("/b").body(Bytes::new()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.body().as_ref(), b"/b #2");
    }
}
