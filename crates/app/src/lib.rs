//! Iffy - scenario tests for HTTP handlers
//!
//! A scenario is an ordered list of calls run against an in-process handler.
//! Each response body is captured under its call name, and later calls splice
//! captured values into their path, headers and body with
//! `{{field "call" "key"}}` and `{{json "call" "key"}}`.
//!
//! # Usage
//!
//! ```
//! use axum::extract::Path;
//! use axum::routing::{get, post};
//! use axum::{Json, Router};
//! use iffy::prelude::*;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router = Router::new()
//!     .route("/items", post(|| async { (StatusCode::CREATED, Json(json!({"id": 7}))) }))
//!     .route(
//!         "/items/{id}",
//!         get(|Path(id): Path<u32>| async move { Json(json!({"id": id, "name": "widget"})) }),
//!     );
//!
//! let mut tester = iffy::tester(router);
//! tester
//!     .add_call("create", Method::POST, "/items", ())
//!     .check(expect_status(201));
//! tester
//!     .add_call("fetch", Method::GET, r#"/items/{{field "create" "id"}}"#, ())
//!     .check(expect_status(200))
//!     .check(expect_json_fields(["id", "name"]));
//!
//! tester.run().await.assert_passed();
//! # }
//! ```

pub use bytes::Bytes;
pub use http::{self, Method, Request, Response, StatusCode};

pub use iffy_application::{
    CallOutcome, Clock, Failure, Handler, HandlerError, Reporter, RunError, RunReport,
    SystemClock, Tester, ValueStore,
};
pub use iffy_domain::{
    Body, BodyError, Call, Captured, CapturedResponse, CheckError, Checker, DecodeTarget,
    FormBody, IntoBody, JsonBody, NO_VALUE, NoopBody, Render, RenderError, RunnerSettings,
    StringBody,
};
pub use iffy_infrastructure::{
    CollectingReporter, ConfigError, FnHandler, ServiceHandler, TracingReporter, config,
    handler_fn, init_tracing, load_settings, settings_from_env, testing,
};

/// Creates a tester serving calls through `service` and logging failures.
///
/// `service` is any tower service over `http` types, such as an axum `Router`.
pub fn tester<S>(service: S) -> Tester<ServiceHandler<S>>
where
    ServiceHandler<S>: Handler,
{
    Tester::new(ServiceHandler::new(service)).with_reporter(TracingReporter)
}

/// Everything a scenario usually needs.
pub mod prelude {
    pub use crate::testing::{
        expect_body_contains, expect_body_matches, expect_content_type, expect_decoded,
        expect_header, expect_json_branch, expect_json_fields, expect_list_length,
        expect_list_non_empty, expect_status,
    };
    pub use crate::{
        Call, Captured, CapturedResponse, CheckError, FormBody, JsonBody, Method, RunnerSettings,
        StatusCode, StringBody, Tester, tester,
    };
}
