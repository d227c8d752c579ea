//! Scenario runner
//!
//! Runs an ordered list of calls against a handler. Each response is recorded
//! in the [`ValueStore`] before the next call renders its templates, so later
//! calls can reference earlier results. Failures are reported and the run
//! continues with the next call.

use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use iffy_domain::{Call, CapturedResponse, IntoBody, RunnerSettings, preview};
use tracing::{Instrument, debug, info, info_span, trace};

use crate::error::{Failure, RunError};
use crate::ports::{Clock, Handler, Reporter, SystemClock};
use crate::report::{CallOutcome, RunReport};
use crate::template::ValueStore;

/// Runs calls in order against a handler.
pub struct Tester<H> {
    handler: H,
    calls: Vec<Call>,
    values: ValueStore,
    reporter: Box<dyn Reporter>,
    clock: Box<dyn Clock>,
    settings: RunnerSettings,
}

impl<H: Handler> Tester<H> {
    /// Creates a tester with no calls, default settings and a reporter that
    /// discards failures. Failures are then only collected in the
    /// [`RunReport`], so check it with [`RunReport::assert_passed`] or set a
    /// reporter with [`Tester::with_reporter`].
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            calls: Vec::new(),
            values: ValueStore::new(),
            reporter: Box::new(()),
            clock: Box::new(SystemClock),
            settings: RunnerSettings::default(),
        }
    }

    /// Appends `calls` to the scenario.
    #[must_use]
    pub fn with_calls(mut self, calls: impl IntoIterator<Item = Call>) -> Self {
        self.calls.extend(calls);
        self
    }

    /// Sets the failure reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Sets the runner settings.
    #[must_use]
    pub fn with_settings(mut self, settings: RunnerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the clock used to stamp reports.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Appends a new call and returns it for further configuration.
    pub fn add_call(
        &mut self,
        name: impl Into<String>,
        method: Method,
        query: impl Into<String>,
        body: impl IntoBody,
    ) -> &mut Call {
        let index = self.calls.len();
        self.calls.push(Call::new(name, method, query, body));
        &mut self.calls[index]
    }

    /// Appends a prepared call.
    pub fn push(&mut self, call: Call) -> &mut Self {
        self.calls.push(call);
        self
    }

    /// Returns the calls in run order.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Returns the values captured so far.
    #[must_use]
    pub const fn values(&self) -> &ValueStore {
        &self.values
    }

    /// Returns the runner settings.
    #[must_use]
    pub const fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Returns the handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Runs every call in order.
    ///
    /// Never stops early: each failure is passed to the reporter, collected in
    /// the returned report, and the run moves on.
    pub async fn run(&mut self) -> RunReport {
        let Self {
            handler,
            calls,
            values,
            reporter,
            clock,
            settings,
        } = self;

        let mut report = RunReport::new(clock.now());
        let started = Instant::now();
        info!(run_id = %report.run_id, calls = calls.len(), "starting run");

        let mut sink = FailureSink {
            reporter: &mut **reporter,
            failures: &mut report.failures,
        };
        let mut outcomes = Vec::with_capacity(calls.len());
        for call in calls.iter() {
            let span = info_span!("call", name = call.name(), method = %call.method());
            let outcome = run_call(handler, call, values, settings, &mut sink)
                .instrument(span)
                .await;
            outcomes.push(outcome);
        }

        report.outcomes = outcomes;
        report.elapsed = started.elapsed();
        info!(
            run_id = %report.run_id,
            failures = report.failures.len(),
            elapsed_ms = report.elapsed.as_millis(),
            "run finished"
        );
        report
    }
}

/// Forwards failures to the reporter and keeps them for the report.
struct FailureSink<'a> {
    reporter: &'a mut dyn Reporter,
    failures: &'a mut Vec<Failure>,
}

impl FailureSink<'_> {
    fn report(&mut self, call: &str, error: impl Into<RunError>) {
        let failure = Failure::new(call, error);
        debug!(%failure, "call failed");
        self.reporter.error(&failure);
        self.failures.push(failure);
    }
}

async fn run_call<H: Handler>(
    handler: &mut H,
    call: &Call,
    values: &mut ValueStore,
    settings: &RunnerSettings,
    sink: &mut FailureSink<'_>,
) -> CallOutcome {
    let started = Instant::now();
    let mut outcome = CallOutcome {
        name: call.name().to_string(),
        method: call.method().clone(),
        uri: None,
        status: None,
        elapsed: Duration::ZERO,
    };

    if let Err(error) = exchange(handler, call, values, settings, sink, &mut outcome).await {
        sink.report(call.name(), error);
    }

    outcome.elapsed = started.elapsed();
    outcome
}

/// Sends one call and checks its response. An error skips the rest of the call.
async fn exchange<H: Handler>(
    handler: &mut H,
    call: &Call,
    values: &mut ValueStore,
    settings: &RunnerSettings,
    sink: &mut FailureSink<'_>,
    outcome: &mut CallOutcome,
) -> Result<(), RunError> {
    let body = call.body().build(&*values)?;
    let uri = values.apply(call.query())?;
    outcome.uri = Some(uri.clone());

    let request = build_request(call, &uri, body, values, settings, sink)?;
    debug!(%uri, "sending request");
    if settings.log_bodies {
        let body = String::from_utf8_lossy(request.body());
        trace!(body = %preview(&body, settings.body_preview_limit), "request body");
    }

    let response = handler.handle(request).await?;
    let (parts, body) = response.into_parts();
    outcome.status = Some(parts.status);
    debug!(status = %parts.status, bytes = body.len(), "received response");
    if settings.log_bodies {
        let text = String::from_utf8_lossy(&body);
        trace!(body = %preview(&text, settings.body_preview_limit), "response body");
    }

    let mut captured = CapturedResponse::new(parts.status, parts.headers, &body)
        .with_preview_limit(settings.body_preview_limit);
    if let Some(target) = call.decode_target() {
        let decoded = target.decode(&body).map_err(RunError::Decode)?;
        captured = captured.with_decoded(decoded);
    }
    values.record(call.name(), &body);

    for checker in call.checkers() {
        if let Err(error) = checker.check(&captured) {
            sink.report(call.name(), error);
        }
    }
    Ok(())
}

fn build_request(
    call: &Call,
    uri: &str,
    body: Vec<u8>,
    values: &ValueStore,
    settings: &RunnerSettings,
    sink: &mut FailureSink<'_>,
) -> Result<Request<Bytes>, RunError> {
    let target: Uri = uri.parse().map_err(|e: http::uri::InvalidUri| RunError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    let mut headers = HeaderMap::new();
    let declared = call.body().content_type();
    let content_type = if !declared.is_empty() {
        Some(declared)
    } else if body.is_empty() {
        None
    } else {
        settings.default_content_type.as_deref()
    };
    if let Some(content_type) = content_type {
        insert_header(&mut headers, CONTENT_TYPE.as_str(), content_type)?;
    }

    for (name, value) in settings.default_headers.iter().chain(call.header_templates()) {
        let rendered = values
            .apply(name)
            .and_then(|name| Ok((name, values.apply(value)?)));
        match rendered {
            Ok((name, value)) => insert_header(&mut headers, &name, &value)?,
            Err(error) => sink.report(call.name(), error),
        }
    }

    let mut request = Request::new(Bytes::from(body));
    *request.method_mut() = call.method().clone();
    *request.uri_mut() = target;
    *request.headers_mut() = headers;
    Ok(request)
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), RunError> {
    let invalid = |reason: String| RunError::InvalidHeader {
        name: name.to_string(),
        reason,
    };
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    headers.insert(header_name, header_value);
    Ok(())
}
