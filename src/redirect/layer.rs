//! Tower middleware wrapping the redirect decision.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{header, HeaderValue, Request, Response};
use futures_util::future::{self, Either, Ready};
use tower::{Layer, Service};

use crate::observability::logging::{DiagnosticLogger, NoopLogger};
use crate::redirect::decision::{decide, RedirectConfig, RedirectOutcome, RedirectStatus};
use crate::redirect::target::RequestTarget;

/// Layer that redirects requests for the old domain.
#[derive(Debug, Clone)]
pub struct RedirectLayer {
    config: Arc<RedirectConfig>,
    logger: Arc<dyn DiagnosticLogger>,
}

impl RedirectLayer {
    /// Create a layer without diagnostics.
    pub fn new(config: RedirectConfig) -> Self {
        Self {
            config: Arc::new(config),
            logger: Arc::new(NoopLogger),
        }
    }

    /// Emit decision diagnostics through `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn DiagnosticLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }
}

impl<S> Layer<S> for RedirectLayer {
    type Service = RedirectService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RedirectService {
            inner,
            config: self.config.clone(),
            logger: self.logger.clone(),
        }
    }
}

/// Service produced by [`RedirectLayer`].
#[derive(Debug, Clone)]
pub struct RedirectService<S> {
    inner: S,
    config: Arc<RedirectConfig>,
    logger: Arc<dyn DiagnosticLogger>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RedirectService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: Default,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Either<Ready<Result<Response<ResBody>, S::Error>>, S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let Some(target) = RequestTarget::from_request(&req) else {
            return Either::Right(self.inner.call(req));
        };

        self.logger
            .debug(&format!("received request from host: {}", target));

        match decide(&target, &self.config) {
            RedirectOutcome::PassThrough => Either::Right(self.inner.call(req)),
            RedirectOutcome::Redirect { location, status } => {
                match HeaderValue::from_str(&location) {
                    Ok(value) => {
                        self.logger.debug(&format!("redirecting to: {}", location));
                        Either::Left(future::ready(Ok(redirect_response(status, value))))
                    }
                    Err(e) => {
                        tracing::warn!(location = %location, error = %e, "Redirect target is not a valid header value");
                        Either::Right(self.inner.call(req))
                    }
                }
            }
        }
    }
}

fn redirect_response<B: Default>(status: RedirectStatus, location: HeaderValue) -> Response<B> {
    let mut response = Response::new(B::default());
    *response.status_mut() = status.status_code();
    response.headers_mut().insert(header::LOCATION, location);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::decision::TargetMode;
    use axum::http::StatusCode;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::{service_fn, ServiceExt};

    #[derive(Debug, Default)]
    struct RecordingLogger {
        messages: Mutex<Vec<String>>,
    }

    impl DiagnosticLogger for RecordingLogger {
        fn debug(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn redirect_layer(status: RedirectStatus) -> RedirectLayer {
        RedirectLayer::new(
            RedirectConfig::new(
                "deploywithdockercompose.com",
                "deploywithdockercompose.webdevwithmatt.com",
                status,
                TargetMode::Substitute,
            )
            .unwrap(),
        )
    }

    async fn call(
        layer: RedirectLayer,
        uri: &str,
    ) -> (Response<String>, usize) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let next = service_fn(move |_req: Request<String>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(
                    Response::builder()
                        .status(StatusCode::NO_CONTENT)
                        .header("x-next", "handled")
                        .body(String::new())
                        .unwrap(),
                )
            }
        });

        let req = Request::builder().uri(uri).body(String::new()).unwrap();
        let response = layer.layer(next).oneshot(req).await.unwrap();
        (response, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_redirects_old_domain_and_logs_twice() {
        let cases = [
            (
                "https://deploywithdockercompose.com",
                "https://deploywithdockercompose.webdevwithmatt.com/",
            ),
            (
                "https://deploywithdockercompose.com/api/ping",
                "https://deploywithdockercompose.webdevwithmatt.com/api/ping",
            ),
            (
                "https://deploywithdockercompose.com/?display=dark",
                "https://deploywithdockercompose.webdevwithmatt.com/?display=dark",
            ),
            (
                "https://deploywithdockercompose.com/api/ping?display=dark",
                "https://deploywithdockercompose.webdevwithmatt.com/api/ping?display=dark",
            ),
        ];

        for (original, expected) in cases {
            let logger = Arc::new(RecordingLogger::default());
            let layer = redirect_layer(RedirectStatus::default()).with_logger(logger.clone());
            let (response, next_calls) = call(layer, original).await;

            assert_eq!(next_calls, 0);
            assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(response.headers()[header::LOCATION], expected);

            let messages = logger.messages.lock().unwrap();
            assert_eq!(messages.len(), 2);
            assert!(messages[0].starts_with("received request from host: https://deploywithdockercompose.com"));
            assert_eq!(messages[1], format!("redirecting to: {}", expected));
        }
    }

    #[tokio::test]
    async fn test_passes_other_hosts_to_next_handler() {
        for original in [
            "https://deploywithdockercompose.webdevwithmatt.com/",
            "https://webdevwithmatt.com/",
            "https://example.com/",
            "https://localhost/",
            "https://DEPLOYWITHDOCKERCOMPOSE.COM/",
        ] {
            let logger = Arc::new(RecordingLogger::default());
            let layer = redirect_layer(RedirectStatus::default()).with_logger(logger.clone());
            let (response, next_calls) = call(layer, original).await;

            assert_eq!(next_calls, 1);
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
            assert_eq!(response.headers()["x-next"], "handled");

            let messages = logger.messages.lock().unwrap();
            assert_eq!(*messages, vec![format!("received request from host: {}", original)]);
        }
    }

    #[tokio::test]
    async fn test_redirect_status() {
        for (code, expected) in [
            (301, StatusCode::MOVED_PERMANENTLY),
            (302, StatusCode::FOUND),
            (303, StatusCode::MOVED_PERMANENTLY),
        ] {
            let layer = redirect_layer(RedirectStatus::from_code(code));
            let (response, _) = call(layer, "https://deploywithdockercompose.com/api/ping?display=dark").await;
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_forwarded_proto_cannot_change_redirect_host() {
        for (proto, expected) in [
            ("https://evil.example/#", "http://deploywithdockercompose.webdevwithmatt.com/api"),
            ("evil.example", "http://deploywithdockercompose.webdevwithmatt.com/api"),
            ("https", "https://deploywithdockercompose.webdevwithmatt.com/api"),
        ] {
            let next = service_fn(|_req: Request<String>| async {
                Ok::<_, Infallible>(Response::new(String::new()))
            });
            let req = Request::builder()
                .uri("/api")
                .header(header::HOST, "deploywithdockercompose.com")
                .header("x-forwarded-proto", proto)
                .body(String::new())
                .unwrap();

            let response = redirect_layer(RedirectStatus::default())
                .layer(next)
                .oneshot(req)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(response.headers()[header::LOCATION], expected, "{proto:?}");
        }
    }

    #[tokio::test]
    async fn test_request_without_host_passes_through() {
        let (response, next_calls) = call(redirect_layer(RedirectStatus::default()), "/api/ping").await;
        assert_eq!(next_calls, 1);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
