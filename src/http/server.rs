//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the fallback handler
//! - Wire up middleware (tracing, redirect)
//! - Bind server to listener
//! - Shut down gracefully on Ctrl+C

use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::redirect::RedirectLayer;

/// HTTP server for the redirect middleware.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and redirect layer.
    pub fn new(config: AppConfig, redirect: RedirectLayer) -> Self {
        let router = Self::build_router(redirect);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(redirect: RedirectLayer) -> Router {
        Router::new()
            .fallback(fallback_handler)
            .layer(redirect)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The router, for embedding or driving without a listener.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Next handler for requests that are not redirected.
async fn fallback_handler(uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "No redirect for request");
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::{RedirectConfig, RedirectStatus, TargetMode};
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let config = RedirectConfig::new("old.com", "new.org", RedirectStatus::Found, TargetMode::Substitute).unwrap();
        HttpServer::new(AppConfig::default(), RedirectLayer::new(config))
    }

    #[tokio::test]
    async fn test_router_redirects_old_domain() {
        let req = Request::builder()
            .uri("/api/ping?display=dark")
            .header(header::HOST, "old.com")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();

        let response = server().into_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://new.org/api/ping?display=dark"
        );
    }

    #[tokio::test]
    async fn test_router_falls_back_for_other_hosts() {
        let req = Request::builder()
            .uri("/api/ping")
            .header(header::HOST, "new.org")
            .body(Body::empty())
            .unwrap();

        let response = server().into_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::LOCATION).is_none());
    }
}
