//! HTTP host for the attendance server: owns the listener, the cross-cutting
//! middleware stack and the service-level endpoints (`/health`, OpenAPI docs).
//! Domain modules hand in their routes as a plain `axum::Router`.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::Request,
    middleware::from_fn,
    response::{Json, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

mod config;
mod request_id;
mod web;

pub use config::ApiIngressConfig;
pub use request_id::{CorrelationId, REQUEST_ID_HEADER};

pub struct ApiIngress {
    config: ApiIngressConfig,
    openapi: Option<utoipa::openapi::OpenApi>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            openapi: None,
        }
    }

    /// Document served at `/openapi.json` when `enable_docs` is set.
    pub fn with_openapi(mut self, doc: utoipa::openapi::OpenApi) -> Self {
        self.openapi = Some(doc);
        self
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Build the HTTP router: service endpoints + module routes + middleware.
    pub fn build_router(&self, routes: Router) -> Router {
        let mut router = Router::new()
            .route("/health", get(web::health))
            .merge(routes);

        if self.config.enable_docs {
            match self.openapi.clone() {
                Some(doc) => {
                    router = router
                        .route(
                            "/openapi.json",
                            get(move || {
                                let doc = doc.clone();
                                async move { Json(doc) }
                            }),
                        )
                        .route("/docs", get(web::docs));
                }
                None => tracing::warn!("enable_docs is set but no OpenAPI document was provided"),
            }
        }

        // Layers wrap everything added before them, so the last one is outermost:
        // PropagateRequestId -> SetRequestId -> Trace -> push_req_id -> Timeout -> CORS -> BodyLimit
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router = router
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(from_fn(request_id::expose_request_id))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "http_request",
                            method = %req.method(),
                            uri = %req.uri().path(),
                            version = ?req.version(),
                            request_id = Empty,
                            status = Empty,
                            latency_ms = Empty
                        )
                    })
                    .on_response(
                        |response: &Response, latency: Duration, span: &tracing::Span| {
                            span.record("status", response.status().as_u16());
                            span.record("latency_ms", latency.as_millis() as u64);
                            tracing::debug!("response sent");
                        },
                    ),
            )
            .layer(SetRequestIdLayer::new(
                request_id::header_name(),
                request_id::ShortIds,
            ))
            .layer(PropagateRequestIdLayer::new(request_id::header_name()));

        router
    }

    /// Bind `bind_addr` and serve until `shutdown` resolves.
    pub async fn serve<F>(&self, routes: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr.as_str())
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind_addr))?;
        let local = listener.local_addr()?;
        tracing::info!(addr = %local, "HTTP server listening");

        axum::serve(listener, self.build_router(routes))
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server terminated with an error")?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
