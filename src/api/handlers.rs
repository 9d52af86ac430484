//! HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Html,
    Json,
};

use super::types::{ApiInfo, ErrorResponse};
use crate::session::{trace_session, Session, SessionResolver, StaticResolver};
use crate::view::{render_dashboard, RenderOptions};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn SessionResolver>,
    pub render: Arc<RenderOptions>,
    /// Log each resolved session (redacted) at debug level.
    pub trace_sessions: bool,
}

impl AppState {
    pub fn new(resolver: impl SessionResolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
            render: Arc::new(RenderOptions::default()),
            trace_sessions: false,
        }
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = Arc::new(options);
        self
    }

    pub fn with_session_tracing(mut self, enabled: bool) -> Self {
        self.trace_sessions = enabled;
        self
    }

    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, ApiError> {
        let session = self.resolver.resolve(headers).await.map_err(|e| {
            tracing::error!(error = %e, "session resolution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::session_lookup_failed(e.to_string())),
            )
        })?;

        trace_session(session.as_ref(), self.trace_sessions);
        Ok(session)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StaticResolver::none())
    }
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// API information endpoint.
pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo::default())
}

/// Render the dashboard page for the caller's session.
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let session = state.resolve(&headers).await?;

    let html = render_dashboard(session.as_ref(), &state.render).map_err(|e| {
        tracing::error!(error = %e, "dashboard render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::render_failed(e.to_string())),
        )
    })?;

    Ok(Html(html))
}

/// Return the caller's session as JSON, `{}` when there is none.
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Session>, ApiError> {
    let session = state.resolve(&headers).await?;
    Ok(Json(session.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(health().await, "OK");
    }

    #[tokio::test]
    async fn test_api_info_endpoint() {
        let info = api_info().await.0;
        assert_eq!(info.name, "session-dashboard");
        assert_eq!(info.status, "running");
    }

    #[tokio::test]
    async fn test_dashboard_without_session() {
        let state = AppState::default();
        let Html(html) = dashboard(State(state), HeaderMap::new()).await.unwrap();
        assert!(html.contains("<div>"));
        assert!(!html.contains("Welcome"));
    }

    #[tokio::test]
    async fn test_current_session_empty() {
        let Json(session) = current_session(State(AppState::default()), HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(session, Session::anonymous());
    }
}
