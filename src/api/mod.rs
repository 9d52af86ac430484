//! HTTP layer for session-dashboard.
//!
//! ## Endpoints
//!
//! - `GET /`, `GET /dashboard` - Dashboard page (HTML)
//! - `GET /api/v1/session` - Current session as JSON (`{}` when signed out)
//! - `GET /api/v1` - API information
//! - `GET /health` - Health check
//!
//! ## Example
//!
//! ```no_run
//! use session_dashboard::api::{serve, AppState, ServerConfig};
//! use session_dashboard::session::StaticResolver;
//!
//! #[tokio::main]
//! async fn main() -> session_dashboard::Result<()> {
//!     let state = AppState::new(StaticResolver::none());
//!     serve(ServerConfig::new("127.0.0.1", 3000), state).await
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod types;

pub use handlers::AppState;
pub use router::{create_router, create_router_with_state, serve, ServerConfig};
pub use types::{ApiInfo, ErrorResponse};
