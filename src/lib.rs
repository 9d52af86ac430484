//! # session-dashboard
//!
//! Server-rendered dashboard page greeting the signed-in user.
//!
//! Each request asks a [`SessionResolver`] for the current session and
//! renders a greeting with the user's name, email and avatar. Rendering is
//! a pure function of the session, so the page can be exercised without a
//! running server.
//!
//! ## Quick Start
//!
//! ```
//! use session_dashboard::{render_dashboard, RenderOptions, Session, SessionUser};
//!
//! let session = Session::for_user(
//!     SessionUser::new()
//!         .with_name("Ana")
//!         .with_email("ana@example.com"),
//! );
//!
//! let html = render_dashboard(Some(&session), &RenderOptions::default()).unwrap();
//! assert!(html.contains("Welcome Ana"));
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use error::{DashboardError, Result};
pub use session::{
    Session, SessionResolver, SessionStore, SessionToken, SessionUser, StaticResolver,
    StoreResolver,
};
pub use view::{render_dashboard, DashboardView, MissingUser, RenderOptions};
