//! Session model, storage and resolution.
//!
//! The dashboard never looks a session up on its own; it asks a
//! [`SessionResolver`] and renders whatever comes back.

mod model;
mod resolver;
mod store;
mod token;
pub mod trace;

pub use model::{Session, SessionUser};
pub use resolver::{SessionResolver, StaticResolver, StoreResolver, DEFAULT_COOKIE_NAME};
pub use store::{SessionStore, StoredSession};
pub use token::{InvalidToken, SessionToken};
pub use trace::{trace_session, RedactedSession};
