//! Redacted diagnostic tracing of resolved sessions.

use std::fmt;

use super::{Session, SessionUser};

/// Display wrapper that prints a session with identity data masked.
///
/// `Ana Lopez <ana@example.com>` becomes `user{name=A***, email=a***@example.com, image=set}`.
pub struct RedactedSession<'a>(pub Option<&'a Session>);

impl fmt::Display for RedactedSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("none"),
            Some(Session { user: None, .. }) => f.write_str("anonymous"),
            Some(Session {
                user: Some(user), ..
            }) => write_user(f, user),
        }
    }
}

fn write_user(f: &mut fmt::Formatter<'_>, user: &SessionUser) -> fmt::Result {
    f.write_str("user{name=")?;
    match user.name.as_deref() {
        Some(name) => write!(f, "{}***", initial(name))?,
        None => f.write_str("-")?,
    }
    f.write_str(", email=")?;
    match user.email.as_deref() {
        Some(email) => write_email(f, email)?,
        None => f.write_str("-")?,
    }
    let image = if user.image.is_some() { "set" } else { "-" };
    write!(f, ", image={image}}}")
}

fn write_email(f: &mut fmt::Formatter<'_>, email: &str) -> fmt::Result {
    match email.rsplit_once('@') {
        Some((local, domain)) => write!(f, "{}***@{}", initial(local), domain),
        None => f.write_str("***"),
    }
}

fn initial(s: &str) -> &str {
    s.char_indices()
        .nth(1)
        .map(|(i, _)| &s[..i])
        .unwrap_or(s)
}

/// Emit a debug event describing the resolved session.
///
/// Does nothing unless `enabled` is set.
pub fn trace_session(session: Option<&Session>, enabled: bool) {
    if !enabled {
        return;
    }
    tracing::debug!(
        session = %RedactedSession(session),
        authenticated = session.map(Session::is_authenticated).unwrap_or(false),
        "resolved session"
    );
}
