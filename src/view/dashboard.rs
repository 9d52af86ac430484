//! Dashboard page rendering.

use std::fmt;
use std::str::FromStr;

use askama::Template;
use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::Result;

/// What to show when the session has no user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingUser {
    /// Render an empty container.
    #[default]
    Empty,
    /// Render the greeting anyway, with placeholders for every field.
    Placeholder,
}

impl FromStr for MissingUser {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(format!("expected 'empty' or 'placeholder', got '{other}'")),
        }
    }
}

impl fmt::Display for MissingUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Placeholder => f.write_str("placeholder"),
        }
    }
}

/// Presentation settings for the dashboard page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Document title.
    pub title: String,
    /// Behavior when no user is signed in.
    pub missing_user: MissingUser,
    /// Text substituted for absent user fields.
    pub placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Dashboard".to_string(),
            missing_user: MissingUser::Empty,
            placeholder: String::new(),
        }
    }
}

impl RenderOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_missing_user(mut self, mode: MissingUser) -> Self {
        self.missing_user = mode;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

/// Avatar display size in CSS pixels.
pub const AVATAR_SIZE: u32 = 100;

/// The greeting block shown for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

/// Template context for the dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardView {
    pub title: String,
    pub greeting: Option<Greeting>,
    pub avatar_size: u32,
}

impl DashboardView {
    /// Build the view for a (possibly absent) session.
    pub fn build(session: Option<&Session>, options: &RenderOptions) -> Self {
        let user = session.and_then(Session::user);

        let greeting = match (user, options.missing_user) {
            (None, MissingUser::Empty) => None,
            (user, _) => {
                let field = |value: Option<&String>| {
                    value
                        .cloned()
                        .unwrap_or_else(|| options.placeholder.clone())
                };
                Some(Greeting {
                    name: field(user.and_then(|u| u.name.as_ref())),
                    email: field(user.and_then(|u| u.email.as_ref())),
                    image: user
                        .and_then(|u| u.image.as_deref())
                        .and_then(safe_image_src)
                        .map(str::to_string),
                })
            }
        };

        Self {
            title: options.title.clone(),
            greeting,
            avatar_size: AVATAR_SIZE,
        }
    }
}

/// Accept `http(s)` URLs and root-relative paths only.
///
/// Returns the trimmed source. Anything a browser could read as
/// protocol-relative (`//host`, `/\host`, or with a control character
/// between the slashes) is rejected.
fn safe_image_src(src: &str) -> Option<&str> {
    let src = src.trim();
    let lower = src.to_ascii_lowercase();

    let clean = !src
        .chars()
        .any(|c| c.is_ascii_control() || c.is_ascii_whitespace());
    let absolute = lower.starts_with("https://") || lower.starts_with("http://");
    let root_relative =
        src.starts_with('/') && !matches!(src.as_bytes().get(1), Some(b'/' | b'\\'));

    if clean && (absolute || root_relative) {
        Some(src)
    } else {
        tracing::debug!("dropping avatar with unsupported source");
        None
    }
}

/// Render the dashboard page for a session.
///
/// Pure: equal inputs give byte-identical output.
pub fn render_dashboard(session: Option<&Session>, options: &RenderOptions) -> Result<String> {
    Ok(DashboardView::build(session, options).render()?)
}
