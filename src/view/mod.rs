//! HTML views.

mod dashboard;

pub use dashboard::{
    render_dashboard, DashboardView, Greeting, MissingUser, RenderOptions, AVATAR_SIZE,
};
