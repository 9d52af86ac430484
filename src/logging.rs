//! Logging initialization and configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor a configured level applies.
pub const DEFAULT_FILTER: &str = "session_dashboard=info,tower_http=info";

/// Resolve the filter directive.
///
/// A configured level always wins. `RUST_LOG` only applies when no level
/// was configured. A bare level such as `debug` is scoped to this crate
/// and `tower_http`, and anything containing a directive (`=` or `,`) is
/// used as-is.
fn filter_directive(level: Option<&str>, rust_log: Option<&str>) -> String {
    let scoped = |l: &str| {
        if l.contains('=') || l.contains(',') {
            l.to_string()
        } else {
            format!("session_dashboard={l},tower_http={l}")
        }
    };

    match (level, rust_log) {
        (Some(l), _) if !l.trim().is_empty() => scoped(l.trim()),
        (None, Some(env)) if !env.trim().is_empty() => env.trim().to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

fn build_filter(level: Option<&str>) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(level, rust_log.as_deref());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Subscriber used while the configuration is still loading.
///
/// Prints warnings and errors to stderr so problems found before
/// [`init`] runs are not lost.
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .finish()
}

/// Initialize the logging system.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init(level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

/// Try to initialize the logging system.
///
/// Returns `Err` if logging has already been initialized.
pub fn try_init(level: Option<&str>) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}

/// Capture formatted events emitted while a closure runs.
#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a thread-local DEBUG subscriber and return its output.
    pub(crate) fn logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let output = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
        (result, output)
    }
}
