//! Command-line interface for session-dashboard.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::view::MissingUser;

/// Command-line arguments.
///
/// Options left unset fall through to the environment and config file.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Host address to bind to.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Log resolved sessions (redacted) at debug level.
    pub trace_sessions: bool,
    /// What to render when nobody is signed in.
    pub missing_user: Option<MissingUser>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                result.host = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("host", value))?,
                );
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Long("trace-sessions") => {
                result.trace_sessions = true;
            }
            Long("missing-user") => {
                let value: String = parser.value()?.parse()?;
                result.missing_user = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("missing-user", value))?,
                );
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"session-dashboard {version}
Server-rendered dashboard greeting the signed-in user

USAGE:
    session-dashboard [OPTIONS]

OPTIONS:
    -H, --host <ADDR>             Host address to bind [default: 127.0.0.1]
    -p, --port <PORT>             Port to listen on [default: 3000]
    -c, --config <FILE>           Path to configuration file (JSON)
    -l, --log-level <LVL>         Log level (error, warn, info, debug, trace)
        --trace-sessions          Log resolved sessions (redacted) at debug level
        --missing-user <MODE>     Signed-out rendering: empty | placeholder
    -h, --help                    Print help
    -V, --version                 Print version

ENVIRONMENT VARIABLES:
    SESSION_DASHBOARD_HOST            Host address (overrides config)
    SESSION_DASHBOARD_PORT            Port number (overrides config)
    SESSION_DASHBOARD_LOG_LEVEL       Log level (overrides config)
    SESSION_DASHBOARD_TRACE_SESSIONS  Set to 1 to trace sessions
    RUST_LOG                          Alternative log level setting

EXAMPLES:
    # Start with defaults (localhost:3000)
    session-dashboard

    # Seeded sessions from a config file, debug tracing on
    session-dashboard -c dashboard.json -l debug --trace-sessions
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("session-dashboard {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("session-dashboard")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.host.is_none());
        assert!(result.port.is_none());
        assert!(!result.trace_sessions);
        assert!(result.missing_user.is_none());
    }

    #[test]
    fn test_host_port() {
        let result = parse_args_from(args(&["-H", "0.0.0.0", "-p", "8080"])).unwrap();
        assert_eq!(result.host.unwrap().to_string(), "0.0.0.0");
        assert_eq!(result.port, Some(8080));
    }

    #[test]
    fn test_long_options() {
        let result =
            parse_args_from(args(&["--host", "192.168.1.1", "--port", "9000"])).unwrap();
        assert_eq!(result.host.unwrap().to_string(), "192.168.1.1");
        assert_eq!(result.port, Some(9000));
    }

    #[test]
    fn test_config_file() {
        let result = parse_args_from(args(&["-c", "/etc/dashboard.json"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/dashboard.json")));
    }

    #[test]
    fn test_trace_sessions() {
        let result = parse_args_from(args(&["--trace-sessions"])).unwrap();
        assert!(result.trace_sessions);
    }

    #[test]
    fn test_missing_user() {
        let result = parse_args_from(args(&["--missing-user", "placeholder"])).unwrap();
        assert_eq!(result.missing_user, Some(MissingUser::Placeholder));

        let err = parse_args_from(args(&["--missing-user", "hide"])).unwrap_err();
        assert!(err.to_string().contains("--missing-user"));
    }

    #[test]
    fn test_help_and_version_flags() {
        assert!(parse_args_from(args(&["-h"])).unwrap().help);
        assert!(parse_args_from(args(&["--help"])).unwrap().help);
        assert!(parse_args_from(args(&["-V"])).unwrap().version);
        assert!(parse_args_from(args(&["--version"])).unwrap().version);
    }

    #[test]
    fn test_invalid_port() {
        assert!(parse_args_from(args(&["-p", "invalid"])).is_err());
    }

    #[test]
    fn test_invalid_host() {
        assert!(parse_args_from(args(&["-H", "not-an-ip"])).is_err());
    }

    #[test]
    fn test_unexpected_positional() {
        let err = parse_args_from(args(&["serve"])).unwrap_err();
        assert!(matches!(err, ArgsError::UnexpectedArgument(_)));
    }
}
