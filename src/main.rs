//! session-dashboard binary entry point.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use session_dashboard::api::{serve, AppState};
use session_dashboard::cli::{parse_args, print_help, print_version};
use session_dashboard::config::Config;
use session_dashboard::{logging, StoreResolver};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    let loaded = tracing::subscriber::with_default(logging::bootstrap_subscriber(), || {
        Config::load(&args)
    });
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(Some(config.log_filter()));
    info!("session-dashboard v{}", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let server_config = config.to_server_config()?;

    let store = Arc::new(config.build_store()?);
    info!(
        sessions = store.count(),
        cookie = %config.session.cookie_name,
        "session store ready"
    );
    if let Some(ttl) = config.session.ttl_secs {
        Arc::clone(&store).spawn_purge_task(Duration::from_secs(ttl.max(1)));
    }
    if config.logging.trace_sessions {
        info!("session tracing enabled");
    }

    let resolver = StoreResolver::new(store).with_cookie_name(&config.session.cookie_name);
    let state = AppState::new(resolver)
        .with_render_options(config.render_options())
        .with_session_tracing(config.logging.trace_sessions);

    serve(server_config, state).await?;
    info!("server stopped");
    Ok(())
}
