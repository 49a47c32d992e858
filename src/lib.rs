pub mod adapter;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::process::ExitCode;

use clap::Parser;

use adapter::cli::args::Cli;
use adapter::cli::state::AppState;
use adapter::cli::{commands, error};
use application::eventbus::create_event_bus;
use infrastructure::config;
use infrastructure::http::HttpGroupRepository;
use infrastructure::logging;

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Configuration decides whether to log to a file, so it loads first
    let mut app_config = config::init().clone();
    logging::setup(cli.verbose, app_config.logging.file);

    if let Some(server) = cli.server.as_deref().filter(|s| !s.trim().is_empty()) {
        app_config.backend.base_url = server.trim().to_string();
    }
    let session = cli
        .session
        .clone()
        .or_else(|| config::settings().session_cookie.clone());
    tracing::debug!("Using backend {}", app_config.backend.base_url);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        let repo = HttpGroupRepository::new(&app_config.backend, session.as_deref())?;
        let mut state = AppState::new(Box::new(repo), &app_config, create_event_bus());
        commands::execute(cli.command, &mut state).await
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !error::already_reported(&e) {
                eprintln!("Error: {:#}", e);
            }
            error::exit_code(&e)
        }
    }
}
