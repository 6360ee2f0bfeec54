use std::process::ExitCode;

use tracing::{error, info, warn};

use townsquare::Config;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the token may come from the real environment.
    let dotenv_result = dotenvy::dotenv();

    let mut config_missing = None;
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            config_missing = Some(e);
            Config::default()
        }
    };

    if let Err(e) = townsquare::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        townsquare::logging::init_console_only(&config.logging.level);
    }

    info!("townsquare - Blood on the Clocktower bot");
    if let Some(e) = config_missing {
        warn!(error = %e, "Could not load config.toml, using defaults");
    }
    if let Err(e) = dotenv_result {
        info!(error = %e, "No .env file loaded");
    }

    if let Err(e) = config.apply_env_overrides().and_then(|_| config.validate()) {
        error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    match townsquare::bot::run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Bot stopped");
            ExitCode::FAILURE
        }
    }
}
