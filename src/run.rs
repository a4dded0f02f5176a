//! Application run modes: logger init, config assembly, command dispatch.

use std::io;
use std::time::Duration;

use clap::CommandFactory;

use crate::cli::{self, Args, Commands, ConfigSubcommand};
use crate::core;
use crate::core::cli::{CommandError, OutputOptions};
use crate::core::config::Config;

/// Initialize env_logger on stderr so stdout stays clean for the report.
pub fn init_logger(args: &Args) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level()),
    )
    .target(env_logger::Target::Stderr)
    .try_init();
}

/// Load config (environment + prompt) and apply CLI overrides.
fn load_config(args: &Args) -> Result<Config, CommandError> {
    let mut config = core::config::load(true)?;
    log::debug!("Using API key {}", config.credential_source);
    if let Some(url) = args.base_url.as_ref().filter(|u| !u.trim().is_empty()) {
        config.base_url = url.trim().to_string();
    }
    config.request_timeout = args.timeout.map(Duration::from_secs);
    config.probe.prompt = args.prompt.clone();
    config.probe.max_output_tokens = args.max_output_tokens;
    config.probe.delay = Duration::from_millis(args.delay_ms);
    Ok(config)
}

fn output_options(args: &Args) -> OutputOptions {
    OutputOptions {
        filter: args.filter.clone(),
        json: args.json,
        color: !args.json && core::report::color_enabled(args.no_color),
    }
}

/// Dispatch the selected command.
pub async fn run(args: Args) -> Result<(), CommandError> {
    match &args.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Args::command();
            cli::generate(*shell, &mut cmd, core::app::NAME, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { subcommand: None }) => {
            core::cli::run_config();
            Ok(())
        }
        Some(Commands::Config {
            subcommand: Some(ConfigSubcommand::SetApiKey { key }),
        }) => core::cli::run_config_set_api_key(key.clone()),
        Some(Commands::List) => {
            let config = load_config(&args)?;
            core::cli::run_list(&config, &output_options(&args)).await
        }
        None => {
            let config = load_config(&args)?;
            let summary = core::cli::run_probe(&config, &output_options(&args)).await?;
            log::info!(
                "Probed {} model(s): {} active, {} quota exceeded, {} other",
                summary.total,
                summary.active,
                summary.quota_exceeded,
                summary.other
            );
            Ok(())
        }
    }
}
