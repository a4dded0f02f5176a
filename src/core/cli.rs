//! Command implementations: probe, list, config.
//!
//! These produce plain text (or JSON) on stdout; diagnostics go to stderr via the logger.

use std::io::{self, Read};

use chrono::Utc;
use crossterm::style::Color;

use crate::core::api_key::{self, ApiKeyError};
use crate::core::backend::BackendError;
use crate::core::config::{self, Config, ConfigError};
use crate::core::gemini::GeminiClient;
use crate::core::paths;
use crate::core::probe::{self, CatalogUnavailable, DefaultClassifier, ModelDescriptor, RunSummary};
use crate::core::report::{self, Palette};

/// Errors that end a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogUnavailable),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] BackendError),
    #[error(transparent)]
    ApiKey(#[from] ApiKeyError),
    #[error("No API key provided")]
    EmptyApiKey,
    #[error("Failed to read from stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output choices shared by `probe` and `list`.
#[derive(Clone, Debug, Default)]
pub struct OutputOptions {
    pub filter: Option<String>,
    pub json: bool,
    pub color: bool,
}

async fn enumerate(
    client: &GeminiClient,
    filter: Option<&str>,
) -> Result<Vec<ModelDescriptor>, CatalogUnavailable> {
    let models = probe::enumerate_text_models(client).await?;
    Ok(match filter {
        Some(q) => probe::filter_models(models, q),
        None => models,
    })
}

fn client_for(config: &Config) -> Result<GeminiClient, BackendError> {
    GeminiClient::new(&config.api_key, &config.base_url, config.request_timeout)
}

/// Run the default command: enumerate text models, probe each, print the report.
pub async fn run_probe(config: &Config, out: &OutputOptions) -> Result<RunSummary, CommandError> {
    let palette = Palette::new(out.color);
    let client = client_for(config)?;
    let started_at = Utc::now();

    if !out.json {
        println!("{}", palette.paint("=== Gemini API model probe ===", Color::Cyan));
        println!(
            "{}",
            palette.paint("[INFO] Listing models available to your key...", Color::Yellow)
        );
    }

    let models = enumerate(&client, out.filter.as_deref()).await?;

    if out.json {
        let (results, summary) = probe::probe_all(
            &client,
            &DefaultClassifier,
            models,
            &config.probe,
            None,
        )
        .await;
        println!("{}", report::json_report(started_at, &results, &summary)?);
        return Ok(summary);
    }

    println!(
        "{}\n",
        palette.paint(
            &format!("[OK] Found {} compatible model(s).", models.len()),
            Color::Green
        )
    );
    if models.is_empty() {
        println!("No models to probe.");
        return Ok(RunSummary::default());
    }

    let name_w = report::name_width(&models);
    println!("{}", palette.paint("=== Access and latency ===", Color::Cyan));
    println!("{}", report::table_header(name_w));

    let print_row: probe::OnResult<'_> =
        &|r| println!("{}", report::table_row(r, name_w, palette));
    let (_, summary) = probe::probe_all(
        &client,
        &DefaultClassifier,
        models,
        &config.probe,
        Some(print_row),
    )
    .await;

    println!("{}", report::summary_footer(&summary, name_w, palette));
    Ok(summary)
}

/// Run the `list` command: enumerate text models without probing them.
pub async fn run_list(config: &Config, out: &OutputOptions) -> Result<(), CommandError> {
    let client = client_for(config)?;
    let models = enumerate(&client, out.filter.as_deref()).await?;

    if out.json {
        println!("{}", report::json_models(&models)?);
    } else if models.is_empty() {
        println!("No models found.");
    } else {
        println!("{}", report::models_table(&models));
    }
    Ok(())
}

/// Run the `config` command: display paths, base URL, and API key status.
pub fn run_config() {
    let config_dir = paths::config_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());
    let key_file = api_key::credentials_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());
    let key_status = match api_key::resolve_non_interactive() {
        Some((key, source)) => format!("{} ({})", api_key::mask(&key), source),
        None => "not set".to_string(),
    };

    println!("Config:    {}", config_dir);
    println!("Key file:  {}", key_file);
    println!("Base URL:  {}", config::base_url());
    println!("API key:   {}", key_status);
}

/// Run the `config set-api-key` command: store API key in config directory.
/// Reads the key from stdin when not given on the command line.
pub fn run_config_set_api_key(api_key: Option<String>) -> Result<(), CommandError> {
    let key = match api_key {
        Some(k) if !k.trim().is_empty() => k.trim().to_string(),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(CommandError::Stdin)?;
            let trimmed = buf.trim().to_string();
            if trimmed.is_empty() {
                return Err(CommandError::EmptyApiKey);
            }
            trimmed
        }
    };

    api_key::store_api_key(&key)?;
    let path = api_key::credentials_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "config directory".to_string());
    println!("API key saved to {}", path);
    Ok(())
}
