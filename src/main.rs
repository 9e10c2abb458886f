use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{Result, WrapErr, bail};
use log::{debug, info, warn};

mod cli;

use cli::{Cli, Command, OutputFormat};
use ytsum::config::{AppConfig, CONTAINER_CREDENTIALS, Config, Overrides};
use ytsum::pipeline::{Outcome, Pipeline};
use ytsum::summarize::LlmSummarizer;
use ytsum::web::{self, AppState};
use ytsum::youtube::YouTube;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

/// A broken config file is reported but never stops startup.
fn load_config(path: Option<&Path>) -> Config {
    let result = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    result.unwrap_or_else(|e| {
        warn!("Ignoring config file: {e:#}");
        eprintln!("Warning: ignoring config file: {e:#}");
        Config::default()
    })
}

/// A missing `.env` is normal; anything else about it is worth a warning.
fn dotenv_warning<T>(result: &dotenvy::Result<T>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(format!("failed to load .env: {e}")),
        _ => None,
    }
}

/// The `summarize` command fails unless a summary came out.
fn check_summarized(outcome: &Outcome, url: &str) -> Result<()> {
    if !outcome.is_success() {
        bail!("no summary produced for {url}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values win over the inherited environment
    let dotenv = dotenvy::dotenv_override();
    setup_logging()?;
    match dotenv_warning(&dotenv) {
        Some(msg) => {
            warn!("{msg}");
            eprintln!("Warning: {msg}");
        }
        None => {
            if let Ok(ref path) = dotenv {
                debug!("Loaded environment from {}", path.display());
            }
        }
    }

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve { bind: None });

    let overrides = Overrides {
        model: cli.model,
        bind: match &command {
            Command::Serve { bind } => bind.clone(),
            Command::Summarize { .. } => None,
        },
    };

    let file = load_config(cli.config.as_deref());
    let config = AppConfig::resolve(
        file,
        &overrides,
        |key| std::env::var(key).ok(),
        Path::new(CONTAINER_CREDENTIALS),
    )
    .wrap_err("failed to resolve configuration")?;

    if cli.verbose {
        let config_path = cli.config.clone().unwrap_or_else(ytsum::config::config_path);
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Logs: {}", log_dir().join("ytsum.log").display());
        eprintln!("Model: {}", config.model);
        eprintln!("Languages: {}", config.languages.join(", "));
        if let Some(ref bundle) = config.credentials.credentials_file {
            eprintln!("Credential bundle: {}", bundle.display());
        }
    }

    let client = reqwest::Client::new();
    let provider = YouTube::new(client.clone());
    let summarizer = LlmSummarizer::new(client, &config.model, &config.credentials.api_key, &config.prompt);

    match command {
        Command::Serve { .. } => {
            eprintln!("Serving on http://{}", config.bind);
            let state = AppState::new(provider, summarizer, config.languages);
            web::serve(config.bind, state).await.wrap_err("web server failed")?;
        }
        Command::Summarize { url, format } => {
            let pipeline = Pipeline {
                provider: &provider,
                summarizer: &summarizer,
                languages: &config.languages,
            };
            let outcome = pipeline.run(url.trim()).await;

            let rendered = match format {
                OutputFormat::Text => ytsum::output::render_text(&outcome),
                OutputFormat::Json => ytsum::output::render_json(&outcome),
            };
            println!("{rendered}");

            check_summarized(&outcome, &url)?;
        }
    }

    Ok(())
}
