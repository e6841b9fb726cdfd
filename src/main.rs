mod cli;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cli::Command;
use cumulus_cli::api::{CumulusClient, HttpInvoker};
use cumulus_cli::config::ClientConfig;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Cumulus API Command-Line Interface
#[derive(Parser, Debug)]
#[command(name = "cumulus", version, about, long_about = None)]
struct Args {
    /// Cumulus stack prefix
    #[arg(long)]
    prefix: String,

    /// Base URL of the API; may contain a {prefix} placeholder
    #[arg(long)]
    endpoint: Option<String>,

    /// Maximum number of attempts per request
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Output format for records
    #[arg(long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cumulus started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cumulus").join("cumulus.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cumulus").join("cumulus.log");
    }
    PathBuf::from("cumulus.log")
}

/// Strings print verbatim; everything else as a pretty document
fn render(value: &Value, format: OutputFormat) -> Result<String> {
    if let Value::String(text) = value {
        return Ok(text.clone());
    }
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = ClientConfig::default();
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }

    let client = CumulusClient::new(HttpInvoker::new(config)?);
    let value = cli::run(&client, &args.prefix, args.command).await?;
    println!("{}", render(&value, args.output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {:#}", err);
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_render_verbatim() {
        let value = json!("Reindexing to cumulus-2024-01-01");
        assert_eq!(
            render(&value, OutputFormat::Json).unwrap(),
            "Reindexing to cumulus-2024-01-01"
        );
        assert_eq!(
            render(&value, OutputFormat::Yaml).unwrap(),
            "Reindexing to cumulus-2024-01-01"
        );
    }

    #[test]
    fn documents_render_in_requested_format() {
        let value = json!({ "name": "MOD09GQ" });
        assert_eq!(
            render(&value, OutputFormat::Json).unwrap(),
            "{\n  \"name\": \"MOD09GQ\"\n}"
        );
        assert_eq!(render(&value, OutputFormat::Yaml).unwrap(), "name: MOD09GQ");
    }

    #[test]
    fn parses_nested_subcommands() {
        let args = Args::try_parse_from([
            "cumulus",
            "--prefix",
            "my-stack",
            "granules",
            "list",
            "--limit",
            "5",
            "--param",
            "status=failed",
        ])
        .unwrap();

        assert_eq!(args.prefix, "my-stack");
        assert!(matches!(args.command, Command::Granules(_)));
    }

    #[test]
    fn prefix_is_required() {
        assert!(Args::try_parse_from(["cumulus", "version"]).is_err());
    }
}
