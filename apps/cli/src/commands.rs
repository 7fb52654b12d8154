//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use cravey_client::{ClientOptions, EnrichmentClient};
use cravey_core::SchemaEnricher;
use cravey_server::ServerConfig;
use cravey_shared::{AppConfig, PORT_ENV_VAR, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Cravey: enrich restaurant listing CSVs with media, contact, and validation fields.
#[derive(Parser)]
#[command(
    name = "cravey",
    version,
    about = "Enrich restaurant listing CSVs with media, contact, and validation fields.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the enrichment HTTP server.
    Serve {
        /// Interface to bind (defaults to the config file, then 0.0.0.0).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to $PORT, then the config file, then 5000).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Enrich a CSV file locally.
    Enrich {
        /// Input CSV file.
        input: PathBuf,

        /// Output CSV file (defaults to <input>_enriched.csv).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Send a CSV file to a running enrichment server.
    Push {
        /// Input CSV file.
        input: PathBuf,

        /// Server base URL (defaults to the config file).
        #[arg(long)]
        url: Option<String>,

        /// Output CSV file (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Check whether an enrichment server is up.
    Health {
        /// Server base URL (defaults to the config file).
        #[arg(long)]
        url: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "cravey=info",
        1 => "cravey=debug",
        _ => "cravey=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { host, port } => cmd_serve(host.as_deref(), port).await,
        Command::Enrich { input, out } => cmd_enrich(&input, out.as_deref()),
        Command::Push { input, url, out } => {
            cmd_push(&input, url.as_deref(), out.as_deref()).await
        }
        Command::Health { url } => cmd_health(url.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

async fn cmd_serve(host: Option<&str>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let env_port = std::env::var(PORT_ENV_VAR).ok();

    let server = ServerConfig::resolve(
        &config,
        host,
        port,
        env_port.as_deref(),
        Arc::new(SchemaEnricher),
    )?;

    info!(addr = %server.addr, "starting Cravey enrichment server");
    cravey_server::serve(server).await?;
    Ok(())
}

fn cmd_enrich(input: &Path, out: Option<&Path>) -> Result<()> {
    let output = out.map_or_else(|| default_output_path(input), Path::to_path_buf);

    info!(input = %input.display(), output = %output.display(), "enriching file");
    cravey_core::enrich_file(input, &output)?;

    println!("Enriched CSV written to {}", output.display());
    Ok(())
}

async fn cmd_push(input: &Path, url: Option<&str>, out: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let client = build_client(&config, url)?;

    let csv = std::fs::read_to_string(input)
        .wrap_err_with(|| format!("failed to read {}", input.display()))?;

    let spinner = Spinner::new(&format!("Enriching {} bytes", csv.len()));
    let result = client.enrich(&csv).await;
    spinner.finish();
    let enriched = result?;

    match out {
        Some(path) => {
            std::fs::write(path, &enriched)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!("Enriched CSV written to {}", path.display());
        }
        None => print!("{enriched}"),
    }
    Ok(())
}

async fn cmd_health(url: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let client = build_client(&config, url)?;

    let health = client.health().await?;
    println!("  Status:  {}", health.status);
    println!("  Message: {}", health.message);
    println!("  Version: {}", health.version);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config written to {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let rendered = toml::to_string_pretty(&config).map_err(|e| eyre!("render config: {e}"))?;
    print!("{rendered}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_client(config: &AppConfig, url: Option<&str>) -> Result<EnrichmentClient> {
    let base_url = url.unwrap_or(&config.client.base_url);
    let client = EnrichmentClient::new(base_url, ClientOptions::from(&config.client))?;
    Ok(client)
}

/// `listings.csv` -> `listings_enriched.csv`, next to the input.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_enriched.csv"))
}

/// CLI spinner shown while waiting on the server.
struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn finish(self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_sits_next_to_input() {
        assert_eq!(
            default_output_path(Path::new("/tmp/listings.csv")),
            PathBuf::from("/tmp/listings_enriched.csv")
        );
        assert_eq!(
            default_output_path(Path::new("soho")),
            PathBuf::from("soho_enriched.csv")
        );
    }

    #[test]
    fn cli_parses_serve_flags() {
        let cli = Cli::parse_from(["cravey", "-vv", "serve", "--port", "8080"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Serve {
                host: None,
                port: Some(8080)
            }
        ));
    }

    #[test]
    fn enrich_command_writes_enriched_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("soho.csv");
        std::fs::write(&input, "name,address\nJoe's Diner,1 Main St\n").expect("write");

        cmd_enrich(&input, None).expect("enrich");

        let written =
            std::fs::read_to_string(dir.path().join("soho_enriched.csv")).expect("read output");
        assert!(written.starts_with("name,address,cover_image,"));
    }
}
