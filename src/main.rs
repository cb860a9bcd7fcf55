use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing::info;

use fusion_language_server::api_dump::DumpSourceConfig;
use fusion_language_server::logging::init_logger;
use fusion_language_server::lsp::backend::{BackendOptions, FusionBackend};

#[derive(Parser, Debug)]
#[command(name = "fusion-language-server")]
#[command(about = "Autocompletion for Fusion UI code in Roblox Luau")]
#[command(version)]
struct Cli {
    /// Log filter for stderr output (defaults to RUST_LOG, then "info")
    #[arg(long)]
    log_level: Option<String>,

    /// Disable ANSI colors in stderr output
    #[arg(long)]
    no_color: bool,

    /// Do not write a session log to the cache directory
    #[arg(long)]
    no_file_logging: bool,

    /// Load the Roblox API dump from a local file instead of downloading it
    #[arg(long, value_name = "PATH")]
    api_dump: Option<PathBuf>,

    /// Download the Roblox API dump from this URL
    #[arg(long, value_name = "URL", conflicts_with = "api_dump")]
    api_dump_url: Option<String>,
}

impl Cli {
    fn dump_source(&self) -> Option<DumpSourceConfig> {
        match (&self.api_dump, &self.api_dump_url) {
            (Some(path), _) => Some(DumpSourceConfig::File(path.clone())),
            (None, Some(url)) => Some(DumpSourceConfig::Http(url.clone())),
            (None, None) => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_logger(cli.no_color, cli.log_level.as_deref(), !cli.no_file_logging)
        .context("failed to initialize logging")?;

    info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let options = BackendOptions {
        api_dump: cli.dump_source(),
    };

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| FusionBackend::new(client, options));
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}
