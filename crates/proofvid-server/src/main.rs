//! ProofVid - certificate registry for video hashes

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use proofvid::core::sha256_hex;
use proofvid_server::ServeConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "proofvid-server")]
#[command(about = "Issue and verify registration certificates for video hashes", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "PROOFVID_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve(ServeConfig),
    /// Print the SHA-256 hash of a file, as submitted on registration
    Digest {
        /// File to hash
        path: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "proofvid=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Serve(config) => {
            tracing::info!("Starting ProofVid registry");
            proofvid_server::run(config).await?;
        }
        Command::Digest { path } => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            let digest = sha256_hex(file)
                .with_context(|| format!("failed to hash {}", path.display()))?;
            println!("{}", digest);
        }
    }

    Ok(())
}
