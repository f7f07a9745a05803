use std::path::PathBuf;

use clap::{Parser, Subcommand};

use version_proxy::config::ProxyConfig;
use version_proxy::{logging, server};

#[derive(Parser)]
#[command(name = "version-proxy")]
#[command(
    version,
    about = "Caching proxy for Minecraft server and Node.js image versions"
)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Listen port, overriding config and PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Refresh every source once and exit
    Refresh,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ProxyConfig::load(cli.config.as_deref())?;
    let _guard = logging::init(&config.log)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            runtime.block_on(server::run_server(config))
        }
        Command::Refresh => {
            let summaries = runtime.block_on(server::run_refresh(&config))?;
            for summary in summaries {
                println!(
                    "{:<10} {:>5}  {:?}",
                    summary.kind.as_str(),
                    summary.count,
                    summary.outcome
                );
            }
            Ok(())
        }
    }
}
