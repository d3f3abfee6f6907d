use account_directory::{comms, config::Config, utils};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "account-directory", version, about = "In-memory account directory service")]
struct AppCli {
    /// Config file path (JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Listen host, overrides config
        #[arg(long)]
        host: Option<String>,
        /// Listen port, overrides config
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::logging::init();

    let args = AppCli::parse();
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(Commands::Serve { host, port }) = args.command {
        if let Some(host) = host {
            config.host = host;
        }
        if let Some(port) = port {
            config.port = port;
        }
    }

    info!(
        version = account_directory::VERSION,
        host = %config.host,
        port = config.port,
        "starting account directory"
    );
    comms::http_api::serve(config).await
}
