mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use library::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    library::observability::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = match args.config {
                Some(path) => Config::load_from_path(path)?,
                None => Config::load()?,
            };
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }
            if let Some(data_path) = args.data_path {
                config.server.data_path = data_path;
            }

            library::api::run(config).await?
        }
    }

    Ok(())
}
