use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "library")]
#[command(about = "Library publisher API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to (overrides `server.bind_addr`)
    #[arg(long)]
    pub address: Option<SocketAddr>,

    /// Configuration file (defaults to `LIBRARY_CONFIG` or `config/library.toml`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory of the publisher store (overrides `server.data_path`)
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}
