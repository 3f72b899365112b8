use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use args::Args;
use clap::Parser;
use config::Config;
use server::ServeConfig;

mod args;
mod logger;

/// Fallback listen address when neither the CLI nor the configuration file
/// provides one.
const DEFAULT_LISTEN_ADDRESS: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8000));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.config()?;

    logger::init(&args);

    let serve_config = ServeConfig {
        listen_address: args
            .listen_address
            .or(config.server.listen_address)
            .unwrap_or(DEFAULT_LISTEN_ADDRESS),
        config,
    };

    if let Err(e) = server::serve(serve_config).await {
        log::error!("Server failed to start: {e}");
        std::process::exit(1);
    }

    Ok(())
}
