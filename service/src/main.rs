use anyhow::Context;
use clap::Parser;
use std::net::{IpAddr, SocketAddr, TcpListener};
use tracing_subscriber::EnvFilter;

/// HTTP service computing updated EGD ratings.
#[derive(Parser)]
struct Options {
    /// Address to listen on.
    #[clap(short = 'H', long, env = "GOR_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    #[clap(short, long, env = "GOR_PORT", default_value = "9000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(true)
        .init();
    let opt = Options::parse();

    let addr = SocketAddr::new(opt.host, opt.port);
    let listener = TcpListener::bind(addr).context(format!("failed to bind {addr}"))?;

    gor_service::serve(listener, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("error waiting for shutdown signal: {err:#}");
            std::future::pending::<()>().await;
        }
    })
    .await
}
