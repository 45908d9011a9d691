use echo_server::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    // RUST_LOG overrides the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let listener = TcpListener::bind(config.listen).await?;
    info!(
        addr = %listener.local_addr()?,
        route_prefix = %config.route_prefix,
        "listening"
    );

    echo_server::serve(listener, &config).await?;
    info!("server stopped");
    Ok(())
}
