use event_finder::configuration::get_configuration;
use event_finder::create_app;
use event_finder::errors::Error;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn bind_address(host: &str, port: u16) -> Result<SocketAddr, Error> {
    let host = IpAddr::from_str(host)?;
    Ok(SocketAddr::from((host, port)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let configuration = get_configuration()?;
    let addr = bind_address(
        &configuration.application.host,
        configuration.application.port,
    )?;
    let (app, _) = create_app(&configuration)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, api = %configuration.api.graphql_url, "event finder listening");
    axum::serve(listener, app).await?;
    Ok(())
}
