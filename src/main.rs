use contact_relay::app_state::AppState;
use contact_relay::configuration::{
    get_configuration, get_env, provider_credential, PROVIDER_CREDENTIAL_VAR,
};
use contact_relay::create_app;
use contact_relay::errors::Error;
use contact_relay::telemetry::init_tracing;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::{info, warn};

fn bind_address(host: &str, port: u16) -> Result<SocketAddr, Error> {
    let host = IpAddr::from_str(host)?;
    Ok(SocketAddr::from((host, port)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let environment = get_env()?;
    let configuration = get_configuration(environment)?;
    let credential = provider_credential();
    if credential.is_none() {
        warn!(
            variable = PROVIDER_CREDENTIAL_VAR,
            "provider credential is not set, every submission will fail"
        );
    }
    let addr = bind_address(
        &configuration.application.host,
        configuration.application.port,
    )?;
    let app_state = AppState::init(&configuration, credential, environment)?;
    let app = create_app(app_state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, environment = environment.as_str(), "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
