use crate::configuration::{ApiKey, Environment, Settings};
use crate::email::{EmailTransport, Mailer, ResendClient};
use crate::errors::Error;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<Mailer>,
    pub credential: Option<ApiKey>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(mailer: Mailer, credential: Option<ApiKey>, environment: Environment) -> Self {
        Self {
            mailer: Arc::new(mailer),
            credential,
            environment,
        }
    }

    /// Wires the real provider client from the loaded settings.
    pub fn init(
        settings: &Settings,
        credential: Option<ApiKey>,
        environment: Environment,
    ) -> Result<Self, Error> {
        let client = ResendClient::from_settings(&settings.email)?;
        info!(
            endpoint = %client.endpoint(),
            mode = %settings.email.mode,
            "email provider configured"
        );
        let transport: Arc<dyn EmailTransport> = Arc::new(client);
        let mailer = Mailer::from_settings(transport, &settings.email);
        Ok(Self::new(mailer, credential, environment))
    }
}
