use crate::configuration::{ApiKey, EmailSettings};
use crate::data_models::EmailMessage;
use crate::email::{EmailError, EmailTransport};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use std::fmt::Display;
use tracing::{debug, warn};
use url::Url;

/// Resend-compatible HTTP transport: `POST {base_url}/emails` with a bearer token.
#[derive(Debug, Clone)]
pub struct ResendClient {
    http: Client,
    endpoint: Url,
}

impl ResendClient {
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: emails_endpoint(base_url),
        })
    }

    pub fn from_settings(settings: &EmailSettings) -> Result<Self, reqwest::Error> {
        Self::new(&settings.base_url, settings.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn emails_endpoint(base_url: &Url) -> Url {
    let mut endpoint = base_url.clone();
    let path = format!("{}/emails", base_url.path().trim_end_matches('/'));
    endpoint.set_path(&path);
    endpoint
}

/// The provider's response body, or a note naming why it could not be read.
fn body_or_read_failure<E: Display>(status: u16, body: Result<String, E>) -> String {
    match body {
        Ok(body) => body,
        Err(err) => {
            warn!(status, error = %err, "failed to read email provider response body");
            format!("<unreadable response body: {err}>")
        }
    }
}

#[async_trait]
impl EmailTransport for ResendClient {
    async fn send(&self, credential: &ApiKey, message: &EmailMessage) -> Result<(), EmailError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(credential.expose())
            .json(message)
            .send()
            .await?;
        let status = response.status();
        let body = body_or_read_failure(status.as_u16(), response.text().await);
        if status.is_success() {
            debug!(status = status.as_u16(), body = %body, "email provider accepted message");
            return Ok(());
        }
        Err(EmailError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
