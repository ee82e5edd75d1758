use crate::configuration::Environment;
use crate::data_models::ErrorBody;
use crate::email::errors::EmailError;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;
use validator::ValidationErrors;

pub const MISSING_FIELDS: &str = "Name, email, and message are required";
pub const INVALID_EMAIL: &str = "Invalid email address";

#[derive(Error, Debug)]
pub enum Error {
    #[error("socket address parsing error: {0}")]
    SocketAddressParsingError(#[from] std::net::AddrParseError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("{0} is not a supported environment. Use either `dev` or `prod`.")]
    UnknownEnvironment(String),
    #[error("{0} is not a supported dispatch mode. Use either `notify` or `notify_and_acknowledge`.")]
    UnknownDispatchMode(String),
}

/// Everything a contact request can fail with.
#[derive(Error, Debug)]
pub enum AppErrors {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("bad request: {0}")]
    BadRequest(&'static str),
    #[error("failed to read request body: {0}")]
    UnreadableBody(#[from] BytesRejection),
    #[error("failed to parse request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("email provider credential is not configured")]
    ConfigurationError,
    #[error("failed to send email: {0}")]
    EmailSendError(#[from] EmailError),
}

impl AppErrors {
    pub fn status(&self) -> StatusCode {
        match self {
            AppErrors::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppErrors::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppErrors::UnreadableBody(_)
            | AppErrors::InvalidBody(_)
            | AppErrors::ConfigurationError
            | AppErrors::EmailSendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to any caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppErrors::MethodNotAllowed => "Method not allowed",
            AppErrors::BadRequest(message) => *message,
            AppErrors::UnreadableBody(_) | AppErrors::InvalidBody(_) => "Internal server error",
            AppErrors::ConfigurationError => "Server configuration error",
            AppErrors::EmailSendError(_) => "Failed to send email",
        }
    }

    /// Internal error text, only ever shown in development.
    pub fn details(&self) -> Option<String> {
        match self {
            AppErrors::UnreadableBody(err) => Some(err.body_text()),
            AppErrors::InvalidBody(err) => Some(err.to_string()),
            AppErrors::EmailSendError(err) => Some(err.to_string()),
            AppErrors::MethodNotAllowed
            | AppErrors::BadRequest(_)
            | AppErrors::ConfigurationError => None,
        }
    }

    pub fn in_env(self, environment: Environment) -> ApiError {
        ApiError {
            error: self,
            environment,
        }
    }
}

impl From<ValidationErrors> for AppErrors {
    fn from(errors: ValidationErrors) -> Self {
        let missing = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .any(|err| err.code == "length");
        if missing {
            AppErrors::BadRequest(MISSING_FIELDS)
        } else {
            AppErrors::BadRequest(INVALID_EMAIL)
        }
    }
}

/// Failing fields and validator codes, e.g. `email:email_shape`. Submitted values are left out.
pub fn validation_summary(errors: &ValidationErrors) -> String {
    let mut failures: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| errs.iter().map(move |err| format!("{field}:{}", err.code)))
        .collect();
    failures.sort();
    failures.join(",")
}

/// An [`AppErrors`] paired with the environment that decides whether details leak.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppErrors,
    pub environment: Environment,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = if self.environment.exposes_details() {
            self.error.details()
        } else {
            None
        };
        let body = ErrorBody {
            success: false,
            error: self.error.public_message().to_string(),
            details,
        };
        (self.error.status(), Json(body)).into_response()
    }
}
