use crate::app_state::AppState;
use crate::data_models::{ContactResponse, ContactSubmission};
use crate::errors::{validation_summary, ApiError, AppErrors};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Result};
use tracing::{error, info, warn};
use validator::Validate;

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// CORS preflight: empty body, headers come from the route layer.
pub async fn preflight() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn method_not_allowed(State(state): State<AppState>, method: Method) -> ApiError {
    warn!(%method, "rejected contact request method");
    AppErrors::MethodNotAllowed.in_env(state.environment)
}

pub async fn contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    relay(&state, body)
        .await
        .map(Json)
        .map_err(|err| err.in_env(state.environment))
}

async fn relay(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<ContactResponse, AppErrors> {
    let Some(credential) = state.credential.as_ref() else {
        error!(
            variable = crate::configuration::PROVIDER_CREDENTIAL_VAR,
            "email provider credential is missing, refusing to relay submission"
        );
        return Err(AppErrors::ConfigurationError);
    };

    let body = body.map_err(|rejection| {
        error!(error = %rejection, "failed to read contact body");
        rejection
    })?;
    let submission: ContactSubmission = serde_json::from_slice(&body).map_err(|err| {
        error!(error = %err, "failed to parse contact body");
        err
    })?;
    submission.validate().map_err(|errors| {
        warn!(
            failures = %validation_summary(&errors),
            "rejected contact submission"
        );
        errors
    })?;

    state.mailer.dispatch(credential, &submission).await?;
    info!(mode = %state.mailer.mode(), "contact submission relayed");
    Ok(ContactResponse::sent())
}
