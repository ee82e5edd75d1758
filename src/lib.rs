pub mod app_state;
pub mod configuration;
pub mod data_models;
pub mod email;
pub mod errors;
mod routes;
pub mod telemetry;
pub mod templates;

use crate::app_state::AppState;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub const CONTACT_PATH: &str = "/api/contact";

pub fn create_app(app_state: AppState) -> Router {
    let cors_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ));

    Router::new()
        .route("/health_check", get(routes::health_check))
        .route(
            CONTACT_PATH,
            post(routes::contact)
                .options(routes::preflight)
                .fallback(routes::method_not_allowed)
                .layer(cors_headers),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
