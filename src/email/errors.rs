use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("email provider responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
