use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use validator::{Validate, ValidationError};

/// One contact-form submission as posted by the browser.
///
/// Missing and `null` fields deserialize to empty strings so that they are
/// rejected by validation rather than by the JSON parser.
#[serde_as]
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct ContactSubmission {
    #[serde_as(as = "DefaultOnNull")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[validate(length(min = 1), custom(function = "validate_email_shape"))]
    pub email: String,
    #[serde_as(as = "DefaultOnNull")]
    #[validate(length(min = 1))]
    pub message: String,
}

/// Accepts `local@domain.tld`: no whitespace, exactly one `@`, and a dot
/// inside the domain with something on both sides of it.
pub fn has_email_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if has_email_shape(email) {
        Ok(())
    } else {
        Err(ValidationError::new("email_shape"))
    }
}

/// Payload accepted by the provider's `/emails` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "Message sent successfully".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
