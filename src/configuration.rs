use crate::errors::ConfigurationError;
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::env::var;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Name of the environment variable holding the email provider credential.
pub const PROVIDER_CREDENTIAL_VAR: &str = "RESEND_API_KEY";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: Application,
    pub email: EmailSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Application {
    pub host: String,
    pub port: u16,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EmailSettings {
    #[serde_as(as = "DisplayFromStr")]
    pub base_url: Url,
    pub sender: String,
    pub operator_recipient: String,
    #[serde_as(as = "DisplayFromStr")]
    pub mode: DispatchMode,
    pub timeout_millis: Option<u64>,
}

impl EmailSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_millis.map(Duration::from_millis)
    }
}

/// Which emails are sent for one accepted submission.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum DispatchMode {
    /// Operator notification only.
    Notify,
    /// Operator notification followed by an acknowledgment to the sender.
    NotifyAndAcknowledge,
}

impl Display for DispatchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchMode::Notify => write!(f, "notify"),
            DispatchMode::NotifyAndAcknowledge => write!(f, "notify_and_acknowledge"),
        }
    }
}

impl FromStr for DispatchMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notify" => Ok(DispatchMode::Notify),
            "notify_and_acknowledge" => Ok(DispatchMode::NotifyAndAcknowledge),
            other => Err(ConfigurationError::UnknownDispatchMode(other.to_string())),
        }
    }
}

/// The possible runtime environment for our application.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    /// Internal error text is only echoed back to callers in development.
    pub fn exposes_details(&self) -> bool {
        matches!(self, Environment::Dev)
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigurationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(ConfigurationError::UnknownEnvironment(s)),
        }
    }
}

/// Bearer credential for the email provider. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(<redacted>)")
    }
}

pub fn get_env() -> Result<Environment, ConfigurationError> {
    var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "prod".into())
        .try_into()
}

/// Reads the provider credential from the process environment. Blank values count as absent.
pub fn provider_credential() -> Option<ApiKey> {
    var(PROVIDER_CREDENTIAL_VAR)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .map(ApiKey)
}

pub fn get_configuration(environment: Environment) -> Result<Settings, ConfigurationError> {
    let second_source = format!("configuration/{}", environment.as_str());
    let settings = Config::builder()
        .add_source(config::File::new("configuration/base", FileFormat::Yaml))
        .add_source(config::File::new(&second_source, FileFormat::Yaml).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;
    Ok(settings.try_deserialize::<Settings>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_mode_parses() {
        assert_eq!(
            "notify".parse::<DispatchMode>().unwrap(),
            DispatchMode::Notify
        );
        assert_eq!(
            "notify_and_acknowledge".parse::<DispatchMode>().unwrap(),
            DispatchMode::NotifyAndAcknowledge
        );
    }

    #[test]
    fn test_dispatch_mode_unknown_fails() {
        assert!(matches!(
            "both".parse::<DispatchMode>(),
            Err(ConfigurationError::UnknownDispatchMode(mode)) if mode == "both"
        ));
    }

    #[test]
    fn test_dispatch_mode_display_roundtrips() {
        for mode in [DispatchMode::Notify, DispatchMode::NotifyAndAcknowledge] {
            assert_eq!(mode.to_string().parse::<DispatchMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::try_from("DEV".to_string()).unwrap(),
            Environment::Dev
        );
        assert_eq!(
            Environment::try_from("production".to_string()).unwrap(),
            Environment::Prod
        );
        assert!(Environment::try_from("staging".to_string()).is_err());
    }

    #[test]
    fn test_only_dev_exposes_details() {
        assert!(Environment::Dev.exposes_details());
        assert!(!Environment::Prod.exposes_details());
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("re_secret");
        assert_eq!(format!("{key:?}"), "ApiKey(<redacted>)");
        assert_eq!(key.expose(), "re_secret");
    }

    #[test]
    fn test_timeout_is_optional() {
        let mut settings = EmailSettings {
            base_url: Url::parse("https://api.resend.com").unwrap(),
            sender: "from@example.com".to_string(),
            operator_recipient: "to@example.com".to_string(),
            mode: DispatchMode::Notify,
            timeout_millis: None,
        };
        assert_eq!(settings.timeout(), None);
        settings.timeout_millis = Some(2500);
        assert_eq!(settings.timeout(), Some(Duration::from_millis(2500)));
    }
}
