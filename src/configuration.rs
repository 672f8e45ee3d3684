use crate::errors::ConfigurationError;
use crate::filter::FilterState;
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::env::var;
use std::time::Duration;
use url::Url;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: Application,
    pub api: ApiSettings,
    pub filters: FilterSettings,
    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Application {
    pub host: String,
    pub port: u16,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiSettings {
    #[serde_as(as = "DisplayFromStr")]
    pub graphql_url: Url,
    pub timeout_secs: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FilterSettings {
    pub debounce_ms: u64,
    pub default_location: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct SnapshotSettings {
    pub file_path: Option<String>,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FilterSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn defaults(&self) -> FilterState {
        FilterState::with_location(&self.default_location)
    }
}

impl Settings {
    pub fn check_if_valid(&self) -> Result<(), ConfigurationError> {
        if self.api.timeout_secs == 0 {
            return Err(ConfigurationError::ZeroTimeout);
        }
        if !matches!(self.api.graphql_url.scheme(), "http" | "https") {
            return Err(ConfigurationError::UnsupportedScheme(
                self.api.graphql_url.scheme().to_string(),
            ));
        }
        if self.filters.default_location.trim().is_empty() {
            return Err(ConfigurationError::EmptyDefaultLocation);
        }
        Ok(())
    }
}

/// The possible runtime environment for our application.
#[derive(Debug, Eq, PartialEq)]
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
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(format!(
                "{other} is not a supported environment. Use either `dev` or `prod`."
            )),
        }
    }
}

pub fn get_env() -> Result<Environment, String> {
    var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "dev".into())
        .try_into()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let environment = get_env().map_err(config::ConfigError::Message)?;
    let second_source = format!("configuration/{}", environment.as_str());
    let settings = Config::builder()
        .add_source(config::File::new("configuration/base", FileFormat::Yaml))
        .add_source(config::File::new(&second_source, FileFormat::Yaml).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;
    settings.try_deserialize::<Settings>()
}
