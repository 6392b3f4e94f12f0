use crate::cli::Cli;
use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub application_name: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_name: "LoanLens".to_string(),
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Result<Self, AppConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("application_name", defaults.application_name.clone())?
            .set_default("api_base_url", defaults.api_base_url.clone())?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?;

        if let Some(profile) = &cli.profile {
            let profile_file_name = format!("loanlens.{profile}.toml");
            if let Some(path) = Self::profile_path(&profile_file_name) {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if let Some(config_path) = &cli.config {
            builder = builder.add_source(File::from(config_path.clone()).required(true));
        } else if let Some(path) = Self::default_config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("LOANLENS").separator("__"));

        let built = builder.build()?;
        Ok(built.try_deserialize::<AppConfig>()?)
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "DigitalDataCo", "LoanLens")
            .map(|dirs| dirs.config_dir().join("loanlens.toml"))
    }

    fn profile_path(file_name: &str) -> Option<PathBuf> {
        ProjectDirs::from("com", "DigitalDataCo", "LoanLens")
            .map(|dirs| dirs.config_dir().join(file_name))
    }
}
