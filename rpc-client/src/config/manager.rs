// File: rpc-client/src/config/manager.rs
use super::ClientConfig;
use crate::errors::ConfigError;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<ClientConfig>,
}

impl ConfigManager {
    pub async fn load(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_configuration(config_path.as_ref()).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<ClientConfig> {
        self.current_config.clone()
    }

    async fn load_configuration(config_path: &Path) -> Result<ClientConfig, ConfigError> {
        debug!("Loading client config: {}", config_path.display());

        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;

        let config = Self::parse(&content, config_path)?;

        info!(
            "Configuration loaded: target {}:{}, root {}",
            config.self_hostname,
            config.port,
            config.root_path.display()
        );

        Ok(config)
    }

    fn parse(content: &str, config_path: &Path) -> Result<ClientConfig, ConfigError> {
        let config: ClientConfig = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })?;

        if config.self_hostname.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "self_hostname".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if config.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        if config.retry.max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }

        Ok(config)
    }
}
