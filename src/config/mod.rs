use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::filter::FilterConfig;

/// Transport security for the Kafka connection.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SecurityProtocol {
    #[default]
    Plaintext,
    SaslSsl,
}

impl SecurityProtocol {
    /// Value for librdkafka's `security.protocol` setting.
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityProtocol::Plaintext => "plaintext",
            SecurityProtocol::SaslSsl => "sasl_ssl",
        }
    }
}

/// One publish destination and its optional filter.
#[derive(Clone, Debug, Deserialize)]
pub struct TopicConfig {
    pub topic: String,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Complete bridge configuration.
///
/// The topic set and filters are fixed for the life of a running instance;
/// there is no runtime reconfiguration.
#[derive(Clone, Debug, Deserialize)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    pub topics: Vec<TopicConfig>,
    /// Applied to every event regardless of destination.
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub security_protocol: SecurityProtocol,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl BridgeConfig {
    /// Reject configurations that cannot produce a working bridge.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            bail!("host must not be empty");
        }
        if self.port == 0 {
            bail!("port must be in 1-65535");
        }
        if self.topics.is_empty() {
            bail!("at least one topic is required");
        }
        for topic in &self.topics {
            if topic.topic.is_empty() {
                bail!("topic name must not be empty");
            }
        }
        Ok(())
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &str) -> Result<BridgeConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path))?;
    let config: BridgeConfig =
        toml::from_str(&contents).context("Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}
