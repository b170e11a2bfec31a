use anyhow::{Context, Result};
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{debug, info};

use super::{BrokerConnection, PublishError};
use crate::config::{BridgeConfig, SecurityProtocol};

const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Kafka connection wrapping an rdkafka `FutureProducer`.
///
/// Transport compression is gzip; payloads are published as-is. Delivery
/// timeouts and retries are the producer's own configuration, the bridge
/// imposes none of its own.
pub struct KafkaConnection {
    producer: FutureProducer,
    bootstrap: String,
}

impl KafkaConnection {
    /// Build a producer from validated bridge configuration.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        let bootstrap = format!("{}:{}", config.host, config.port);

        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", bootstrap.as_str())
            .set("compression.type", "gzip")
            .set("security.protocol", config.security_protocol.as_str());

        if config.security_protocol == SecurityProtocol::SaslSsl {
            client_config.set("sasl.mechanism", "PLAIN");
            if let Some(username) = &config.username {
                client_config.set("sasl.username", username.as_str());
            }
            if let Some(password) = &config.password {
                client_config.set("sasl.password", password.as_str());
            }
        }

        let producer = client_config
            .create()
            .context("Failed to create Kafka producer")?;

        Ok(Self {
            producer,
            bootstrap,
        })
    }
}

impl BrokerConnection for KafkaConnection {
    /// Verify the broker is reachable before any event can be published.
    async fn start(&mut self) -> Result<(), PublishError> {
        info!("Connecting to Kafka at {}", self.bootstrap);

        // Metadata fetch is blocking in librdkafka.
        let producer = self.producer.clone();
        tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(None, METADATA_TIMEOUT)
                .map(|_| ())
        })
        .await
        .map_err(|err| PublishError::connection(err.to_string()))?
        .map_err(|err| PublishError::connection(err.to_string()))?;

        info!("Kafka producer ready");
        Ok(())
    }

    /// Publish one payload and await the broker's delivery acknowledgment.
    async fn send(&mut self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        debug!(topic, bytes = payload.len(), "Publishing payload to Kafka");

        self.producer
            .send(
                FutureRecord::<(), _>::to(topic).payload(&payload),
                Timeout::Never,
            )
            .await
            .map(|_| ())
            .map_err(|(err, _)| PublishError::broker(topic, err.to_string()))
    }

    /// Flush outstanding records and release the producer.
    async fn stop(&mut self) -> Result<(), PublishError> {
        info!("Stopping Kafka producer");

        let producer = self.producer.clone();
        tokio::task::spawn_blocking(move || producer.flush(Timeout::Never))
            .await
            .map_err(|err| PublishError::connection(err.to_string()))?
            .map_err(|err| PublishError::connection(err.to_string()))?;

        Ok(())
    }
}
