// Kafka producer integration

mod client;

pub use client::KafkaConnection;

use std::fmt;

/// Asynchronous publish-capable connection to the message broker.
///
/// `send` resolves only once the broker has acknowledged the record, so
/// callers that await it get at-least-once, in-order delivery per topic.
/// Lifecycle: `start` once before the first `send`, `stop` once at the end;
/// a stopped connection is never reused.
#[allow(async_fn_in_trait)]
pub trait BrokerConnection {
    async fn start(&mut self) -> Result<(), PublishError>;
    async fn send(&mut self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError>;
    async fn stop(&mut self) -> Result<(), PublishError>;
}

/// The broker rejected or failed to acknowledge an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishError {
    topic: Option<String>,
    message: String,
}

impl PublishError {
    /// Failure acknowledging a record on a specific topic.
    pub fn broker(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            message: message.into(),
        }
    }

    /// Failure establishing or tearing down the connection itself.
    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            topic: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.topic {
            Some(topic) => write!(f, "publish to '{}' failed: {}", topic, self.message),
            None => write!(f, "broker connection failed: {}", self.message),
        }
    }
}

impl std::error::Error for PublishError {}
