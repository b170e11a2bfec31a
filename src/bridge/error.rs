use std::fmt;

use crate::event::EncodeError;
use crate::kafka::PublishError;

/// Start/write/shutdown invoked out of sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    AlreadyStarted,
    NotStarted,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::AlreadyStarted => write!(f, "bridge was already started"),
            LifecycleError::NotStarted => write!(f, "bridge has not been started"),
        }
    }
}

impl std::error::Error for LifecycleError {}

/// Errors surfaced by the bridge manager.
#[derive(Debug)]
pub enum BridgeError {
    /// An attribute value could not be serialized.
    Encode(EncodeError),
    /// The broker rejected or failed to acknowledge an operation.
    Publish(PublishError),
    /// Lifecycle methods invoked out of sequence.
    Lifecycle(LifecycleError),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Encode(err) => err.fmt(f),
            BridgeError::Publish(err) => err.fmt(f),
            BridgeError::Lifecycle(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Encode(err) => Some(err),
            BridgeError::Publish(err) => Some(err),
            BridgeError::Lifecycle(err) => Some(err),
        }
    }
}

impl From<EncodeError> for BridgeError {
    fn from(err: EncodeError) -> Self {
        BridgeError::Encode(err)
    }
}

impl From<PublishError> for BridgeError {
    fn from(err: PublishError) -> Self {
        BridgeError::Publish(err)
    }
}

impl From<LifecycleError> for BridgeError {
    fn from(err: LifecycleError) -> Self {
        BridgeError::Lifecycle(err)
    }
}
