//! Responder error types

use thiserror::Error;

/// Result type alias for leaf-device operations
pub type Result<T> = std::result::Result<T, ResponderError>;

#[derive(Error, Debug)]
pub enum ResponderError {
    /// Broker unreachable or session setup failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Request topic has fewer segments than the contract requires
    #[error("malformed topic '{topic}': expected device/<id>/directmethod/<method>/request")]
    MalformedTopic { topic: String },

    /// Request payload is not valid JSON
    #[error("invalid request payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Request payload has no `RequestId` field
    #[error("request on '{topic}' has no RequestId field")]
    MissingRequestId { topic: String },

    /// MQTT client rejected an operation
    #[error("mqtt client error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    #[error("config error: {0}")]
    Config(String),
}
