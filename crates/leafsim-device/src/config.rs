//! Broker and device configuration
//!
//! Mirrors the reference deployment's defaults: broker on `127.0.0.1:1883`,
//! 60-second keep-alive, QoS 0. All fields are optional in a TOML file;
//! CLI flags override file values at the binary boundary.

use crate::error::{ResponderError, Result};
use crate::policy::ResponsePolicy;
use rumqttc::QoS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Direct-method responder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// MQTT broker host
    #[serde(default = "default_broker_host")]
    pub broker_host: String,
    /// MQTT broker port
    #[serde(default = "default_broker_port")]
    pub broker_port: u16,
    /// Client ID for the MQTT connection
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Keep alive interval in seconds
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u16,
    /// QoS level (0, 1, or 2) for both the subscription and response publishes
    #[serde(default)]
    pub qos: u8,
    /// Topic filter for inbound requests
    #[serde(default = "default_topic_filter")]
    pub topic_filter: String,
    /// Response payload generation policy
    #[serde(default)]
    pub policy: ResponsePolicy,
}

/// Telemetry emitter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    #[serde(default = "default_broker_host")]
    pub broker_host: String,
    #[serde(default = "default_broker_port")]
    pub broker_port: u16,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u16,
    #[serde(default)]
    pub qos: u8,
    /// Device ID used in the `device/<id>/message` topic
    pub device_id: String,
    /// Interval between telemetry messages, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Number of messages to publish; unlimited when absent
    #[serde(default)]
    pub count: Option<u64>,
}

fn default_broker_host() -> String {
    crate::DEFAULT_BROKER_HOST.to_string()
}

fn default_broker_port() -> u16 {
    crate::DEFAULT_BROKER_PORT
}

fn default_keep_alive() -> u16 {
    60
}

fn default_topic_filter() -> String {
    crate::REQUEST_TOPIC_FILTER.to_string()
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_client_id() -> String {
    format!(
        "leafsim-{}",
        uuid::Uuid::new_v4()
            .to_string()
            .split('-')
            .next()
            .unwrap_or("0")
    )
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            broker_host: default_broker_host(),
            broker_port: default_broker_port(),
            client_id: default_client_id(),
            keep_alive_secs: default_keep_alive(),
            qos: 0,
            topic_filter: default_topic_filter(),
            policy: ResponsePolicy::default(),
        }
    }
}

impl ResponderConfig {
    /// Load a responder configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ResponderError::Config(format!("read config file: {}", e)))?;
        toml::from_str(&text).map_err(|e| ResponderError::Config(format!("parse config: {}", e)))
    }
}

/// Map a numeric QoS level to the rumqttc type.
pub fn parse_qos(qos: u8) -> QoS {
    match qos {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        _ => QoS::ExactlyOnce,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ResponderConfig::default();
        assert_eq!(config.broker_host, "127.0.0.1");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.qos, 0);
        assert_eq!(config.topic_filter, "device/+/directmethod/+/request");
        assert!(config.client_id.starts_with("leafsim-"));
    }

    #[test]
    fn test_toml_defaults_fill_in() {
        let config: ResponderConfig = toml::from_str("broker_port = 2883").unwrap();
        assert_eq!(config.broker_port, 2883);
        assert_eq!(config.broker_host, "127.0.0.1");
        assert_eq!(config.policy, ResponsePolicy::Static);
    }

    #[test]
    fn test_toml_policy_field() {
        let config: ResponderConfig = toml::from_str("policy = \"random\"").unwrap();
        assert_eq!(config.policy, ResponsePolicy::Random);
    }

    #[test]
    fn test_parse_qos() {
        assert_eq!(parse_qos(0), QoS::AtMostOnce);
        assert_eq!(parse_qos(1), QoS::AtLeastOnce);
        assert_eq!(parse_qos(2), QoS::ExactlyOnce);
    }
}
