//! Simulated MQTT leaf devices
//!
//! Test fixtures for exercising direct-method gateways over an MQTT broker:
//! - Direct-method responder ([`DirectMethodResponder`]): answers every
//!   request published under `device/+/directmethod/+/request` with a
//!   derived response message
//! - Telemetry emitter ([`TelemetryEmitter`]): publishes periodic telemetry
//!   to `device/<id>/message`
//!
//! The request/response contract itself lives in [`method`] and is pure:
//! no broker is needed to test it.

pub mod config;
pub mod error;
pub mod method;
pub mod policy;
pub mod responder;
pub mod telemetry;

pub use config::{EmitterConfig, ResponderConfig};
pub use error::{ResponderError, Result};
pub use method::{respond_to, response_topic, MethodRequest, MethodResponse};
pub use policy::ResponsePolicy;
pub use responder::{DirectMethodResponder, ResponderEvent};
pub use telemetry::TelemetryEmitter;

/// Topic filter matching direct-method requests to any device.
pub const REQUEST_TOPIC_FILTER: &str = "device/+/directmethod/+/request";

/// Default broker address used by the reference deployment.
pub const DEFAULT_BROKER_HOST: &str = "127.0.0.1";

/// Default MQTT port.
pub const DEFAULT_BROKER_PORT: u16 = 1883;
