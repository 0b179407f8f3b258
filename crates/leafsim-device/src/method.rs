//! Direct-method request/response contract
//!
//! Requests arrive on `device/<deviceId>/directmethod/<methodName>/request`
//! as JSON objects carrying a `RequestId`. The response goes out on the
//! topic derived by replacing the substring `request` with `response` and
//! echoes the `RequestId` alongside a policy-generated `Data` object.
//!
//! Everything here is pure: parsing and response construction take no
//! transport handle, so the contract is testable without a broker.

use crate::error::{ResponderError, Result};
use crate::policy::ResponsePolicy;
use serde_json::{json, Value};

/// A parsed direct-method request.
#[derive(Debug, Clone)]
pub struct MethodRequest {
    /// Topic the request arrived on, verbatim
    pub topic: String,
    /// Segment 1 of the topic
    pub device_id: String,
    /// Segment 3 of the topic
    pub method_name: String,
    /// `RequestId` field of the payload, echoed verbatim into the response
    pub request_id: Value,
}

impl MethodRequest {
    /// Parse an inbound message into a request.
    ///
    /// Fails on a topic with fewer than four segments, a payload that is
    /// not valid JSON, or a payload without a `RequestId` field. Unknown
    /// payload fields are ignored.
    pub fn parse(topic: &str, payload: &[u8]) -> Result<Self> {
        let segments: Vec<&str> = topic.split('/').collect();
        if segments.len() < 4 {
            return Err(ResponderError::MalformedTopic {
                topic: topic.to_string(),
            });
        }

        let body: Value = serde_json::from_slice(payload)?;
        let request_id = body
            .get("RequestId")
            .cloned()
            .ok_or_else(|| ResponderError::MissingRequestId {
                topic: topic.to_string(),
            })?;

        Ok(Self {
            topic: topic.to_string(),
            device_id: segments[1].to_string(),
            method_name: segments[3].to_string(),
            request_id,
        })
    }

    /// Build the response for this request under the given policy.
    pub fn respond(&self, policy: ResponsePolicy) -> MethodResponse {
        MethodResponse {
            topic: response_topic(&self.topic),
            payload: json!({
                "RequestId": self.request_id,
                "Data": policy.generate_data(),
            }),
        }
    }
}

/// The outbound response to one request.
#[derive(Debug, Clone)]
pub struct MethodResponse {
    /// Topic to publish on
    pub topic: String,
    /// JSON body: `{"RequestId": ..., "Data": {"value1": ..., "value2": ...}}`
    pub payload: Value,
}

impl MethodResponse {
    /// Serialize the payload for publishing.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Value serialization cannot fail
        serde_json::to_vec(&self.payload).unwrap_or_default()
    }
}

/// Derive the response topic from a request topic.
///
/// Replaces every occurrence of the substring `request`, not just the
/// trailing segment. The reference fixture did a blanket string replace,
/// and downstream consumers match on the resulting topics, so a device or
/// method name containing `request` is mutated too. Kept verbatim.
pub fn response_topic(request_topic: &str) -> String {
    request_topic.replace("request", "response")
}

/// Handle one inbound message end to end: parse, then build the response.
pub fn respond_to(topic: &str, payload: &[u8], policy: ResponsePolicy) -> Result<MethodResponse> {
    Ok(MethodRequest::parse(topic, payload)?.respond(policy))
}
