//! Contract tests for the direct-method request/response flow
//!
//! These exercise the full per-message path (parse, policy, topic
//! derivation, serialization) without a broker.

use leafsim_device::ResponsePolicy;
use serde_json::Value;

fn respond(
    topic: &str,
    payload: &[u8],
    policy: ResponsePolicy,
) -> leafsim_device::Result<(String, Value)> {
    let response = leafsim_device::method::respond_to(topic, payload, policy)?;
    let bytes = response.to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("response is valid JSON");
    Ok((response.topic, body))
}

#[test]
fn valid_request_yields_one_response_on_derived_topic() {
    let (topic, body) = respond(
        "device/42/directmethod/reboot/request",
        br#"{"RequestId": "abc-123"}"#,
        ResponsePolicy::Static,
    )
    .unwrap();

    assert_eq!(topic, "device/42/directmethod/reboot/response");
    assert_eq!(body["RequestId"], "abc-123");
    assert_eq!(body["Data"]["value1"], 123);
    assert_eq!(body["Data"]["value2"], "FooBar");
}

#[test]
fn unknown_payload_fields_are_ignored() {
    let (_, body) = respond(
        "device/1/directmethod/ping/request",
        br#"{"RequestId": 99, "Ttl": 30, "Nested": {"a": 1}}"#,
        ResponsePolicy::Static,
    )
    .unwrap();
    assert_eq!(body["RequestId"], 99);
}

#[test]
fn random_policy_stays_in_range_and_varies() {
    let mut values = std::collections::HashSet::new();
    for _ in 0..1000 {
        let (_, body) = respond(
            "device/1/directmethod/ping/request",
            br#"{"RequestId": "r"}"#,
            ResponsePolicy::Random,
        )
        .unwrap();
        let v1 = body["Data"]["value1"].as_i64().unwrap();
        assert!((0..100).contains(&v1));
        let v2 = body["Data"]["value2"].as_f64().unwrap();
        assert!((0.0..1.0).contains(&v2));
        values.insert(body["Data"]["value2"].to_string());
    }
    assert!(values.len() > 900);
}

#[test]
fn malformed_topic_is_an_error_not_a_panic() {
    let err = leafsim_device::method::respond_to(
        "device/1/request",
        br#"{"RequestId": "x"}"#,
        ResponsePolicy::Static,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        leafsim_device::ResponderError::MalformedTopic { .. }
    ));
}

#[test]
fn empty_object_payload_is_dropped() {
    let err = leafsim_device::method::respond_to(
        "device/1/directmethod/ping/request",
        b"{}",
        ResponsePolicy::Static,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        leafsim_device::ResponderError::MissingRequestId { .. }
    ));
}

#[test]
fn topic_replace_is_global() {
    let (topic, _) = respond(
        "device/request1/directmethod/ping/request",
        br#"{"RequestId": "x"}"#,
        ResponsePolicy::Static,
    )
    .unwrap();
    assert_eq!(topic, "device/response1/directmethod/ping/response");
}
