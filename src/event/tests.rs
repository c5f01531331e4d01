use super::*;
use serde_json::json;

#[test]
fn test_event_serializes_to_wl_event_shape() {
    let event = ChangeEvent::new("srv1", "SHUTDOWN");

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value, json!({"wl_event": {"srv1": "SHUTDOWN"}}));
}

#[test]
fn test_event_accessors() {
    let event = ChangeEvent::new("AdminServer", "RUNNING");
    assert_eq!(event.name(), "AdminServer");
    assert_eq!(event.state(), "RUNNING");
}

#[test]
fn test_event_deserializes_from_json() {
    let event: ChangeEvent =
        serde_json::from_str(r#"{"wl_event": {"managed-1": "STARTING"}}"#).unwrap();
    assert_eq!(event, ChangeEvent::new("managed-1", "STARTING"));
}

#[test]
fn test_empty_event_accessors_are_empty() {
    let event = ChangeEvent {
        wl_event: BTreeMap::new(),
    };
    assert_eq!(event.name(), "");
    assert_eq!(event.state(), "");
}
