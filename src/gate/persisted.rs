//! On-disk shape of the gate state.
//!
//! Decoding is field-by-field: every field that is missing or has the wrong
//! type falls back to its default on its own, so one bad field never discards
//! the rest of the record.
use super::GateState;
use crate::identity::Identity;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRecord<'a> {
    query_count: u32,
    bonus_granted: bool,
    authenticated: bool,
    identity: Option<&'a Identity>,
}

/// Serialize the persisted subset of `state`; `modal_visible` never leaves the session.
pub(crate) fn encode(state: &GateState) -> serde_json::Result<String> {
    serde_json::to_string(&PersistedRecord {
        query_count: state.query_count,
        bonus_granted: state.bonus_granted,
        authenticated: state.authenticated,
        identity: state.identity.as_ref(),
    })
}

/// Result of decoding a stored record.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub(crate) state: GateState,
    /// Fields that were absent or invalid and took their default.
    pub(crate) defaulted: Vec<&'static str>,
}

pub(crate) fn decode(text: &str) -> Decoded {
    let mut defaulted = Vec::new();
    let fields = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(fields)) => fields,
        _ => {
            return Decoded {
                state: GateState::default(),
                defaulted: vec!["<record>"],
            }
        }
    };

    let query_count = read_field(&fields, "queryCount", as_count, &mut defaulted).unwrap_or(0);
    let bonus_granted =
        read_field(&fields, "bonusGranted", Value::as_bool, &mut defaulted).unwrap_or(false);
    let authenticated =
        read_field(&fields, "authenticated", Value::as_bool, &mut defaulted).unwrap_or(false);
    let identity = match fields.get("identity") {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value::<Identity>(value.clone()) {
            Ok(identity) => Some(identity),
            Err(_) => {
                defaulted.push("identity");
                None
            }
        },
    };

    // The identity invariant wins over the stored flag in either direction.
    let signed_in = authenticated && identity.is_some();
    if authenticated != signed_in || (identity.is_some() && !signed_in) {
        defaulted.push("authenticated");
    }

    Decoded {
        state: GateState {
            authenticated: signed_in,
            identity: if signed_in { identity } else { None },
            query_count,
            bonus_granted,
            modal_visible: false,
        },
        defaulted,
    }
}

fn read_field<T>(
    fields: &Map<String, Value>,
    name: &'static str,
    parse: impl Fn(&Value) -> Option<T>,
    defaulted: &mut Vec<&'static str>,
) -> Option<T> {
    let parsed = fields.get(name).and_then(parse);
    if parsed.is_none() {
        defaulted.push(name);
    }
    parsed
}

/// Counts may have been written by a JavaScript client as `3.0`.
fn as_count(value: &Value) -> Option<u32> {
    let whole = match value.as_u64() {
        Some(count) => count,
        None => {
            let float = value.as_f64()?;
            if !float.is_finite() || float < 0.0 || float.fract() != 0.0 {
                return None;
            }
            float as u64
        }
    };
    u32::try_from(whole).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Provider;

    #[test]
    fn encode_writes_exactly_the_persisted_fields() {
        let state = GateState {
            authenticated: true,
            identity: Some(Identity::new("u-1", "a@example.com", "Ada", Provider::Email)),
            query_count: 2,
            bonus_granted: true,
            modal_visible: true,
        };
        let value: Value =
            serde_json::from_str(&encode(&state).expect("encode")).expect("parse encoded");
        let mut keys: Vec<_> = value
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            ["authenticated", "bonusGranted", "identity", "queryCount"]
        );
        assert_eq!(value["identity"]["provider"], "email");
    }

    #[test]
    fn anonymous_state_encodes_null_identity() {
        let value: Value = serde_json::from_str(&encode(&GateState::default()).expect("encode"))
            .expect("parse encoded");
        assert_eq!(value["identity"], Value::Null);
    }

    #[test]
    fn decode_defaults_each_bad_field_independently() {
        let decoded = decode(r#"{"queryCount":"three","bonusGranted":true,"authenticated":1}"#);
        assert_eq!(decoded.state.query_count, 0);
        assert!(decoded.state.bonus_granted);
        assert!(!decoded.state.authenticated);
        assert!(decoded.defaulted.contains(&"queryCount"));
        assert!(decoded.defaulted.contains(&"authenticated"));
        assert!(!decoded.defaulted.contains(&"bonusGranted"));
    }

    #[test]
    fn decode_rejects_negative_and_fractional_counts() {
        assert_eq!(decode(r#"{"queryCount":-1}"#).state.query_count, 0);
        assert_eq!(decode(r#"{"queryCount":1.5}"#).state.query_count, 0);
        assert_eq!(decode(r#"{"queryCount":2.0}"#).state.query_count, 2);
    }

    #[test]
    fn decode_treats_non_object_records_as_absent() {
        for text in ["", "[]", "42", "{not-json"] {
            let decoded = decode(text);
            assert_eq!(decoded.state, GateState::default(), "input {text:?}");
            assert_eq!(decoded.defaulted, vec!["<record>"]);
        }
    }

    #[test]
    fn decode_drops_authentication_without_a_valid_identity() {
        let decoded = decode(
            r#"{"queryCount":1,"authenticated":true,"identity":{"id":"u","provider":"myspace"}}"#,
        );
        assert!(!decoded.state.authenticated);
        assert!(decoded.state.identity.is_none());
        assert_eq!(decoded.state.query_count, 1);
        assert!(decoded.defaulted.contains(&"identity"));
    }

    #[test]
    fn decode_drops_identity_when_not_authenticated() {
        let decoded = decode(
            r#"{"authenticated":false,"identity":{"id":"u","email":"e","name":"n","provider":"google"}}"#,
        );
        assert!(!decoded.state.authenticated);
        assert!(decoded.state.identity.is_none());
    }

    #[test]
    fn decode_ignores_a_stored_modal_flag() {
        let decoded = decode(r#"{"queryCount":3,"showSignupModal":true,"modalVisible":true}"#);
        assert!(!decoded.state.modal_visible);
        assert_eq!(decoded.state.query_count, 3);
    }
}
