//! # Douyin Pay Signatures
//!
//! Outbound request signing (MD5 over the sorted parameter values plus the
//! payment salt) and inbound callback verification (SHA-1 over the sorted
//! token, timestamp, nonce and body).

use md5::{Digest, Md5};
use pay_core::{CallbackHeaders, PaymentResult};
use serde_json::{Map, Value};
use sha1::Sha1;
use tracing::{debug, error, warn};

/// Fields never included in an outbound signature
pub const SIGN_EXCLUDED_FIELDS: [&str; 3] = ["app_id", "sign", "other_settle_params"];

/// Sign outbound request parameters.
///
/// Values (not keys) are normalized, sorted together with `salt`, joined with
/// `&` and hashed with MD5. Returns 32 lowercase hex characters.
pub fn generate_outbound_signature(params: &Map<String, Value>, salt: &str) -> String {
    let mut values: Vec<String> = params
        .iter()
        .filter(|(key, _)| !SIGN_EXCLUDED_FIELDS.contains(&key.as_str()))
        .filter_map(|(_, value)| normalize_value(value))
        .collect();

    values.push(salt.to_string());
    values.sort();

    hex::encode(Md5::digest(values.join("&").as_bytes()))
}

/// String form of a parameter value as it enters the signature, or `None`
/// when the value is skipped.
///
/// Float-typed numbers use the shortest decimal form, so `1.0` signs as `1`.
fn normalize_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    };

    let mut text = text.trim();
    if text.len() > 1 && text.starts_with('"') && text.ends_with('"') {
        text = text[1..text.len() - 1].trim();
    }

    if text.is_empty() || text == "null" {
        None
    } else {
        Some(text.to_string())
    }
}

/// Compute the callback signature for already-serialized parts.
pub fn callback_signature(token: &str, timestamp: &str, nonce: &str, msg: &str) -> String {
    let mut parts = [token, timestamp, nonce, msg];
    parts.sort_unstable();

    hex::encode(Sha1::digest(parts.concat().as_bytes()))
}

/// Sign a callback body the way the platform does (for tests and tooling).
pub fn sign_callback(
    token: &str,
    timestamp: &str,
    nonce: &str,
    body: &Value,
) -> PaymentResult<String> {
    let msg = serde_json::to_string(body)?;
    Ok(callback_signature(token, timestamp, nonce, &msg))
}

/// Verify an inbound payment callback.
///
/// Fails closed: missing headers or a serialization problem yield `false`.
pub fn verify_callback_signature(headers: &CallbackHeaders, body: &Value, token: &str) -> bool {
    let present = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

    let (Some(timestamp), Some(nonce), Some(signature)) = (
        present(&headers.timestamp),
        present(&headers.nonce),
        present(&headers.signature),
    ) else {
        warn!(
            timestamp = ?headers.timestamp,
            nonce = ?headers.nonce,
            signature = ?headers.signature,
            "Callback signature headers missing"
        );
        return false;
    };

    let msg = match serde_json::to_string(body) {
        Ok(msg) => msg,
        Err(e) => {
            error!("Failed to serialize callback body: {}", e);
            return false;
        }
    };

    let calculated = callback_signature(token, &timestamp, &nonce, &msg);

    debug!(
        token = %format!("{}...", token.chars().take(8).collect::<String>()),
        timestamp = %timestamp,
        nonce = %nonce,
        msg_len = msg.len(),
        calculated = %calculated,
        received = %signature,
        "Callback signature check"
    );

    constant_time_compare(&calculated, &signature)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // sha1("1nt{\"a\":1}")
    const FIXTURE_SIGNATURE: &str = "dd4474afff2c21240adc54ccde9ab1f93758ae83";

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_outbound_signature_known_value() {
        let p = params(json!({ "b": "b", "a": "a" }));
        // md5("a&b&salt")
        assert_eq!(
            generate_outbound_signature(&p, "salt"),
            "c5bb0e7e7438f9a139c8ce666f010868"
        );
    }

    #[test]
    fn test_outbound_signature_is_deterministic() {
        let p = params(json!({
            "out_order_no": "ORD1",
            "total_amount": 990,
            "valid_time": 1800
        }));

        let first = generate_outbound_signature(&p, "salt");
        let second = generate_outbound_signature(&p, "salt");

        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_excluded_fields_do_not_change_signature() {
        let base = params(json!({ "out_order_no": "ORD1", "total_amount": 990 }));
        let with_excluded = params(json!({
            "out_order_no": "ORD1",
            "total_amount": 990,
            "app_id": "tt123",
            "sign": "abc",
            "other_settle_params": "xyz"
        }));
        let changed_excluded = params(json!({
            "out_order_no": "ORD1",
            "total_amount": 990,
            "app_id": "tt999",
            "sign": "zzz",
            "other_settle_params": "other"
        }));

        let expected = generate_outbound_signature(&base, "salt");
        assert_eq!(generate_outbound_signature(&with_excluded, "salt"), expected);
        assert_eq!(
            generate_outbound_signature(&changed_excluded, "salt"),
            expected
        );
    }

    #[test]
    fn test_signature_ignores_key_order() {
        let forward = params(json!({ "x": "1", "y": "2", "z": "3" }));
        let reverse = params(json!({ "z": "3", "y": "2", "x": "1" }));

        assert_eq!(
            generate_outbound_signature(&forward, "salt"),
            generate_outbound_signature(&reverse, "salt")
        );
    }

    #[test]
    fn test_normalize_strips_one_layer_of_quotes() {
        assert_eq!(normalize_value(&json!("\"foo\"")), Some("foo".to_string()));
        assert_eq!(normalize_value(&json!("foo")), Some("foo".to_string()));
        assert_eq!(
            normalize_value(&json!("\"\"foo\"\"")),
            Some("\"foo\"".to_string())
        );
        assert_eq!(normalize_value(&json!("  \" bar \" ")), Some("bar".to_string()));
        assert_eq!(normalize_value(&json!("\"")), Some("\"".to_string()));
    }

    #[test]
    fn test_normalize_skips_empty_values() {
        assert_eq!(normalize_value(&Value::Null), None);
        assert_eq!(normalize_value(&json!("")), None);
        assert_eq!(normalize_value(&json!("   ")), None);
        assert_eq!(normalize_value(&json!("null")), None);
        assert_eq!(normalize_value(&json!("\"null\"")), None);
        assert_eq!(normalize_value(&json!("\"\"")), None);
        assert_eq!(normalize_value(&json!(1800)), Some("1800".to_string()));
        assert_eq!(normalize_value(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_integral_floats_sign_like_integers() {
        assert_eq!(normalize_value(&json!(1.0)), Some("1".to_string()));
        assert_eq!(normalize_value(&json!(9.9)), Some("9.9".to_string()));
        assert_eq!(normalize_value(&json!(-2.5)), Some("-2.5".to_string()));

        assert_eq!(
            generate_outbound_signature(&params(json!({ "total_amount": 990.0 })), "salt"),
            generate_outbound_signature(&params(json!({ "total_amount": 990 })), "salt")
        );
    }

    #[test]
    fn test_skipped_values_do_not_change_signature() {
        let base = params(json!({ "a": "a", "b": "b" }));
        let with_blanks = params(json!({
            "a": "a",
            "b": " b ",
            "c": null,
            "d": "",
            "e": "null"
        }));

        assert_eq!(
            generate_outbound_signature(&with_blanks, "salt"),
            generate_outbound_signature(&base, "salt")
        );
    }

    #[test]
    fn test_empty_salt_is_still_appended() {
        let p = params(json!({ "a": "foo" }));
        // md5("&foo"): the empty salt sorts first
        assert_eq!(
            generate_outbound_signature(&p, ""),
            "1deaa0e86b133f8d1c2efe74956098b9"
        );
    }

    #[test]
    fn test_callback_fixture_verifies() {
        let body = json!({ "a": 1 });
        let headers = CallbackHeaders::new("1", "n", FIXTURE_SIGNATURE);

        assert!(verify_callback_signature(&headers, &body, "t"));
        assert_eq!(
            sign_callback("t", "1", "n", &body).unwrap(),
            FIXTURE_SIGNATURE
        );
    }

    #[test]
    fn test_callback_single_character_mutations_fail() {
        let body = json!({ "a": 1 });

        let mut mutated = FIXTURE_SIGNATURE.to_string();
        mutated.replace_range(0..1, "e");
        assert!(!verify_callback_signature(
            &CallbackHeaders::new("1", "n", mutated),
            &body,
            "t"
        ));

        assert!(!verify_callback_signature(
            &CallbackHeaders::new("1", "n", FIXTURE_SIGNATURE.to_uppercase()),
            &body,
            "t"
        ));
        assert!(!verify_callback_signature(
            &CallbackHeaders::new("2", "n", FIXTURE_SIGNATURE),
            &body,
            "t"
        ));
        assert!(!verify_callback_signature(
            &CallbackHeaders::new("1", "m", FIXTURE_SIGNATURE),
            &body,
            "t"
        ));
        assert!(!verify_callback_signature(
            &CallbackHeaders::new("1", "n", FIXTURE_SIGNATURE),
            &json!({ "a": 2 }),
            "t"
        ));
        assert!(!verify_callback_signature(
            &CallbackHeaders::new("1", "n", FIXTURE_SIGNATURE),
            &body,
            "u"
        ));
    }

    #[test]
    fn test_callback_missing_headers_fail_closed() {
        let body = json!({ "a": 1 });

        let mut headers = CallbackHeaders::new("1", "n", FIXTURE_SIGNATURE);
        headers.timestamp = None;
        assert!(!verify_callback_signature(&headers, &body, "t"));

        let mut headers = CallbackHeaders::new("1", "n", FIXTURE_SIGNATURE);
        headers.nonce = Some(String::new());
        assert!(!verify_callback_signature(&headers, &body, "t"));

        let mut headers = CallbackHeaders::new("1", "n", FIXTURE_SIGNATURE);
        headers.signature = None;
        assert!(!verify_callback_signature(&headers, &body, "t"));

        assert!(!verify_callback_signature(
            &CallbackHeaders::default(),
            &body,
            "t"
        ));
    }

    #[test]
    fn test_callback_body_keeps_key_order() {
        let body: Value =
            serde_json::from_str(r#"{"out_order_no":"ORD1","order_status":"SUCCESS","total_fee":2990,"pay_time":"2026-01-01T00:00:00Z","transaction_id":"tx1"}"#)
                .unwrap();
        let headers = CallbackHeaders::new(
            "1700000000",
            "nonce123",
            "bc73a24a04fcc1045c38a1c81531802dc04c4e2f",
        );

        assert!(verify_callback_signature(&headers, &body, "cb_token"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
