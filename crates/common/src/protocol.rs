//! Plaintext request model and its canonical JSON form.
//!
//! The canonical JSON is what gets encrypted into the envelope, so the key
//! order and the omission rules are part of the wire contract:
//!
//! ```text
//! {"tokenize":true,            omitted when false
//!  "paymentProductId":1,        omitted when absent
//!  "accountOnFileId":"123",     omitted when absent
//!  "clientSessionId":"...",     omitted when empty
//!  "nonce":"...",               omitted when empty
//!  "paymentValues":[{"key":"cardNumber","value":"4012..."}, ...]}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cardholder-input value, identified by its payment product field id.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentValue {
    /// Payment product field id (e.g. `"cardNumber"`).
    pub key: String,
    /// Canonical (unmasked) field value.
    pub value: String,
}

impl PaymentValue {
    /// Construct a [`PaymentValue`] from a field id and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Debug for PaymentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field values are cardholder data; only the field id is printable.
        f.debug_struct("PaymentValue")
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Everything that gets encrypted for one payment attempt.
///
/// `payment_values` is an ordered list: the serialised array follows the order
/// in which values were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEncryptionData {
    /// Ask the gateway to store the card as an account on file.
    #[serde(default, skip_serializing_if = "is_false")]
    pub tokenize: bool,

    /// Selected payment product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_product_id: Option<i64>,

    /// Account on file the values belong to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_on_file_id: Option<String>,

    /// Client session the public key was issued for.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_session_id: String,

    /// Per-request nonce.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nonce: String,

    /// Field id / value pairs, always emitted (possibly as `[]`).
    #[serde(default)]
    pub payment_values: Vec<PaymentValue>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl RequestEncryptionData {
    /// Create a request for the given client session and nonce with no values.
    pub fn new(client_session_id: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            client_session_id: client_session_id.into(),
            nonce: nonce.into(),
            ..Self::default()
        }
    }

    /// Set the payment product id.
    pub fn with_payment_product_id(mut self, id: i64) -> Self {
        self.payment_product_id = Some(id);
        self
    }

    /// Set the account on file id.
    pub fn with_account_on_file_id(mut self, id: impl Into<String>) -> Self {
        self.account_on_file_id = Some(id.into());
        self
    }

    /// Set the tokenize flag.
    pub fn with_tokenize(mut self, tokenize: bool) -> Self {
        self.tokenize = tokenize;
        self
    }

    /// Append a payment value. Order of calls is the serialised order.
    pub fn with_payment_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payment_values.push(PaymentValue::new(key, value));
        self
    }

    /// Serialise to the canonical JSON string that gets encrypted.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`]; unreachable for this
    /// type in practice, since every field is a string, integer, or bool.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn fixture() -> RequestEncryptionData {
        RequestEncryptionData::new("clientSessionId", "nonce")
            .with_payment_product_id(1)
            .with_payment_value("cardNumber", "4012000033330026")
            .with_payment_value("cardholderName", "Test User")
            .with_payment_value("cvv", "123")
            .with_payment_value("expiryDate", "1225")
    }

    fn keys_of(json: &str) -> Vec<String> {
        let value: Value = serde_json::from_str(json).unwrap();
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn fixture_serialises_to_exact_literal() {
        let json = fixture().to_canonical_json().unwrap();
        assert_eq!(
            json,
            r#"{"paymentProductId":1,"clientSessionId":"clientSessionId","nonce":"nonce","paymentValues":[{"key":"cardNumber","value":"4012000033330026"},{"key":"cardholderName","value":"Test User"},{"key":"cvv","value":"123"},{"key":"expiryDate","value":"1225"}]}"#
        );
    }

    #[test]
    fn omits_false_tokenize_and_absent_account_on_file() {
        let req = RequestEncryptionData::new("s", "n")
            .with_payment_product_id(1)
            .with_payment_value("cardNumber", "4012000033330026");
        let mut keys = keys_of(&req.to_canonical_json().unwrap());
        keys.sort();
        assert_eq!(
            keys,
            ["clientSessionId", "nonce", "paymentProductId", "paymentValues"]
        );
    }

    #[test]
    fn emits_all_optional_fields_in_order() {
        let req = RequestEncryptionData::new("s", "n")
            .with_tokenize(true)
            .with_payment_product_id(3)
            .with_account_on_file_id("123")
            .with_payment_value("cvv", "999");
        assert_eq!(
            req.to_canonical_json().unwrap(),
            r#"{"tokenize":true,"paymentProductId":3,"accountOnFileId":"123","clientSessionId":"s","nonce":"n","paymentValues":[{"key":"cvv","value":"999"}]}"#
        );
    }

    #[test]
    fn empty_request_still_emits_payment_values() {
        let req = RequestEncryptionData::new("", "");
        assert_eq!(req.to_canonical_json().unwrap(), r#"{"paymentValues":[]}"#);
    }

    #[test]
    fn preserves_insertion_order() {
        let req = RequestEncryptionData::new("s", "n")
            .with_payment_value("zzz", "1")
            .with_payment_value("aaa", "2")
            .with_payment_value("mmm", "3");
        let value: Value = serde_json::from_str(&req.to_canonical_json().unwrap()).unwrap();
        let keys: Vec<&str> = value["paymentValues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, ["zzz", "aaa", "mmm"]);
    }

    #[test]
    fn escapes_strings_as_json() {
        let req = RequestEncryptionData::new("s", "n").with_payment_value("name", "O\"Brien\n");
        let json = req.to_canonical_json().unwrap();
        assert!(json.contains(r#""value":"O\"Brien\n""#));
    }

    #[test]
    fn canonical_json_parses_back() {
        let req = fixture().with_tokenize(true).with_account_on_file_id("42");
        let decoded: RequestEncryptionData =
            serde_json::from_str(&req.to_canonical_json().unwrap()).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn debug_redacts_values() {
        let out = format!("{:?}", fixture());
        assert!(out.contains("cardNumber"));
        assert!(!out.contains("4012000033330026"));
        assert!(out.contains("REDACTED"));
    }
}
