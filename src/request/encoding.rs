// Upload payload construction — how parameters become bytes for write requests.

use bytes::Bytes;
use serde_json::{Map, Value};

/// Selects how a descriptor's parameters become a byte payload, and which
/// content-type header the request advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadEncoding {
    /// `k=v` pairs joined with `&`.
    Form,
    /// A single JSON document over the parameter mapping.
    Json,
    /// Caller-supplied bytes, used for image and other binary fetches.
    Raw,
}

impl UploadEncoding {
    /// Content-type advertised for this encoding. Raw requests carry none.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            UploadEncoding::Form => Some("application/x-www-form-urlencoded; charset=utf-8"),
            UploadEncoding::Json => Some("application/json; charset=utf-8"),
            UploadEncoding::Raw => None,
        }
    }

    /// Build the upload payload. Null-valued parameters are omitted entirely,
    /// never encoded as an empty string. Returns `None` when there is nothing
    /// to upload.
    pub fn payload(&self, params: &[(String, Value)], raw: Option<&Bytes>) -> Option<Bytes> {
        match self {
            UploadEncoding::Form => {
                if params.is_empty() {
                    return None;
                }
                let entries: Vec<String> = params
                    .iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(name, value)| format!("{}={}", name, render_value(value)))
                    .collect();
                Some(Bytes::from(entries.join("&")))
            }
            UploadEncoding::Json => {
                if params.is_empty() {
                    return None;
                }
                let mut document = Map::new();
                for (name, value) in params {
                    if !value.is_null() {
                        document.insert(name.clone(), value.clone());
                    }
                }
                Some(Bytes::from(Value::Object(document).to_string()))
            }
            UploadEncoding::Raw => raw.cloned(),
        }
    }
}

/// Render a parameter value the way it appears in a query string or form
/// body: strings verbatim, everything else via its JSON rendering.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_form_payload_skips_nulls() {
        let params = params(&[("a", json!("1")), ("b", Value::Null)]);
        let payload = UploadEncoding::Form.payload(&params, None).unwrap();
        assert_eq!(&payload[..], b"a=1");
    }

    #[test]
    fn test_form_payload_joins_with_ampersand() {
        let params = params(&[("a", json!("1")), ("b", json!(2))]);
        let payload = UploadEncoding::Form.payload(&params, None).unwrap();
        assert_eq!(&payload[..], b"a=1&b=2");
    }

    #[test]
    fn test_json_payload_preserves_insertion_order() {
        let params = params(&[("z", json!("last")), ("a", json!(1)), ("gone", Value::Null)]);
        let payload = UploadEncoding::Json.payload(&params, None).unwrap();
        assert_eq!(&payload[..], br#"{"z":"last","a":1}"#);
    }

    #[test]
    fn test_no_payload_without_params() {
        assert!(UploadEncoding::Form.payload(&[], None).is_none());
        assert!(UploadEncoding::Json.payload(&[], None).is_none());
    }

    #[test]
    fn test_raw_payload_passes_bytes_through() {
        let raw = Bytes::from_static(b"\x89PNG");
        let payload = UploadEncoding::Raw.payload(&[], Some(&raw)).unwrap();
        assert_eq!(payload, raw);
        assert!(UploadEncoding::Raw.payload(&[], None).is_none());
        assert!(UploadEncoding::Raw.content_type().is_none());
    }
}
