// src/models/location.rs

//! Location values and their display normalization.
//!
//! The backend stores a listing location either as free text, as a JSON
//! document serialized into a string, or as a structured object. All three
//! collapse into one display string here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display string used whenever no location can be derived.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// A structured address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationParts {
    pub address: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl LocationParts {
    /// Read the five address fields out of a JSON object.
    ///
    /// Numbers are kept (pincodes often arrive numeric), anything else that
    /// is not a string counts as empty.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let field = |key: &str| map.get(key).map(scalar_text).unwrap_or_default();
        Self {
            address: field("address"),
            area: field("area"),
            city: field("city"),
            state: field("state"),
            pincode: field("pincode"),
        }
    }

    /// Join the non-empty fields in address order.
    pub fn joined(&self) -> Option<String> {
        let parts: Vec<&str> = [
            &self.address,
            &self.area,
            &self.city,
            &self.state,
            &self.pincode,
        ]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// A location value after shape detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Free text, shown as-is
    Text(String),
    /// Structured address
    Parts(LocationParts),
    /// Nothing usable
    Missing,
}

impl Location {
    /// Classify a raw JSON location field.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Self::from_text(s),
            Some(Value::Object(map)) => Self::Parts(LocationParts::from_map(map)),
            _ => Self::Missing,
        }
    }

    /// Classify a location string, unpacking JSON-encoded objects.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }

        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            return match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Object(map)) => Self::Parts(LocationParts::from_map(&map)),
                _ => Self::Text(text.to_string()),
            };
        }

        Self::Text(trimmed.to_string())
    }

    /// Human-readable form, never empty.
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .joined()
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            Self::Missing => UNKNOWN_LOCATION.to_string(),
        }
    }

    /// Shorthand for `Location::from_value(value).display()`.
    pub fn normalize(value: Option<&Value>) -> String {
        Self::from_value(value).display()
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_values_are_unknown() {
        assert_eq!(Location::normalize(None), "Unknown");
        assert_eq!(Location::normalize(Some(&Value::Null)), "Unknown");
        assert_eq!(Location::normalize(Some(&json!(""))), "Unknown");
        assert_eq!(Location::normalize(Some(&json!("   "))), "Unknown");
        assert_eq!(Location::normalize(Some(&json!(false))), "Unknown");
        assert_eq!(Location::normalize(Some(&json!(0))), "Unknown");
        assert_eq!(Location::normalize(Some(&json!(["Delhi"]))), "Unknown");
    }

    #[test]
    fn test_plain_string_is_trimmed() {
        assert_eq!(Location::normalize(Some(&json!("  North Campus "))), "North Campus");
    }

    #[test]
    fn test_object_joins_in_fixed_order() {
        let value = json!({
            "pincode": "110007",
            "city": "Delhi",
            "address": "Hostel 4",
            "area": "",
            "state": "Delhi"
        });
        assert_eq!(
            Location::normalize(Some(&value)),
            "Hostel 4, Delhi, Delhi, 110007"
        );
    }

    #[test]
    fn test_numeric_pincode_is_kept() {
        let value = json!({ "city": "Pune", "pincode": 411007 });
        assert_eq!(Location::normalize(Some(&value)), "Pune, 411007");
    }

    #[test]
    fn test_empty_object_is_unknown() {
        assert_eq!(Location::normalize(Some(&json!({}))), "Unknown");
        assert_eq!(
            Location::normalize(Some(&json!({ "city": " ", "state": null }))),
            "Unknown"
        );
    }

    #[test]
    fn test_json_string_is_unpacked() {
        let value = json!(r#"{"area":"Kamla Nagar","city":"Delhi"}"#);
        assert_eq!(Location::normalize(Some(&value)), "Kamla Nagar, Delhi");
    }

    #[test]
    fn test_empty_json_string_is_unknown() {
        assert_eq!(Location::normalize(Some(&json!("{}"))), "Unknown");
    }

    #[test]
    fn test_malformed_json_string_is_returned_unchanged() {
        assert_eq!(Location::normalize(Some(&json!("{not valid"))), "{not valid");
        assert_eq!(
            Location::normalize(Some(&json!("{city: Delhi}"))),
            "{city: Delhi}"
        );
    }
}
