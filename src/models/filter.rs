// src/models/filter.rs

//! Filter state and its mapping to backend query parameters.
//!
//! [`FilterSelection`] is what a browsing user picks; [`FilterState`] is the
//! encoded form sent to the backend. Encoding keeps only non-empty values, so
//! "has any filter" is a plain emptiness check on the encoded state.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::models::ListingKind;

/// Recency window for the "date posted" filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePosted {
    Today,
    ThisWeek,
    ThisMonth,
    /// Any other window, in days
    Days(u32),
}

impl DatePosted {
    /// Parse a UI value: a named bucket or a number of days.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "today" => Some(Self::Today),
            "this_week" => Some(Self::ThisWeek),
            "this_month" => Some(Self::ThisMonth),
            other => other.parse().ok().map(Self::Days),
        }
    }

    /// Bucket a day count into the closest named window.
    pub fn from_days(days: u32) -> Self {
        match days {
            0..=1 => Self::Today,
            2..=7 => Self::ThisWeek,
            8..=30 => Self::ThisMonth,
            n => Self::Days(n),
        }
    }

    /// Day count sent to the backend.
    pub fn days(&self) -> u32 {
        match self {
            Self::Today => 1,
            Self::ThisWeek => 7,
            Self::ThisMonth => 30,
            Self::Days(n) => *n,
        }
    }
}

impl fmt::Display for DatePosted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("today"),
            Self::ThisWeek => f.write_str("this_week"),
            Self::ThisMonth => f.write_str("this_month"),
            Self::Days(n) => write!(f, "{n}"),
        }
    }
}

/// Filters as picked in the UI. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub category: String,
    pub location: String,
    pub min_price: String,
    pub max_price: String,
    pub conditions: Vec<String>,
    pub date_posted: Option<DatePosted>,
}

impl FilterSelection {
    /// Encode into backend query parameters, dropping empty values.
    pub fn encode(&self) -> FilterState {
        let conditions: Vec<&str> = self
            .conditions
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();

        FilterState {
            category: non_empty(&self.category),
            location: non_empty(&self.location),
            min_price: non_empty(&self.min_price),
            max_price: non_empty(&self.max_price),
            conditions: (!conditions.is_empty()).then(|| conditions.join(",")),
            date_posted: self.date_posted.map(|d| d.days()),
        }
    }

    /// Rebuild a UI selection from encoded parameters.
    pub fn decode(state: &FilterState) -> Self {
        Self {
            category: state.category.clone().unwrap_or_default(),
            location: state.location.clone().unwrap_or_default(),
            min_price: state.min_price.clone().unwrap_or_default(),
            max_price: state.max_price.clone().unwrap_or_default(),
            conditions: state
                .conditions
                .as_deref()
                .map(split_conditions)
                .unwrap_or_default(),
            date_posted: state.date_posted.map(DatePosted::from_days),
        }
    }

    /// Rebuild a UI selection from loosely typed props (e.g. handed down by
    /// a parent view or read from a saved search).
    ///
    /// `conditions` may be a list or a comma-separated string, `datePosted`
    /// a number, a numeric string or a bucket name. Prices may be numbers.
    pub fn from_props(props: &Value) -> Self {
        let text = |key: &str| match props.get(key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let conditions = match props.get("conditions") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => split_conditions(s),
            _ => Vec::new(),
        };

        let date_posted = match props.get("datePosted") {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|d| u32::try_from(d).ok())
                .map(DatePosted::from_days),
            Some(Value::String(s)) => match s.trim().parse::<u32>() {
                Ok(days) => Some(DatePosted::from_days(days)),
                Err(_) => DatePosted::parse(s),
            },
            _ => None,
        };

        Self {
            category: text("category"),
            location: text("location"),
            min_price: text("minPrice"),
            max_price: text("maxPrice"),
            conditions,
            date_posted,
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.encode().is_empty()
    }
}

/// Encoded filters, exactly the query parameters sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,

    /// Comma-joined list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,

    /// Window in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<u32>,
}

impl FilterState {
    /// The cleared state.
    pub fn reset() -> Self {
        Self::default()
    }

    /// Whether no filter is applied.
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Query parameters in a fixed key order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text_fields = [
            ("category", &self.category),
            ("location", &self.location),
            ("minPrice", &self.min_price),
            ("maxPrice", &self.max_price),
            ("conditions", &self.conditions),
        ];
        for (key, value) in text_fields {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        if let Some(days) = self.date_posted {
            pairs.push(("datePosted", days.to_string()));
        }
        pairs
    }

    /// Serialize as a URL query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }

    /// Parse a URL query string. Unknown keys and empty values are ignored,
    /// an unparseable `datePosted` is dropped.
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let value = non_empty(&value);
            match &*key {
                "category" => state.category = value,
                "location" => state.location = value,
                "minPrice" => state.min_price = value,
                "maxPrice" => state.max_price = value,
                "conditions" => state.conditions = value,
                "datePosted" => {
                    state.date_posted = value
                        .as_deref()
                        .and_then(DatePosted::parse)
                        .map(|d| d.days())
                }
                _ => {}
            }
        }
        state
    }

    /// Resource path to query: the filtered variant when any filter is set.
    pub fn endpoint(&self, kind: ListingKind) -> String {
        if self.is_empty() {
            kind.resource().to_string()
        } else {
            format!("{}/filter", kind.resource())
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn split_conditions(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_encode_drops_empty_fields() {
        let selection = FilterSelection {
            location: "Delhi".to_string(),
            ..FilterSelection::default()
        };
        let state = selection.encode();

        assert_eq!(serde_json::to_value(&state).unwrap(), json!({ "location": "Delhi" }));
        assert_eq!(state.endpoint(ListingKind::Product), "products/filter");
    }

    #[test]
    fn test_blank_props_only_keep_location() {
        let selection = FilterSelection::from_props(&json!({
            "category": "",
            "location": "Delhi",
            "minPrice": "",
            "maxPrice": ""
        }));
        let state = selection.encode();

        assert_eq!(state.query_pairs(), vec![("location", "Delhi".to_string())]);
        assert!(!state.is_empty());
        assert_eq!(state.endpoint(ListingKind::Product), "products/filter");
    }

    #[test]
    fn test_empty_selection_uses_plain_endpoint() {
        let selection = FilterSelection {
            category: "  ".to_string(),
            conditions: vec![String::new()],
            ..FilterSelection::default()
        };
        let state = selection.encode();

        assert!(state.is_empty());
        assert_eq!(state, FilterState::reset());
        assert_eq!(state.endpoint(ListingKind::Room), "rooms");
    }

    #[test]
    fn test_conditions_are_comma_joined() {
        let selection = FilterSelection {
            conditions: vec!["new".to_string(), " like_new ".to_string()],
            ..FilterSelection::default()
        };
        assert_eq!(selection.encode().conditions.as_deref(), Some("new,like_new"));
    }

    #[test]
    fn test_date_posted_named_buckets() {
        assert_eq!(DatePosted::parse("today").map(|d| d.days()), Some(1));
        assert_eq!(DatePosted::parse("this_week").map(|d| d.days()), Some(7));
        assert_eq!(DatePosted::parse("this_month").map(|d| d.days()), Some(30));
        assert_eq!(DatePosted::parse("90").map(|d| d.days()), Some(90));
        assert_eq!(DatePosted::parse("last_year"), None);
    }

    #[test]
    fn test_date_posted_decoding_buckets() {
        let decoded: Vec<String> = [1, 7, 30, 90]
            .into_iter()
            .map(|d| DatePosted::from_days(d).to_string())
            .collect();
        assert_eq!(decoded, ["today", "this_week", "this_month", "90"]);

        let reencoded: Vec<u32> = decoded
            .iter()
            .filter_map(|s| DatePosted::parse(s))
            .map(|d| d.days())
            .collect();
        assert_eq!(reencoded, [1, 7, 30, 90]);
    }

    #[test]
    fn test_decode_then_encode_is_identity() {
        let states = [
            FilterState::default(),
            FilterState {
                location: Some("Delhi".to_string()),
                ..FilterState::default()
            },
            FilterState {
                category: Some("books".to_string()),
                min_price: Some("100".to_string()),
                max_price: Some("2500".to_string()),
                conditions: Some("new,good".to_string()),
                date_posted: Some(7),
                ..FilterState::default()
            },
            FilterState {
                date_posted: Some(90),
                ..FilterState::default()
            },
        ];

        for state in states {
            assert_eq!(FilterSelection::decode(&state).encode(), state);
        }
    }

    #[test]
    fn test_from_props_accepts_string_conditions_and_numbers() {
        let selection = FilterSelection::from_props(&json!({
            "category": "electronics",
            "minPrice": 500,
            "maxPrice": "",
            "conditions": "new, ,used",
            "datePosted": 30
        }));

        assert_eq!(selection.min_price, "500");
        assert_eq!(selection.conditions, ["new", "used"]);
        assert_eq!(selection.date_posted, Some(DatePosted::ThisMonth));
        assert_eq!(
            selection.encode().query_pairs(),
            vec![
                ("category", "electronics".to_string()),
                ("minPrice", "500".to_string()),
                ("conditions", "new,used".to_string()),
                ("datePosted", "30".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_props_accepts_list_conditions_and_bucket_names() {
        let selection = FilterSelection::from_props(&json!({
            "conditions": ["good", ""],
            "datePosted": "this_week"
        }));
        assert_eq!(selection.conditions, ["good"]);
        assert_eq!(selection.date_posted, Some(DatePosted::ThisWeek));
    }

    #[test]
    fn test_query_string_round_trip() {
        let state = FilterState::from_query_string(
            "?location=North+Campus&minPrice=&conditions=new%2Cgood&datePosted=this_week&sort=asc",
        );

        assert_eq!(state.location.as_deref(), Some("North Campus"));
        assert_eq!(state.min_price, None);
        assert_eq!(state.date_posted, Some(7));
        assert_eq!(
            state.to_query_string(),
            "location=North+Campus&conditions=new%2Cgood&datePosted=7"
        );
    }
}
