// src/models/raw.rs

//! Backend records, one decoded variant per listing kind.
//!
//! Every field is optional and decoded leniently: a field with an unexpected
//! shape falls back to its default instead of rejecting the whole record.
//! Only records that are not JSON objects are rejected.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ListingKind;

/// An image entry, either `{ "url": ... }` or a bare URL string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Object {
        #[serde(default)]
        url: Option<String>,
    },
    Url(String),
}

impl ImageRef {
    /// The URL, if non-empty.
    pub fn url(&self) -> Option<&str> {
        let url = match self {
            Self::Object { url } => url.as_deref()?,
            Self::Url(url) => url.as_str(),
        };
        let url = url.trim();
        (!url.is_empty()).then_some(url)
    }
}

/// A seller/provider reference, either populated (`{ "name": ... }`) or a
/// bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartyRef {
    Named {
        #[serde(default)]
        name: Option<String>,
    },
    Plain(String),
}

impl PartyRef {
    /// Name of a populated reference.
    pub fn nested_name(&self) -> Option<&str> {
        match self {
            Self::Named { name } => non_empty(name.as_deref()),
            Self::Plain(_) => None,
        }
    }

    /// Value of a bare string reference.
    pub fn plain(&self) -> Option<&str> {
        match self {
            Self::Plain(s) => non_empty(Some(s)),
            Self::Named { .. } => None,
        }
    }
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude", alias = "lon")]
    pub lng: f64,
}

/// Fields shared by every listing kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCommon {
    #[serde(default, alias = "_id", deserialize_with = "text_or_number")]
    pub id: String,

    #[serde(default, alias = "name", deserialize_with = "lenient")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub images: Vec<ImageRef>,

    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub seller: Option<PartyRef>,

    #[serde(default, deserialize_with = "lenient")]
    pub provider: Option<PartyRef>,

    /// Kept raw: normalized later by [`crate::models::Location`]
    #[serde(default)]
    pub location: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,

    #[serde(default, alias = "location_coordinates", deserialize_with = "lenient")]
    pub coordinates: Option<Coordinates>,

    #[serde(default, deserialize_with = "lenient")]
    pub negotiable: Option<bool>,

    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
}

/// A product record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(flatten)]
    pub common: ListingCommon,

    #[serde(default)]
    pub price: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub condition: Option<String>,
}

/// A room (accommodation) record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoom {
    #[serde(flatten)]
    pub common: ListingCommon,

    #[serde(default)]
    pub rent: Option<Value>,

    #[serde(default)]
    pub price: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub available_from: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub room_type: Option<String>,
}

/// A service record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawService {
    #[serde(flatten)]
    pub common: ListingCommon,

    #[serde(default)]
    pub price: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
}

/// A job record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJob {
    #[serde(flatten)]
    pub common: ListingCommon,

    #[serde(default)]
    pub salary: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub company: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub posted_time: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub job_type: Option<String>,
}

/// A backend record tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntity {
    Product(RawProduct),
    Room(RawRoom),
    Service(RawService),
    Job(RawJob),
}

impl RawEntity {
    /// Decode one record of the given kind.
    pub fn decode(kind: ListingKind, value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(AppError::decode(kind.tag(), "record is not a JSON object"));
        }

        let decoded = match kind {
            ListingKind::Product => serde_json::from_value(value).map(Self::Product),
            ListingKind::Room => serde_json::from_value(value).map(Self::Room),
            ListingKind::Service => serde_json::from_value(value).map(Self::Service),
            ListingKind::Job => serde_json::from_value(value).map(Self::Job),
        };
        decoded.map_err(|e| AppError::decode(kind.tag(), e))
    }

    /// Decode a list of records, skipping the ones that fail.
    pub fn decode_all(kind: ListingKind, values: Vec<Value>) -> Vec<Self> {
        values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match Self::decode(kind, value) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    log::warn!("Skipping {} record #{}: {}", kind, index, e);
                    None
                }
            })
            .collect()
    }

    pub fn kind(&self) -> ListingKind {
        match self {
            Self::Product(_) => ListingKind::Product,
            Self::Room(_) => ListingKind::Room,
            Self::Service(_) => ListingKind::Service,
            Self::Job(_) => ListingKind::Job,
        }
    }

    pub fn common(&self) -> &ListingCommon {
        match self {
            Self::Product(p) => &p.common,
            Self::Room(r) => &r.common,
            Self::Service(s) => &s.common,
            Self::Job(j) => &j.common,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Decode `T`, or fall back to its default when the shape does not match.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Ids arrive as strings (Mongo ObjectIds) or numbers.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_product_with_mongo_id() {
        let entity = RawEntity::decode(
            ListingKind::Product,
            json!({
                "_id": "65f0c0ffee",
                "title": "Engineering Drawing Kit",
                "price": 450,
                "images": [{ "url": "https://cdn.example/kit.jpg" }],
                "seller": { "name": "Ravi" },
                "condition": "good"
            }),
        )
        .unwrap();

        let RawEntity::Product(product) = entity else {
            panic!("expected a product");
        };
        assert_eq!(product.common.id, "65f0c0ffee");
        assert_eq!(product.common.images[0].url(), Some("https://cdn.example/kit.jpg"));
        assert_eq!(product.common.seller.unwrap().nested_name(), Some("Ravi"));
        assert_eq!(product.condition.as_deref(), Some("good"));
    }

    #[test]
    fn test_wrong_field_shapes_default_instead_of_failing() {
        let entity = RawEntity::decode(
            ListingKind::Room,
            json!({
                "id": 42,
                "images": "not-a-list",
                "negotiable": "yes",
                "rating": "five",
                "coordinates": { "latitude": 28.6, "longitude": 77.2 }
            }),
        )
        .unwrap();

        let common = entity.common();
        assert_eq!(common.id, "42");
        assert!(common.images.is_empty());
        assert_eq!(common.negotiable, None);
        assert_eq!(common.rating, None);
        assert_eq!(common.coordinates, Some(Coordinates { lat: 28.6, lng: 77.2 }));
        assert_eq!(entity.kind(), ListingKind::Room);
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        assert!(RawEntity::decode(ListingKind::Job, json!("job")).is_err());
        assert!(RawEntity::decode(ListingKind::Job, json!(null)).is_err());
    }

    #[test]
    fn test_decode_all_skips_bad_records() {
        let entities = RawEntity::decode_all(
            ListingKind::Service,
            vec![json!({ "title": "Tutoring" }), json!(7), json!({ "title": "Laundry" })],
        );
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_party_ref_plain_string() {
        let party: PartyRef = serde_json::from_value(json!("Asha")).unwrap();
        assert_eq!(party.plain(), Some("Asha"));
        assert_eq!(party.nested_name(), None);
    }
}
