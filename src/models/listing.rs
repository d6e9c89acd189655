//! Listing view model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, ListingKind};

/// A listing card, normalized across every entity kind.
///
/// Derived from a [`crate::models::RawEntity`] on every fetch and never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,

    pub kind: ListingKind,

    pub title: String,

    /// Formatted price, rent or salary
    pub price_display: String,

    /// Image URL, placeholder when the record has none
    pub image: String,

    pub seller_label: String,

    pub location_display: String,

    pub date_display: String,

    /// Fixed per kind, drives rendering branches
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negotiable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    /// Distance from the browsing user, when both positions are known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    /// Parsed creation time, used for ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Sort key: creation time in milliseconds, missing timestamps count as
    /// the epoch.
    pub fn created_millis(&self) -> i64 {
        self.created_at.map_or(0, |t| t.timestamp_millis())
    }

    /// Format listing for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{tag}`, `{title}`, `{price}`, `{seller}`
    /// - `{location}`, `{date}`, `{image}`, `{distance}`
    pub fn format(&self, template: &str) -> String {
        let distance = self
            .distance_km
            .map(|d| format!("{d:.1} km"))
            .unwrap_or_default();

        template
            .replace("{id}", &self.id)
            .replace("{tag}", &self.tag)
            .replace("{title}", &self.title)
            .replace("{price}", &self.price_display)
            .replace("{seller}", &self.seller_label)
            .replace("{location}", &self.location_display)
            .replace("{date}", &self.date_display)
            .replace("{image}", &self.image)
            .replace("{distance}", &distance)
    }
}
