// src/models/kind.rs

//! Listing kinds (the top-level browse tabs).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Entity kind behind a browse tab.
///
/// Each kind fixes the REST resource it is served from, the key its list
/// envelope uses, and the tag attached to mapped listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ListingKind {
    #[default]
    Product,
    Room,
    Service,
    Job,
}

impl ListingKind {
    /// All kinds in tab order.
    pub const ALL: [ListingKind; 4] = [Self::Product, Self::Room, Self::Service, Self::Job];

    /// REST resource path, relative to the API base URL.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Room => "rooms",
            Self::Service => "services",
            Self::Job => "jobs",
        }
    }

    /// Key holding the records in a list response envelope.
    pub fn plural_key(&self) -> &'static str {
        self.resource()
    }

    /// Tag carried by mapped listings.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Room => "Room",
            Self::Service => "Service",
            Self::Job => "Job",
        }
    }

    /// Static message shown when fetching this tab fails.
    pub fn error_message(&self) -> &'static str {
        match self {
            Self::Product => "Failed to load products. Please try again later.",
            Self::Room => "Failed to load rooms. Please try again later.",
            Self::Service => "Failed to load services. Please try again later.",
            Self::Job => "Failed to load jobs. Please try again later.",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ListingKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "product" | "products" => Ok(Self::Product),
            "room" | "rooms" => Ok(Self::Room),
            "service" | "services" => Ok(Self::Service),
            "job" | "jobs" => Ok(Self::Job),
            other => Err(AppError::validation(format!("Unknown listing kind '{other}'"))),
        }
    }
}
