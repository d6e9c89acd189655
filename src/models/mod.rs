// src/models/mod.rs

//! Domain models for the marketplace client.
//!
//! This module contains all data structures used throughout the library,
//! organized by their primary purpose.

mod config;
mod filter;
mod kind;
mod listing;
mod location;
mod raw;
mod review;
mod session;

// Re-export all public types
pub use config::{ApiConfig, Config, DisplayConfig, SessionConfig};
pub use filter::{DatePosted, FilterSelection, FilterState};
pub use kind::ListingKind;
pub use listing::Listing;
pub use location::{Location, LocationParts, UNKNOWN_LOCATION};
pub use raw::{
    Coordinates, ImageRef, ListingCommon, PartyRef, RawEntity, RawJob, RawProduct, RawRoom,
    RawService,
};
pub use review::ReviewDraft;
pub use session::{SessionState, UserProfile};
