//! Service layer for the marketplace client.
//!
//! This module contains the business logic for:
//! - Record-to-card mapping (`ListingMapper`)
//! - Tab/filter/search orchestration (`BrowseController`)
//! - Backend access (`MarketplaceClient`)
//! - Session state (`SessionStore`)

mod api;
mod browse;
mod mapper;
mod session;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FilterState, ListingKind, RawEntity};

pub use api::{MarketplaceClient, extract_records};
pub use browse::{BrowseController, BrowseRequest, BrowseStatus};
pub use mapper::{DEFAULT_SELLER, ListingMapper, PRICE_NOT_PROVIDED, SALARY_NOT_PROVIDED};
pub use session::SessionStore;

/// One outgoing listing request: encoded filters plus free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub filters: FilterState,
    pub search: Option<String>,
}

impl ListingQuery {
    /// Resource path, decided by the filters alone.
    pub fn endpoint(&self, kind: ListingKind) -> String {
        self.filters.endpoint(kind)
    }

    /// Filter parameters followed by `search` when set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.filters.query_pairs();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// Anything that can answer a listing request.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch decoded records of one kind.
    async fn fetch(&self, kind: ListingKind, query: &ListingQuery) -> Result<Vec<RawEntity>>;
}
