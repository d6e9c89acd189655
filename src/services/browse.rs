// src/services/browse.rs

//! Browse orchestration: active tab, filters and free-text search.
//!
//! Every change of tab, filters or search text enters `Loading` and issues
//! exactly one request. Requests are ticketed; only the completion carrying
//! the latest ticket may update the status, so a slow response to an older
//! request never overwrites fresher results.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::models::{Coordinates, FilterSelection, Listing, ListingKind, RawEntity};
use crate::services::{ListingMapper, ListingQuery, ListingSource};
use crate::utils::geo::distance_km;

/// Where a browse view stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BrowseStatus {
    #[default]
    Idle,
    Loading,
    Success(Vec<Listing>),
    /// Static, user-facing message for the tab
    Error(String),
}

/// A fetch issued by [`BrowseController::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub ticket: u64,
    pub kind: ListingKind,
    pub query: ListingQuery,
}

#[derive(Debug, Default)]
struct BrowseState {
    kind: ListingKind,
    selection: FilterSelection,
    search: String,
    origin: Option<Coordinates>,
    status: BrowseStatus,
    latest_ticket: u64,
}

/// Browse orchestrator for one view.
pub struct BrowseController {
    source: Arc<dyn ListingSource>,
    mapper: ListingMapper,
    state: Mutex<BrowseState>,
}

impl BrowseController {
    pub fn new(source: Arc<dyn ListingSource>, mapper: ListingMapper) -> Self {
        Self {
            source,
            mapper,
            state: Mutex::new(BrowseState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrowseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn kind(&self) -> ListingKind {
        self.lock().kind
    }

    pub fn status(&self) -> BrowseStatus {
        self.lock().status.clone()
    }

    pub fn selection(&self) -> FilterSelection {
        self.lock().selection.clone()
    }

    pub fn search(&self) -> String {
        self.lock().search.clone()
    }

    /// Switch tabs. Filters and search text are cleared, since filter keys
    /// of one kind do not apply to another.
    ///
    /// Returns `None` when `kind` is already the active tab.
    pub fn set_tab(&self, kind: ListingKind) -> Option<BrowseRequest> {
        let mut state = self.lock();
        if state.kind == kind {
            return None;
        }
        log::debug!("Switching tab {} -> {}", state.kind, kind);
        state.kind = kind;
        state.selection = FilterSelection::default();
        state.search.clear();
        Some(Self::issue(&mut state))
    }

    pub fn set_filters(&self, selection: FilterSelection) -> BrowseRequest {
        let mut state = self.lock();
        state.selection = selection;
        Self::issue(&mut state)
    }

    pub fn clear_filters(&self) -> BrowseRequest {
        let mut state = self.lock();
        state.selection = FilterSelection::default();
        Self::issue(&mut state)
    }

    pub fn set_search(&self, text: impl Into<String>) -> BrowseRequest {
        let mut state = self.lock();
        state.search = text.into();
        Self::issue(&mut state)
    }

    /// Position used to annotate listings with a distance. Applies from the
    /// next completed request.
    pub fn set_origin(&self, origin: Option<Coordinates>) {
        self.lock().origin = origin;
    }

    /// Issue a request for the current tab, filters and search text.
    pub fn begin(&self) -> BrowseRequest {
        Self::issue(&mut self.lock())
    }

    /// Supersede every outstanding request and enter `Loading`.
    fn issue(state: &mut BrowseState) -> BrowseRequest {
        state.latest_ticket += 1;
        state.status = BrowseStatus::Loading;

        let search = state.search.trim();
        BrowseRequest {
            ticket: state.latest_ticket,
            kind: state.kind,
            query: ListingQuery {
                filters: state.selection.encode(),
                search: (!search.is_empty()).then(|| search.to_string()),
            },
        }
    }

    /// Apply the outcome of a request.
    ///
    /// Returns `false` when the request was superseded by a later one (or
    /// by any change of tab, filters or search) and its outcome was
    /// discarded.
    pub fn complete(&self, request: &BrowseRequest, outcome: Result<Vec<RawEntity>>) -> bool {
        let mut state = self.lock();
        if request.ticket != state.latest_ticket || request.kind != state.kind {
            log::debug!(
                "Discarding stale {} response (ticket {}, latest {})",
                request.kind,
                request.ticket,
                state.latest_ticket
            );
            return false;
        }

        state.status = match outcome {
            Ok(entities) => {
                let mut listings = self.mapper.map_all(&entities);
                if let Some(origin) = state.origin {
                    for listing in &mut listings {
                        listing.distance_km = listing.coordinates.map(|c| distance_km(origin, c));
                    }
                }
                listings.sort_by_key(|l| Reverse(l.created_millis()));
                log::info!("Loaded {} {} listings", listings.len(), request.kind);
                BrowseStatus::Success(listings)
            }
            Err(e) => {
                log::error!("Failed to fetch {} listings: {}", request.kind, e);
                BrowseStatus::Error(request.kind.error_message().to_string())
            }
        };
        true
    }

    /// Fetch a previously issued request and apply its outcome.
    pub async fn run(&self, request: BrowseRequest) -> bool {
        let outcome = self.source.fetch(request.kind, &request.query).await;
        self.complete(&request, outcome)
    }

    /// Fetch for the current state and return the resulting status.
    pub async fn refresh(&self) -> BrowseStatus {
        let request = self.begin();
        self.run(request).await;
        self.status()
    }
}
