// src/pipeline/browse.rs

//! One-shot browse of a single tab.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, Coordinates, FilterSelection, Listing, ListingKind};
use crate::services::{BrowseController, BrowseStatus, ListingMapper, ListingSource};

/// What to browse.
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    pub kind: ListingKind,
    pub selection: FilterSelection,
    pub search: String,
    pub origin: Option<Coordinates>,
    /// Keep at most this many listings
    pub limit: Option<usize>,
}

/// Fetch listings for one tab, newest first.
pub async fn run_browse(
    config: &Config,
    source: Arc<dyn ListingSource>,
    options: BrowseOptions,
) -> Result<Vec<Listing>> {
    let filters = options.selection.encode();
    log::info!(
        "Browsing {} ({})",
        options.kind,
        if filters.is_empty() {
            "no filters".to_string()
        } else {
            filters.to_query_string()
        }
    );

    let controller = BrowseController::new(source, ListingMapper::new(config.display.clone()));
    controller.set_origin(options.origin);
    controller.set_tab(options.kind);
    controller.set_filters(options.selection);
    // Each change supersedes the previous request, only the last one runs
    let request = controller.set_search(options.search);
    controller.run(request).await;

    match controller.status() {
        BrowseStatus::Success(mut listings) => {
            if let Some(limit) = options.limit {
                listings.truncate(limit);
            }
            Ok(listings)
        }
        BrowseStatus::Error(message) => Err(AppError::Unavailable(message)),
        other => Err(AppError::Unavailable(format!(
            "Browse ended in unexpected state {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::models::RawEntity;
    use crate::services::ListingQuery;

    struct StaticSource;

    #[async_trait]
    impl ListingSource for StaticSource {
        async fn fetch(&self, kind: ListingKind, query: &ListingQuery) -> Result<Vec<RawEntity>> {
            if query.filters.location.as_deref() == Some("Mars") {
                return Err(AppError::api(404, "no such campus"));
            }
            Ok(RawEntity::decode_all(
                kind,
                vec![
                    json!({ "title": "a", "createdAt": "2026-01-01" }),
                    json!({ "title": "b", "createdAt": "2026-02-01" }),
                    json!({ "title": "c", "createdAt": "2026-03-01" }),
                ],
            ))
        }
    }

    #[tokio::test]
    async fn test_run_browse_orders_and_limits() {
        let options = BrowseOptions {
            kind: ListingKind::Service,
            limit: Some(2),
            ..BrowseOptions::default()
        };
        let listings = run_browse(&Config::default(), Arc::new(StaticSource), options)
            .await
            .unwrap();

        let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["c", "b"]);
        assert!(listings.iter().all(|l| l.tag == "Service"));
    }

    #[tokio::test]
    async fn test_run_browse_surfaces_tab_message() {
        let options = BrowseOptions {
            kind: ListingKind::Room,
            selection: FilterSelection {
                location: "Mars".to_string(),
                ..FilterSelection::default()
            },
            ..BrowseOptions::default()
        };
        let err = run_browse(&Config::default(), Arc::new(StaticSource), options)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), ListingKind::Room.error_message());
    }
}
