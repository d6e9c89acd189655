// src/pipeline/overview.rs

//! Listing counts across every tab.

use std::sync::Arc;

use futures::future::join_all;

use crate::models::{Config, ListingKind};
use crate::services::{BrowseController, BrowseStatus, ListingMapper, ListingSource};

/// Outcome for one tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabSummary {
    pub kind: ListingKind,
    /// Listing count, or the tab's error message
    pub result: Result<usize, String>,
}

/// Fetch every tab concurrently, one controller per tab.
pub async fn run_overview(config: &Config, source: Arc<dyn ListingSource>) -> Vec<TabSummary> {
    let tabs = ListingKind::ALL.map(|kind| {
        let controller =
            BrowseController::new(Arc::clone(&source), ListingMapper::new(config.display.clone()));
        let request = controller
            .set_tab(kind)
            .unwrap_or_else(|| controller.begin());
        async move {
            controller.run(request).await;
            let result = match controller.status() {
                BrowseStatus::Success(listings) => Ok(listings.len()),
                BrowseStatus::Error(message) => Err(message),
                other => Err(format!("unexpected state {other:?}")),
            };
            TabSummary { kind, result }
        }
    });

    let summaries = join_all(tabs).await;
    let failures = summaries.iter().filter(|s| s.result.is_err()).count();
    if failures > 0 {
        log::warn!("{} of {} tabs failed to load", failures, summaries.len());
    }
    summaries
}
