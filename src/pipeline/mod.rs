//! Pipeline entry points for client operations.
//!
//! - `run_browse`: Fetch, map and order listings for one tab
//! - `run_overview`: Count listings across all tabs

pub mod browse;
pub mod overview;

pub use browse::{BrowseOptions, run_browse};
pub use overview::{TabSummary, run_overview};
