//! Review submission payload.

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::ListingKind;

/// A review about to be submitted for a listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub listing_id: String,

    pub kind: ListingKind,

    /// Stars, 1 to 5
    pub rating: u8,

    pub comment: String,
}

impl ReviewDraft {
    pub fn new(
        kind: ListingKind,
        listing_id: impl Into<String>,
        rating: u8,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            listing_id: listing_id.into(),
            kind,
            rating,
            comment: comment.into(),
        }
    }

    /// Check the draft before it is sent.
    pub fn validate(&self) -> Result<()> {
        if self.listing_id.trim().is_empty() {
            return Err(AppError::validation("Review needs a listing id"));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::validation("Rating must be between 1 and 5"));
        }
        if self.comment.trim().is_empty() {
            return Err(AppError::validation("Review text cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_draft() {
        let draft = ReviewDraft::new(ListingKind::Service, "s1", 4, "Quick and friendly");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_comment() {
        let draft = ReviewDraft::new(ListingKind::Product, "p1", 5, "   ");
        assert!(matches!(draft.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        assert!(ReviewDraft::new(ListingKind::Product, "p1", 0, "ok").validate().is_err());
        assert!(ReviewDraft::new(ListingKind::Product, "p1", 6, "ok").validate().is_err());
    }

    #[test]
    fn test_rejects_missing_listing_id() {
        assert!(ReviewDraft::new(ListingKind::Room, "", 3, "ok").validate().is_err());
    }
}
