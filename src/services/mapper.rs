// src/services/mapper.rs

//! Maps decoded backend records to listing cards.
//!
//! Mapping never fails: every field has a fallback chain ending in a
//! placeholder, so a sparse record still yields a complete card.

use serde_json::Value;

use crate::models::{
    DisplayConfig, ImageRef, Listing, ListingCommon, ListingKind, Location, RawEntity, RawJob,
    RawProduct, RawRoom, RawService,
};
use crate::utils::format::{PriceFormat, format_date, parse_timestamp};

/// Shown when a product, room or service has no price.
pub const PRICE_NOT_PROVIDED: &str = "Not provided";

/// Shown when a job has no salary.
pub const SALARY_NOT_PROVIDED: &str = "Salary not provided";

/// Seller label when the record names nobody.
pub const DEFAULT_SELLER: &str = "User";

const UNTITLED: &str = "Untitled";

/// Stateless mapper from [`RawEntity`] to [`Listing`].
#[derive(Debug, Clone)]
pub struct ListingMapper {
    display: DisplayConfig,
}

impl ListingMapper {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    /// Map any record to a card.
    pub fn map(&self, entity: &RawEntity) -> Listing {
        match entity {
            RawEntity::Product(p) => self.map_product(p),
            RawEntity::Room(r) => self.map_room(r),
            RawEntity::Service(s) => self.map_service(s),
            RawEntity::Job(j) => self.map_job(j),
        }
    }

    /// Map a batch of records, keeping their order.
    pub fn map_all(&self, entities: &[RawEntity]) -> Vec<Listing> {
        entities.iter().map(|e| self.map(e)).collect()
    }

    fn map_product(&self, product: &RawProduct) -> Listing {
        let entity_date = product.common.created_at.as_deref();
        self.card(
            ListingKind::Product,
            &product.common,
            self.price(product.price.as_ref(), PRICE_NOT_PROVIDED),
            self.seller_label(&product.common),
            entity_date,
        )
    }

    fn map_room(&self, room: &RawRoom) -> Listing {
        let rent = present(room.rent.as_ref()).or(room.price.as_ref());
        let entity_date = room
            .available_from
            .as_deref()
            .or(room.common.created_at.as_deref());
        self.card(
            ListingKind::Room,
            &room.common,
            self.price(rent, PRICE_NOT_PROVIDED),
            self.seller_label(&room.common),
            entity_date,
        )
    }

    fn map_service(&self, service: &RawService) -> Listing {
        let entity_date = service.common.created_at.as_deref();
        self.card(
            ListingKind::Service,
            &service.common,
            self.price(service.price.as_ref(), PRICE_NOT_PROVIDED),
            self.seller_label(&service.common),
            entity_date,
        )
    }

    fn map_job(&self, job: &RawJob) -> Listing {
        let seller = job
            .company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.seller_label(&job.common));
        let entity_date = job
            .posted_time
            .as_deref()
            .or(job.common.created_at.as_deref());
        self.card(
            ListingKind::Job,
            &job.common,
            self.price(job.salary.as_ref(), SALARY_NOT_PROVIDED),
            seller,
            entity_date,
        )
    }

    fn card(
        &self,
        kind: ListingKind,
        common: &ListingCommon,
        price_display: String,
        seller_label: String,
        entity_date: Option<&str>,
    ) -> Listing {
        let title = common
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();

        Listing {
            id: common.id.clone(),
            kind,
            title,
            price_display,
            image: self.image(common),
            seller_label,
            location_display: Location::normalize(common.location.as_ref()),
            date_display: format_date(
                entity_date.and_then(parse_timestamp),
                &self.display.date_format,
            ),
            tag: kind.tag().to_string(),
            negotiable: common.negotiable,
            rating: common.rating,
            coordinates: common.coordinates,
            distance_km: None,
            created_at: common.created_at.as_deref().and_then(parse_timestamp),
        }
    }

    fn price(&self, value: Option<&Value>, missing: &str) -> String {
        PriceFormat {
            symbol: &self.display.currency_symbol,
            indian_grouping: self.display.indian_grouping,
        }
        .format(value, missing)
    }

    /// First image URL, then the flat `image` field, then the placeholder.
    fn image(&self, common: &ListingCommon) -> String {
        common
            .images
            .iter()
            .find_map(ImageRef::url)
            .or_else(|| {
                common
                    .image
                    .as_deref()
                    .map(str::trim)
                    .filter(|i| !i.is_empty())
            })
            .unwrap_or(self.display.placeholder_image.as_str())
            .to_string()
    }

    /// `seller.name`, then `provider.name`, then a bare `seller` string.
    fn seller_label(&self, common: &ListingCommon) -> String {
        let seller = common.seller.as_ref();
        let provider = common.provider.as_ref();
        seller
            .and_then(|s| s.nested_name())
            .or_else(|| provider.and_then(|p| p.nested_name()))
            .or_else(|| seller.and_then(|s| s.plain()))
            .unwrap_or(DEFAULT_SELLER)
            .to_string()
    }
}

/// A price-like field that carries something: not null, not blank text.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}
