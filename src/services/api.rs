// src/services/api.rs

//! HTTP client for the CampusCart REST API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, ListingKind, RawEntity, ReviewDraft};
use crate::services::{ListingQuery, ListingSource, SessionStore};
use crate::utils::{endpoint_url, parse_base_url};

/// Marketplace API client.
///
/// Requests carry the session's bearer token when one is present.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    client: Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl MarketplaceClient {
    /// Create a client with the given configuration.
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
            session,
        })
    }

    /// URL for a listing request: the filtered variant when filters are
    /// set, with the free-text query appended.
    pub fn listing_url(&self, kind: ListingKind, query: &ListingQuery) -> Result<Url> {
        let mut url = endpoint_url(&self.base_url, &query.endpoint(kind))?;
        let pairs = query.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Fetch and decode listings of one kind.
    pub async fn list(&self, kind: ListingKind, query: &ListingQuery) -> Result<Vec<RawEntity>> {
        let url = self.listing_url(kind, query)?;
        log::debug!("GET {}", url);

        let body = self.send(self.client.get(url)).await?;
        let records = extract_records(kind, body);
        Ok(RawEntity::decode_all(kind, records))
    }

    /// Submit a review after validating it locally.
    pub async fn submit_review(&self, draft: &ReviewDraft) -> Result<Value> {
        draft.validate()?;
        self.require_token()?;

        let url = endpoint_url(&self.base_url, "reviews")?;
        log::debug!("POST {}", url);
        self.send(self.client.post(url).json(draft)).await
    }

    /// Add a listing to the signed-in user's wishlist.
    pub async fn add_to_wishlist(&self, listing_id: &str) -> Result<()> {
        let url = self.wishlist_url(listing_id)?;
        self.require_token()?;
        log::debug!("POST {}", url);
        self.send(self.client.post(url)).await?;
        Ok(())
    }

    /// Remove a listing from the signed-in user's wishlist.
    pub async fn remove_from_wishlist(&self, listing_id: &str) -> Result<()> {
        let url = self.wishlist_url(listing_id)?;
        self.require_token()?;
        log::debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    /// URL of a wishlist entry.
    pub fn wishlist_url(&self, listing_id: &str) -> Result<Url> {
        let id = listing_id.trim();
        if id.is_empty() {
            return Err(AppError::validation("Listing id cannot be empty"));
        }
        let mut url = endpoint_url(&self.base_url, "wishlist/")?;
        url.path_segments_mut()
            .map_err(|_| AppError::config("API base URL cannot carry a path"))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn require_token(&self) -> Result<String> {
        self.session
            .bearer_token()
            .ok_or_else(|| AppError::session("Please log in first"))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode its JSON body, mapping error statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            log::warn!("Request failed with {}: {}", status, message);
            return Err(AppError::api(status.as_u16(), message));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ListingSource for MarketplaceClient {
    async fn fetch(&self, kind: ListingKind, query: &ListingQuery) -> Result<Vec<RawEntity>> {
        self.list(kind, query).await
    }
}

/// Pull the record array out of a list response.
///
/// Accepts `{ "<plural>": [...] }`, `{ "data": [...] }` or a bare array.
pub fn extract_records(kind: ListingKind, body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in [kind.plural_key(), "data"] {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return items;
                }
            }
            log::warn!(
                "Unexpected {} list response: no '{}' or 'data' array",
                kind,
                kind.plural_key()
            );
            Vec::new()
        }
        _ => {
            log::warn!("Unexpected {} list response shape", kind);
            Vec::new()
        }
    }
}

/// Best-effort message from an error response body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string();

    match response.json::<Value>().await {
        Ok(body) => message_from_body(&body, &fallback),
        Err(_) => fallback,
    }
}

/// `message`, then `error`, from a JSON error body.
fn message_from_body(body: &Value, fallback: &str) -> String {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;

    use super::*;
    use crate::models::FilterState;

    fn client() -> MarketplaceClient {
        let config = ApiConfig {
            base_url: "https://campuscart.example/api".to_string(),
            ..ApiConfig::default()
        };
        MarketplaceClient::new(&config, Arc::new(SessionStore::in_memory())).unwrap()
    }

    #[test]
    fn test_unfiltered_listing_url() {
        let url = client()
            .listing_url(ListingKind::Room, &ListingQuery::default())
            .unwrap();
        assert_eq!(url.as_str(), "https://campuscart.example/api/rooms");
    }

    #[test]
    fn test_filtered_listing_url() {
        let query = ListingQuery {
            filters: FilterState {
                location: Some("Delhi".to_string()),
                date_posted: Some(7),
                ..FilterState::default()
            },
            search: Some("study table".to_string()),
        };
        let url = client().listing_url(ListingKind::Product, &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://campuscart.example/api/products/filter?location=Delhi&datePosted=7&search=study+table"
        );
    }

    #[test]
    fn test_search_alone_keeps_plain_endpoint() {
        let query = ListingQuery {
            search: Some("tutor".to_string()),
            ..ListingQuery::default()
        };
        let url = client().listing_url(ListingKind::Service, &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://campuscart.example/api/services?search=tutor"
        );
    }

    #[test]
    fn test_wishlist_url_escapes_id() {
        let url = client().wishlist_url("abc/def").unwrap();
        assert_eq!(
            url.as_str(),
            "https://campuscart.example/api/wishlist/abc%2Fdef"
        );
        assert!(client().wishlist_url(" ").is_err());
    }

    #[test]
    fn test_extract_records_envelopes() {
        let plural = extract_records(ListingKind::Job, json!({ "jobs": [{ "title": "a" }] }));
        assert_eq!(plural.len(), 1);

        let data = extract_records(ListingKind::Room, json!({ "data": [{}, {}] }));
        assert_eq!(data.len(), 2);

        let bare = extract_records(ListingKind::Service, json!([{}]));
        assert_eq!(bare.len(), 1);

        let odd = extract_records(ListingKind::Product, json!({ "products": "none" }));
        assert!(odd.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_header_follows_session() {
        let client = client();
        let url = client.listing_url(ListingKind::Product, &ListingQuery::default()).unwrap();

        let anonymous = client.authorize(client.client.get(url.clone())).build().unwrap();
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());

        client.session.login("tok-1", None).await.unwrap();
        let signed_in = client.authorize(client.client.get(url)).build().unwrap();
        assert_eq!(
            signed_in.headers().get(AUTHORIZATION).unwrap(),
            "Bearer tok-1"
        );
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            message_from_body(&json!({ "message": "Product not found" }), "Not Found"),
            "Product not found"
        );
        assert_eq!(
            message_from_body(&json!({ "error": "Token expired" }), "Unauthorized"),
            "Token expired"
        );
        assert_eq!(
            message_from_body(&json!({ "message": "", "error": "Bad id" }), "Bad Request"),
            "Bad id"
        );
        assert_eq!(message_from_body(&json!({ "ok": false }), "Bad Gateway"), "Bad Gateway");
        assert_eq!(message_from_body(&json!("oops"), "Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_review_is_validated_before_sending() {
        let draft = ReviewDraft::new(ListingKind::Product, "p1", 5, "");
        let err = client().submit_review(&draft).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_wishlist_requires_session() {
        let err = client().add_to_wishlist("p1").await.unwrap_err();
        assert!(matches!(err, AppError::Session(_)));
    }
}
