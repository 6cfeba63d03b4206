use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AdvisorError, AdvisorResult};
use crate::product::ProductRecord;
use crate::taxonomy::{best_category, TaxonomyNode};

const SEARCH_PATH: &str = "api-proxy/service/affil/product/v2/search";
const TAXONOMY_PATH: &str = "api-proxy/service/affil/product/v2/taxonomy";
const TRENDS_PATH: &str = "api-proxy/service/affil/product/v2/trends";

/// Largest page the catalog endpoint will serve per request.
pub const MAX_PAGE_SIZE: u32 = 25;

/// Server-side ordering hint. Absence means relevance ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    Price,
    CustomerRating,
    Bestseller,
}

impl SortStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortStrategy::Price => "price",
            SortStrategy::CustomerRating => "customerRating",
            SortStrategy::Bestseller => "bestseller",
        }
    }
}

/// Direction for price sorting. Meaningful only with `SortStrategy::Price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// Parameters for one catalog search call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub category_id: Option<String>,
    pub sort: Option<SortStrategy>,
    pub order: Option<SortOrder>,
    pub start: Option<u32>,
    pub num_items: Option<u32>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_sort(mut self, sort: SortStrategy) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn starting_at(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_page_size(mut self, num_items: u32) -> Self {
        self.num_items = Some(num_items);
        self
    }

    /// Wire encoding: present fields only, never empty placeholders. The
    /// `order` parameter travels only alongside price sorting.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.query.is_empty() {
            parts.push(format!("query={}", urlencoding::encode(&self.query)));
        }
        if let Some(category_id) = &self.category_id {
            parts.push(format!("categoryId={}", urlencoding::encode(category_id)));
        }
        if let Some(sort) = self.sort {
            parts.push(format!("sort={}", sort.as_str()));
            if sort == SortStrategy::Price {
                if let Some(order) = self.order {
                    parts.push(format!("order={}", order.as_str()));
                }
            }
        }
        if let Some(start) = self.start {
            parts.push(format!("start={}", start));
        }
        if let Some(num_items) = self.num_items {
            parts.push(format!("numItems={}", num_items.min(MAX_PAGE_SIZE)));
        }

        parts.join("&")
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub records: Vec<ProductRecord>,
    pub total_count: u32,
}

/// Attaches credential headers to outbound catalog requests. The signature
/// material is opaque here; producing it is the credential service's job.
pub trait RequestSigner: Send + Sync {
    fn headers(&self) -> Vec<(&'static str, String)>;
}

pub const HEADER_KEY_VERSION: &str = "WM_SEC.KEY_VERSION";
pub const HEADER_CONSUMER_ID: &str = "WM_CONSUMER.ID";
pub const HEADER_TIMESTAMP: &str = "WM_CONSUMER.INTIMESTAMP";
pub const HEADER_SIGNATURE: &str = "WM_SEC.AUTH_SIGNATURE";

/// Signer backed by pre-provisioned credential strings from the config.
pub struct CredentialSigner {
    consumer_id: String,
    key_version: String,
    signature: String,
}

impl CredentialSigner {
    pub fn new(
        consumer_id: impl Into<String>,
        key_version: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            consumer_id: consumer_id.into(),
            key_version: key_version.into(),
            signature: signature.into(),
        }
    }
}

impl RequestSigner for CredentialSigner {
    fn headers(&self) -> Vec<(&'static str, String)> {
        let timestamp = Utc::now().timestamp_millis();
        vec![
            (HEADER_KEY_VERSION, self.key_version.clone()),
            (HEADER_CONSUMER_ID, self.consumer_id.clone()),
            (HEADER_TIMESTAMP, timestamp.to_string()),
            (HEADER_SIGNATURE, self.signature.clone()),
        ]
    }
}

/// Signer that attaches nothing. For tests and unauthenticated endpoints.
pub struct NoopSigner;

impl RequestSigner for NoopSigner {
    fn headers(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Anything that can serve product searches: the live catalog client or the
/// in-memory mock catalog.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> AdvisorResult<CatalogPage>;

    /// Best-matching category id for a query. Lookup failures are not
    /// errors, only a missing hint.
    async fn find_category(&self, query: &str) -> Option<String>;

    async fn trending(&self) -> AdvisorResult<CatalogPage>;
}

/// HTTP client for the affiliate product API. One round trip per call, no
/// caching, no retries; a transient failure propagates to the caller.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    signer: Arc<dyn RequestSigner>,
}

impl CatalogClient {
    pub fn new(config: &crate::config::CatalogConfig) -> Self {
        let signer = Arc::new(CredentialSigner::new(
            config.consumer_id.clone(),
            config.key_version.clone(),
            config.auth_signature.clone(),
        ));
        Self::with_signer(&config.api_url, signer)
    }

    pub fn with_signer(base_url: &str, signer: Arc<dyn RequestSigner>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("aisle-cli/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
        }
    }

    pub async fn taxonomy(&self) -> AdvisorResult<Vec<TaxonomyNode>> {
        let url = format!("{}/{}", self.base_url, TAXONOMY_PATH);
        let response = self.signed_get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisorError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let payload: TaxonomyResponse = response.json().await?;
        Ok(payload.categories)
    }

    fn signed_get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(url);
        for (name, value) in self.signer.headers() {
            builder = builder.header(name, value);
        }
        builder
    }

    async fn fetch_page(&self, url: &str) -> AdvisorResult<CatalogPage> {
        let response = self.signed_get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisorError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let payload: SearchResponse = response.json().await?;
        Ok(payload.into_page())
    }
}

#[async_trait]
impl ProductSource for CatalogClient {
    async fn search(&self, request: &SearchRequest) -> AdvisorResult<CatalogPage> {
        if request.query.trim().is_empty() {
            return Err(AdvisorError::Validation(
                "search query must not be empty".to_string(),
            ));
        }

        let url = format!(
            "{}/{}?{}",
            self.base_url,
            SEARCH_PATH,
            request.to_query_string()
        );
        self.fetch_page(&url).await
    }

    async fn find_category(&self, query: &str) -> Option<String> {
        let nodes = self.taxonomy().await.ok()?;
        best_category(&nodes, query).map(|category| category.id)
    }

    async fn trending(&self) -> AdvisorResult<CatalogPage> {
        let url = format!("{}/{}", self.base_url, TRENDS_PATH);
        self.fetch_page(&url).await
    }
}

#[derive(Debug, Deserialize)]
struct TaxonomyResponse {
    #[serde(default)]
    categories: Vec<TaxonomyNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RawCatalogItem>,
    total_results: Option<u32>,
}

impl SearchResponse {
    fn into_page(self) -> CatalogPage {
        let records: Vec<ProductRecord> = self
            .items
            .into_iter()
            .map(RawCatalogItem::into_record)
            .collect();
        let total_count = self.total_results.unwrap_or(records.len() as u32);
        CatalogPage {
            records,
            total_count,
        }
    }
}

/// Catalog item as it arrives on the wire. Almost everything is optional;
/// `into_record` applies the documented defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalogItem {
    #[serde(default)]
    item_id: u64,
    #[serde(default)]
    name: String,
    brand_name: Option<String>,
    sale_price: Option<f64>,
    msrp: Option<f64>,
    short_description: Option<String>,
    long_description: Option<String>,
    thumbnail_image: Option<String>,
    medium_image: Option<String>,
    large_image: Option<String>,
    customer_rating: Option<String>,
    num_reviews: Option<u32>,
    product_tracking_url: Option<String>,
    stock: Option<String>,
    category_path: Option<String>,
}

impl RawCatalogItem {
    fn into_record(self) -> ProductRecord {
        ProductRecord {
            id: self.item_id.to_string(),
            name: self.name,
            brand: self.brand_name.unwrap_or_else(|| "Unknown".to_string()),
            sale_price: self.sale_price.unwrap_or(0.0),
            original_price: self.msrp,
            rating: self
                .customer_rating
                .as_deref()
                .and_then(|rating| rating.parse().ok())
                .unwrap_or(0.0),
            review_count: self.num_reviews.unwrap_or(0),
            short_description: self.short_description.unwrap_or_default(),
            long_description: self.long_description.unwrap_or_default(),
            features: Vec::new(),
            specifications: Vec::new(),
            category_path: self.category_path.unwrap_or_default(),
            image_url: self
                .large_image
                .or(self.medium_image)
                .or(self.thumbnail_image),
            product_url: self.product_tracking_url.unwrap_or_default(),
            in_stock: self.stock.as_deref() == Some("Available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_query_string_includes_only_present_fields() {
        let request = SearchRequest::new("gaming laptop");
        assert_eq!(request.to_query_string(), "query=gaming%20laptop");

        let request = SearchRequest::new("gaming laptop")
            .with_category("3944_1089430")
            .with_sort(SortStrategy::Price)
            .with_order(SortOrder::Ascending)
            .starting_at(10)
            .with_page_size(25);
        assert_eq!(
            request.to_query_string(),
            "query=gaming%20laptop&categoryId=3944_1089430&sort=price&order=ascending&start=10&numItems=25"
        );
    }

    #[test]
    fn test_order_is_dropped_without_price_sort() {
        let request = SearchRequest::new("laptop")
            .with_sort(SortStrategy::Bestseller)
            .with_order(SortOrder::Ascending);
        assert_eq!(request.to_query_string(), "query=laptop&sort=bestseller");

        let request = SearchRequest::new("laptop").with_order(SortOrder::Descending);
        assert_eq!(request.to_query_string(), "query=laptop");
    }

    #[test]
    fn test_page_size_is_clamped_to_the_wire_cap() {
        let request = SearchRequest::new("laptop").with_page_size(100);
        assert_eq!(request.to_query_string(), "query=laptop&numItems=25");
    }

    #[test]
    fn test_raw_item_defaults() {
        let item: RawCatalogItem = serde_json::from_value(json!({
            "itemId": 42608125,
            "name": "Moto G Play",
            "salePrice": 129.99,
            "customerRating": "4.2",
            "stock": "Available",
            "mediumImage": "https://img.example.com/m.jpg"
        }))
        .unwrap();
        let record = item.into_record();

        assert_eq!(record.id, "42608125");
        assert_eq!(record.brand, "Unknown");
        assert_eq!(record.rating, 4.2);
        assert_eq!(record.review_count, 0);
        assert_eq!(record.image_url.as_deref(), Some("https://img.example.com/m.jpg"));
        assert!(record.in_stock);
    }

    #[test]
    fn test_unparseable_rating_defaults_to_zero() {
        let item: RawCatalogItem = serde_json::from_value(json!({
            "itemId": 1,
            "name": "Widget",
            "customerRating": "No rating",
            "stock": "Out of stock"
        }))
        .unwrap();
        let record = item.into_record();

        assert_eq!(record.rating, 0.0);
        assert!(!record.in_stock);
    }

    #[test]
    fn test_large_image_preferred_over_smaller_ones() {
        let item: RawCatalogItem = serde_json::from_value(json!({
            "itemId": 1,
            "name": "Widget",
            "thumbnailImage": "t.jpg",
            "mediumImage": "m.jpg",
            "largeImage": "l.jpg"
        }))
        .unwrap();
        assert_eq!(item.into_record().image_url.as_deref(), Some("l.jpg"));
    }

    #[test]
    fn test_credential_signer_produces_all_headers() {
        let signer = CredentialSigner::new("consumer-1", "1", "c2lnbmF0dXJl");
        let headers = signer.headers();
        let names: Vec<&str> = headers.iter().map(|(name, _)| *name).collect();

        assert_eq!(
            names,
            vec![
                HEADER_KEY_VERSION,
                HEADER_CONSUMER_ID,
                HEADER_TIMESTAMP,
                HEADER_SIGNATURE
            ]
        );
        let timestamp: i64 = headers[2].1.parse().unwrap();
        assert!(timestamp > 0);
    }

    #[test]
    fn test_missing_items_make_an_empty_page() {
        let payload: SearchResponse = serde_json::from_value(json!({})).unwrap();
        let page = payload.into_page();
        assert!(page.records.is_empty());
        assert_eq!(page.total_count, 0);
    }
}
