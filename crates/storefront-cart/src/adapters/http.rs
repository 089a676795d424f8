//! # Storefront API Client
//!
//! Stock and catalog lookups over HTTP.
//!
//! ## Endpoints
//! ```text
//! GET {base}/stock/{id}      → { "id": 1, "amount": 3 }
//!                              404 → no stock record (Ok(None))
//!
//! GET {base}/products/{id}   → { "id": 1, "title": "…", "price": 179.9, "image": "…" }
//!                              404 → LookupError::NotFound
//! ```
//!
//! Every call is a single attempt bounded by the configured timeout.
//! Prices arrive as JSON decimals and are converted to cents here, at the
//! boundary, without passing through `f64`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use storefront_core::validation::validate_stock_amount;
use storefront_core::{Money, Product, ProductId, Stock};
use tracing::debug;
use url::Url;

use crate::config::CartConfig;
use crate::error::{LookupError, LookupResult};
use crate::ports::{CatalogQuery, StockQuery};

/// Catalog record as served by the API.
#[derive(Debug, Deserialize)]
struct ProductDto {
    id: ProductId,
    title: String,
    price: serde_json::Number,
    image: String,
}

impl TryFrom<ProductDto> for Product {
    type Error = LookupError;

    fn try_from(dto: ProductDto) -> Result<Self, Self::Error> {
        let price = Money::parse_decimal(&dto.price.to_string())
            .ok_or_else(|| LookupError::Decode(format!("invalid price: {}", dto.price)))?;
        Ok(Product::new(dto.id, dto.title, price, dto.image))
    }
}

/// HTTP client for the storefront API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> LookupResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| LookupError::Transport(format!("invalid base URL {}: {}", base_url, e)))?;

        // Url::join replaces the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(ApiClient { base, http })
    }

    /// Creates a client from the cart configuration.
    pub fn from_config(config: &CartConfig) -> LookupResult<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn endpoint(&self, resource: &str, id: ProductId) -> LookupResult<Url> {
        self.base
            .join(&format!("{}/{}", resource, id))
            .map_err(|e| LookupError::Transport(e.to_string()))
    }
}

#[async_trait]
impl StockQuery for ApiClient {
    async fn stock(&self, id: ProductId) -> LookupResult<Option<Stock>> {
        let url = self.endpoint("stock", id)?;
        debug!(%url, "Fetching stock");

        let response = self.http.get(url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let stock: Stock = response.json().await?;
                if stock.id != id {
                    return Err(LookupError::Decode(format!(
                        "stock record for {} returned for product {}",
                        stock.id, id
                    )));
                }
                validate_stock_amount(stock.amount)
                    .map_err(|e| LookupError::Decode(e.to_string()))?;
                Ok(Some(stock))
            }
            status => Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait]
impl CatalogQuery for ApiClient {
    async fn product(&self, id: ProductId) -> LookupResult<Product> {
        let url = self.endpoint("products", id)?;
        debug!(%url, "Fetching product");

        let response = self.http.get(url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(LookupError::NotFound {
                resource: "Product",
                id,
            }),
            status if status.is_success() => {
                let dto: ProductDto = response.json().await?;
                Product::try_from(dto)
            }
            status => Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}
