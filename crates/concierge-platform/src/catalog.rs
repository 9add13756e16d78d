//! HTTP adapter for the shop's product read model.
//!
//! Consumes the read-only assistant query: active products with
//! denormalized brand/gender/concentration/scent data and the
//! lowest-ordered variant's price/sale-price/volume.

use async_trait::async_trait;
use gloo_net::http::Request;

use concierge_core::ports::CatalogPort;
use concierge_types::{catalog::ProductSummary, config::ShopConfig, AssistantError, Result};

pub struct HttpCatalog {
    base_url: String,
}

impl HttpCatalog {
    pub fn new(shop: &ShopConfig) -> Self {
        Self {
            base_url: shop.base_url.clone(),
        }
    }
}

#[async_trait(?Send)]
impl CatalogPort for HttpCatalog {
    async fn fetch_products(&self, limit: usize) -> Result<Vec<ProductSummary>> {
        let url = format!("{}/api/assistant/products?limit={}", self.base_url, limit);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| AssistantError::Catalog(e.to_string()))?;

        if !response.ok() {
            return Err(AssistantError::Catalog(format!("HTTP {}", response.status())));
        }

        response
            .json::<Vec<ProductSummary>>()
            .await
            .map_err(|e| AssistantError::Catalog(e.to_string()))
    }
}
