//! Multi-page product fetch loop for `CatalogClient`.

use wbscrape_core::Product;

use crate::extract::extract_products;
use crate::pagination::{page_url, FIRST_PAGE};

use super::CatalogClient;

impl CatalogClient {
    /// Fetches every page of a catalog query and returns all extracted records.
    ///
    /// Pages are requested strictly one after another, starting at page 1.
    /// The loop ends at the first page that fails to fetch, has no
    /// `data.products` path, or has an empty product list. A failed page is
    /// logged and ends the sequence; records from earlier pages are kept.
    ///
    /// No page limit and no deduplication are applied.
    pub async fn fetch_all_pages(&self, base_url: &str) -> Vec<Product> {
        let mut all_products: Vec<Product> = Vec::new();
        let mut page = FIRST_PAGE;

        loop {
            let url = page_url(base_url, page);
            let catalog_page = match self.fetch_page(&url).await {
                Ok(catalog_page) => catalog_page,
                Err(e) => {
                    tracing::warn!(page, error = %e, "no data for catalog page, stopping");
                    break;
                }
            };

            if catalog_page.is_last() {
                tracing::debug!(page, "catalog page is empty, stopping");
                break;
            }

            let products = extract_products(Some(&catalog_page));
            tracing::info!(page, count = products.len(), "processed catalog page");
            all_products.extend(products);
            page += 1;
        }

        tracing::info!(
            pages = page - FIRST_PAGE,
            total = all_products.len(),
            "catalog pagination finished"
        );
        all_products
    }
}
