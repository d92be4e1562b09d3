pub mod client;
pub mod error;
pub mod export;
pub mod extract;
pub mod pagination;
pub mod resolve;
mod retry;
pub mod types;

pub use client::CatalogClient;
pub use error::{ExportError, ResolveError, ScraperError};
pub use export::export_products;
pub use extract::{corrected_price, extract_product, extract_products, PRICE_CORRECTION};
pub use resolve::{CatalogEndpoints, RequestResolver};
pub use types::{BrandMetadata, CatalogItem, CatalogPage};
