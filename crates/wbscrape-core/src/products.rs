use serde::{Deserialize, Serialize};

/// Substituted for any text field the catalog omits.
pub const PLACEHOLDER: &str = "N/A";

/// Header row of every exported spreadsheet, in column order.
pub const PRODUCT_HEADER: [&str; 5] = ["Name", "ArticleId", "Brand", "ISBN", "Price"];

/// A flat product record extracted from one catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    /// Catalog article number, rendered as text.
    pub external_id: String,
    pub brand: String,
    pub isbn: String,
    /// Corrected price in roubles; `0.0` when the catalog had no price.
    pub price: f64,
}

impl Product {
    /// Text cells of the export row, in [`PRODUCT_HEADER`] order (price excluded).
    #[must_use]
    pub fn text_cells(&self) -> [&str; 4] {
        [&self.name, &self.external_id, &self.brand, &self.isbn]
    }
}

/// Which kind of storefront a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorefrontKind {
    Seller,
    Brand,
}

impl std::fmt::Display for StorefrontKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorefrontKind::Seller => write!(f, "seller"),
            StorefrontKind::Brand => write!(f, "brand"),
        }
    }
}

/// Everything needed to run one scrape, derived from a single storefront link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub kind: StorefrontKind,
    /// Catalog query URL without the `page` parameter.
    pub base_query_url: String,
    /// Bare filename, e.g. `seller_8969.xlsx`.
    pub output_filename: String,
}
