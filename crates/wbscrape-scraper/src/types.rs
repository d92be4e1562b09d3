//! Catalog API response types.
//!
//! ## Observed shape
//!
//! Search pages look like `{"data": {"products": [ ... ]}}`. A missing
//! `data` object, a missing or `null` `products` list, or an empty list all
//! mean "no more pages".
//!
//! Every item field is optional. Types are not trusted either: `id` is
//! normally a number, `name`/`brand` are strings, and `isbn` is usually
//! absent. Text fields accept strings, numbers and booleans; anything else
//! is treated as missing instead of failing the whole page.
//!
//! Prices live under `sizes[0].price.total` in kopecks.
//!
//! The brand metadata document served from the static basket host is
//! `{"id": <number>, ...}`; only `id` is read.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One page of catalog search results.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub data: Option<CatalogData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub products: Option<Vec<CatalogItem>>,
}

impl CatalogPage {
    /// Items on this page, or `None` when the `data.products` path is absent.
    #[must_use]
    pub fn products(&self) -> Option<&[CatalogItem]> {
        self.data.as_ref()?.products.as_deref()
    }

    /// `true` when this page signals the end of pagination.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.products().is_none_or(<[CatalogItem]>::is_empty)
    }
}

/// A single catalog item. Accessors return `None` for missing fields.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    isbn: Option<String>,
    #[serde(default)]
    sizes: Option<Vec<CatalogSize>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogSize {
    #[serde(default)]
    price: Option<SizePrice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SizePrice {
    #[serde(default, deserialize_with = "lenient_number")]
    total: Option<f64>,
}

impl CatalogItem {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    #[must_use]
    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    /// `sizes[0].price.total` in kopecks. Only the first size is consulted.
    #[must_use]
    pub fn price_total(&self) -> Option<f64> {
        self.sizes.as_ref()?.first()?.price.as_ref()?.total
    }
}

/// Brand metadata document used to resolve a brand slug to its catalog id.
#[derive(Debug, Default, Deserialize)]
pub struct BrandMetadata {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
    .filter(|v| v.is_finite()))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }))
}
