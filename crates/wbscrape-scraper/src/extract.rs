//! Conversion from catalog items to flat [`wbscrape_core::Product`] records.

use wbscrape_core::{Product, PLACEHOLDER};

use crate::types::{CatalogItem, CatalogPage};

/// Markup/currency correction the catalog bakes into `price.total`.
///
/// Applied with floor division after converting kopecks to roubles. The
/// constant and the operation order are kept exactly as observed so exported
/// prices match earlier exports.
pub const PRICE_CORRECTION: f64 = 1.030_994_550_4;

/// Extracts one record per item on `page`, in page order.
///
/// Returns an empty vector when `page` is `None` or has no `data.products`.
#[must_use]
pub fn extract_products(page: Option<&CatalogPage>) -> Vec<Product> {
    page.and_then(CatalogPage::products)
        .map(|items| items.iter().map(extract_product).collect())
        .unwrap_or_default()
}

/// Builds a record from a single item, filling absent text fields with
/// [`PLACEHOLDER`] and an absent price with `0`.
#[must_use]
pub fn extract_product(item: &CatalogItem) -> Product {
    let text = |field: Option<&str>| field.unwrap_or(PLACEHOLDER).to_owned();

    Product {
        name: text(item.name()),
        external_id: text(item.id()),
        brand: text(item.brand()),
        isbn: text(item.isbn()),
        price: corrected_price(item.price_total().unwrap_or(0.0)),
    }
}

/// `(total / 100) // PRICE_CORRECTION`, with floor-division semantics for
/// floats (quotient rounded toward negative infinity, computed from the
/// remainder rather than from the rounded quotient).
#[must_use]
pub fn corrected_price(total_kopecks: f64) -> f64 {
    floor_div(total_kopecks / 100.0, PRICE_CORRECTION)
}

/// Float floor division computed through `fmod`, so results agree with the
/// remainder even where `(a / b).floor()` would round across an integer.
fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && ((b < 0.0) != (rem < 0.0)) {
        div -= 1.0;
    }

    if div == 0.0 {
        return 0.0_f64.copysign(a / b);
    }

    let mut floor = div.floor();
    if div - floor > 0.5 {
        floor += 1.0;
    }
    floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> CatalogItem {
        serde_json::from_value(value).expect("item should deserialize")
    }

    #[test]
    fn reference_price_floors_to_99() {
        // 10309 kopecks -> 103.09 roubles -> 103.09 / 1.0309945504 = 99.99...
        assert!((corrected_price(10309.0) - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_total_gives_zero_price() {
        assert!(corrected_price(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn whole_rouble_prices_floor_after_correction() {
        // 500.00 roubles / 1.0309945504 = 484.96...
        assert!((corrected_price(50_000.0) - 484.0).abs() < f64::EPSILON);
    }

    #[test]
    fn floor_div_rounds_toward_negative_infinity() {
        assert!((floor_div(7.0, 2.0) - 3.0).abs() < f64::EPSILON);
        assert!((floor_div(-7.0, 2.0) + 4.0).abs() < f64::EPSILON);
        assert!((floor_div(7.0, -2.0) + 4.0).abs() < f64::EPSILON);
        assert!(floor_div(0.5, 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn extracts_all_fields_from_complete_item() {
        let product = extract_product(&item(json!({
            "name": "Мастер и Маргарита",
            "id": 146_289_541,
            "brand": "Эксмо",
            "isbn": "978-5-04-116614-0",
            "sizes": [{"price": {"total": 10309}}]
        })));

        assert_eq!(product.name, "Мастер и Маргарита");
        assert_eq!(product.external_id, "146289541");
        assert_eq!(product.brand, "Эксмо");
        assert_eq!(product.isbn, "978-5-04-116614-0");
        assert!((product.price - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_brand_and_isbn_become_placeholder() {
        let product = extract_product(&item(json!({
            "name": "Notebook",
            "id": 7,
            "sizes": [{"price": {"total": 10309}}]
        })));
        assert_eq!(product.brand, "N/A");
        assert_eq!(product.isbn, "N/A");
        assert_eq!(product.name, "Notebook");
    }

    #[test]
    fn missing_sizes_gives_zero_price() {
        let product = extract_product(&item(json!({"name": "Pen", "id": 8})));
        assert!(product.price.abs() < f64::EPSILON);
    }

    #[test]
    fn nan_price_falls_back_to_zero() {
        let product = extract_product(&item(json!({"sizes": [{"price": {"total": "NaN"}}]})));
        assert!(product.price.is_finite());
        assert!(product.price.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_item_is_all_placeholders() {
        let product = extract_product(&item(json!({})));
        assert_eq!(product.text_cells(), ["N/A"; 4]);
        assert!(product.price.abs() < f64::EPSILON);
    }

    #[test]
    fn absent_page_yields_nothing() {
        assert!(extract_products(None).is_empty());
    }

    #[test]
    fn page_without_data_yields_nothing() {
        let page: CatalogPage = serde_json::from_value(json!({"state": 0})).unwrap();
        assert!(extract_products(Some(&page)).is_empty());
    }

    #[test]
    fn preserves_item_order() {
        let page: CatalogPage = serde_json::from_value(json!({
            "data": {"products": [
                {"id": 3, "name": "c"},
                {"id": 1, "name": "a"},
                {"id": 2, "name": "b"}
            ]}
        }))
        .unwrap();
        let ids: Vec<String> = extract_products(Some(&page))
            .into_iter()
            .map(|p| p.external_id)
            .collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }
}
