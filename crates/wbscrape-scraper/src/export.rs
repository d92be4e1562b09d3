//! Spreadsheet export of scraped products.

use std::path::Path;

use rust_xlsxwriter::Workbook;
use wbscrape_core::{Product, PRODUCT_HEADER};

use crate::error::ExportError;

/// Worksheet name used for every export.
pub const SHEET_NAME: &str = "Products";

/// Writes `products` to an `.xlsx` file at `path`, replacing any existing file.
///
/// Row 1 is [`PRODUCT_HEADER`]; each following row is one product in input
/// order. Text fields are written as strings and the price as a number.
///
/// # Errors
///
/// - [`ExportError::Io`] if the parent directory cannot be created.
/// - [`ExportError::Xlsx`] if the workbook cannot be built or saved
///   (including permission and disk errors on save).
pub fn export_products(products: &[Product], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in (0u16..).zip(PRODUCT_HEADER) {
        worksheet.write_string(0, col, title)?;
    }

    for (row, product) in (1u32..).zip(products) {
        for (col, cell) in (0u16..).zip(product.text_cells()) {
            worksheet.write_string(row, col, cell)?;
        }
        worksheet.write_number(row, 4, product.price)?;
    }

    workbook.save(path)?;
    tracing::debug!(path = %path.display(), rows = products.len(), "spreadsheet written");
    Ok(())
}
