//! Page-number pagination for catalog search URLs.
//!
//! Search URLs carry their filters in the query string; pages are selected by
//! appending `&page=N`, starting at 1. There is no cursor and no total count:
//! the first empty page ends the sequence.

/// First page number of every catalog query.
pub const FIRST_PAGE: u32 = 1;

/// Appends the page parameter to a base catalog query URL.
///
/// `base_url` must already contain a query string.
#[must_use]
pub fn page_url(base_url: &str, page: u32) -> String {
    format!("{base_url}&page={page}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_page_parameter() {
        assert_eq!(
            page_url("https://catalog.wb.ru/sellers/v2/catalog?supplier=8969", 1),
            "https://catalog.wb.ru/sellers/v2/catalog?supplier=8969&page=1"
        );
    }

    #[test]
    fn page_numbers_are_not_padded() {
        assert!(page_url("https://x.test/c?a=1", 12).ends_with("&page=12"));
    }
}
