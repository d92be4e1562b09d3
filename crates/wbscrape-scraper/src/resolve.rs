//! Turns a storefront link into a catalog query.
//!
//! Seller links (`.../seller/<id>`) map directly to a `supplier=<id>` query.
//! Brand links (`.../brands/<slug>/...`) need one extra request: the brand's
//! metadata document on the static host gives the numeric id used in the
//! `brand=<id>` query.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use wbscrape_core::{ScrapeRequest, StorefrontKind};

use crate::client::CatalogClient;
use crate::error::{ResolveError, ScraperError};
use crate::types::BrandMetadata;

const STOREFRONT_DOMAIN: &str = "https://www.wildberries.ru";
const SELLER_CATALOG_URL: &str = "https://catalog.wb.ru/sellers/v2/catalog";
const BRAND_CATALOG_URL: &str = "https://catalog.wb.ru/brands/v2/catalog";
const BRAND_METADATA_URL: &str = "https://static-basket-01.wbbasket.ru/vol0/data/brands/";

/// Fixed search parameters shared by seller and brand queries, in order.
const FIXED_QUERY: [(&str, &str); 6] = [
    ("ab_testing", "false"),
    ("appType", "1"),
    ("curr", "rub"),
    ("dest", "82"),
    ("sort", "priceup"),
    ("spp", "30"),
];

static BRAND_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"brands/(.+?)/").expect("valid brand slug regex"));

/// Where links are expected to point and where queries are sent.
///
/// [`CatalogEndpoints::default`] targets the live storefront; tests point
/// the catalog and metadata URLs at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoints {
    /// Substring every accepted link must contain.
    pub storefront_domain: String,
    pub seller_catalog_url: String,
    pub brand_catalog_url: String,
    /// Directory URL holding `<slug>.json` brand documents.
    pub brand_metadata_url: String,
}

impl Default for CatalogEndpoints {
    fn default() -> Self {
        Self {
            storefront_domain: STOREFRONT_DOMAIN.to_owned(),
            seller_catalog_url: SELLER_CATALOG_URL.to_owned(),
            brand_catalog_url: BRAND_CATALOG_URL.to_owned(),
            brand_metadata_url: BRAND_METADATA_URL.to_owned(),
        }
    }
}

/// Resolves storefront links into [`ScrapeRequest`]s.
#[derive(Debug, Clone)]
pub struct RequestResolver {
    storefront_domain: String,
    seller_catalog: Url,
    brand_catalog: Url,
    brand_metadata: Url,
}

impl RequestResolver {
    /// Validates the endpoint URLs once so query building cannot fail later.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if any endpoint is not an
    /// absolute hierarchical URL.
    pub fn new(endpoints: CatalogEndpoints) -> Result<Self, ScraperError> {
        let parse = |raw: &str| -> Result<Url, ScraperError> {
            let url = Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
                url: raw.to_owned(),
                reason: e.to_string(),
            })?;
            if url.cannot_be_a_base() {
                return Err(ScraperError::InvalidUrl {
                    url: raw.to_owned(),
                    reason: "not a hierarchical URL".to_owned(),
                });
            }
            Ok(url)
        };

        Ok(Self {
            seller_catalog: parse(&endpoints.seller_catalog_url)?,
            brand_catalog: parse(&endpoints.brand_catalog_url)?,
            brand_metadata: directory_url(parse(&endpoints.brand_metadata_url)?),
            storefront_domain: endpoints.storefront_domain,
        })
    }

    /// Resolves `link` into a scrape request.
    ///
    /// Seller links are checked before brand links. Brand links trigger one
    /// metadata fetch through `client`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::WrongDomain`]: the link does not contain the storefront domain.
    /// - [`ResolveError::EmptySellerId`]: a seller link with no trailing id.
    /// - [`ResolveError::InvalidBrandLink`]: a brand link not matching `brands/<slug>/`.
    /// - [`ResolveError::BrandIdUnavailable`]: the metadata fetch failed or had no id.
    /// - [`ResolveError::UnrecognizedLink`]: neither a seller nor a brand link.
    pub async fn resolve(
        &self,
        client: &CatalogClient,
        link: &str,
    ) -> Result<ScrapeRequest, ResolveError> {
        let link = link.trim();
        if link.is_empty() || !link.contains(self.storefront_domain.as_str()) {
            return Err(ResolveError::WrongDomain);
        }

        if link.contains("seller") {
            return self.resolve_seller(link);
        }

        if link.contains("brands") {
            let slug = brand_slug(link).ok_or(ResolveError::InvalidBrandLink)?;
            let brand_id = self.fetch_brand_id(client, slug).await?;
            return Ok(self.brand_request(slug, brand_id));
        }

        Err(ResolveError::UnrecognizedLink)
    }

    fn resolve_seller(&self, link: &str) -> Result<ScrapeRequest, ResolveError> {
        let seller_id = seller_id(link).ok_or(ResolveError::EmptySellerId)?;

        let mut url = self.seller_catalog.clone();
        {
            let mut query = url.query_pairs_mut();
            query.extend_pairs(FIXED_QUERY);
            query.append_pair("supplier", seller_id);
        }

        Ok(ScrapeRequest {
            kind: StorefrontKind::Seller,
            base_query_url: url.to_string(),
            output_filename: format!("seller_{}.xlsx", filename_component(seller_id)),
        })
    }

    fn brand_request(&self, slug: &str, brand_id: u64) -> ScrapeRequest {
        let mut url = self.brand_catalog.clone();
        {
            let mut query = url.query_pairs_mut();
            query.extend_pairs(&FIXED_QUERY[..2]);
            query.append_pair("brand", &brand_id.to_string());
            query.extend_pairs(&FIXED_QUERY[2..]);
        }

        ScrapeRequest {
            kind: StorefrontKind::Brand,
            base_query_url: url.to_string(),
            output_filename: format!("brand_{}.xlsx", filename_component(slug)),
        }
    }

    /// URL of the metadata document for `slug`.
    ///
    /// The slug is used as it appears in the link: a percent-encoded slug
    /// stays encoded once.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the slug does not form a valid
    /// relative reference.
    pub fn brand_metadata_url(&self, slug: &str) -> Result<String, ScraperError> {
        let document = format!("./{slug}.json");
        self.brand_metadata
            .join(&document)
            .map(String::from)
            .map_err(|e| ScraperError::InvalidUrl {
                url: document,
                reason: e.to_string(),
            })
    }

    async fn fetch_brand_id(&self, client: &CatalogClient, slug: &str) -> Result<u64, ResolveError> {
        let unavailable = || ResolveError::BrandIdUnavailable {
            slug: slug.to_owned(),
        };
        let url = self.brand_metadata_url(slug).map_err(|e| {
            tracing::warn!(slug, error = %e, "cannot build brand metadata url");
            unavailable()
        })?;

        match client.fetch_json::<BrandMetadata>(&url).await {
            Ok(BrandMetadata { id: Some(id) }) if id != 0 => {
                tracing::debug!(slug, brand_id = id, "resolved brand id");
                Ok(id)
            }
            Ok(_) => {
                tracing::warn!(slug, url = %url, "brand metadata has no id");
                Err(unavailable())
            }
            Err(e) => {
                tracing::warn!(slug, error = %e, "brand metadata fetch failed");
                Err(unavailable())
            }
        }
    }
}

/// Last non-empty path segment of a seller link, ignoring query and fragment.
fn seller_id(link: &str) -> Option<&str> {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && *id != "seller")
}

/// Slug captured by `brands/(.+?)/`.
fn brand_slug(link: &str) -> Option<&str> {
    BRAND_SLUG_RE
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Ensures the path ends in `/` so relative joins land inside it.
fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Replaces path separators, control characters and `..` with `_`, so a
/// link can never steer the output path. Other characters are kept.
fn filename_component(raw: &str) -> String {
    raw.replace("..", "_")
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn resolver() -> RequestResolver {
        RequestResolver::new(CatalogEndpoints::default()).unwrap()
    }

    fn offline_client() -> CatalogClient {
        CatalogClient::new(1, "wbscrape-test/0.1", 1, Duration::ZERO).unwrap()
    }

    #[test]
    fn seller_id_takes_trailing_segment() {
        assert_eq!(seller_id("https://www.wildberries.ru/seller/8969"), Some("8969"));
        assert_eq!(seller_id("https://www.wildberries.ru/seller/8969/"), Some("8969"));
        assert_eq!(
            seller_id("https://www.wildberries.ru/seller/8969?sort=popular#top"),
            Some("8969")
        );
        assert_eq!(seller_id("https://www.wildberries.ru/seller/"), None);
    }

    #[test]
    fn brand_slug_matches_lazily_up_to_next_slash() {
        assert_eq!(brand_slug("https://www.wildberries.ru/brands/eksmo/"), Some("eksmo"));
        assert_eq!(
            brand_slug("https://www.wildberries.ru/brands/la-roche-posay/all?page=2"),
            Some("la-roche-posay")
        );
        assert_eq!(brand_slug("https://www.wildberries.ru/brands/eksmo"), None);
    }

    #[test]
    fn filename_component_replaces_path_characters() {
        assert_eq!(filename_component("8969"), "8969");
        assert_eq!(filename_component("..\\evil"), "__evil");
        assert_eq!(filename_component("../../etc"), "____etc");
        assert_eq!(filename_component("la-roche_posay"), "la-roche_posay");
    }

    #[test]
    fn filename_component_keeps_slug_punctuation() {
        assert_eq!(filename_component("mr.kitty"), "mr.kitty");
        assert_eq!(filename_component("l'oreal"), "l'oreal");
        assert_eq!(
            filename_component("%D1%8D%D0%BA%D1%81%D0%BC%D0%BE"),
            "%D1%8D%D0%BA%D1%81%D0%BC%D0%BE"
        );
    }

    #[test]
    fn brand_metadata_url_appends_slug_document() {
        assert_eq!(
            resolver().brand_metadata_url("eksmo").unwrap(),
            "https://static-basket-01.wbbasket.ru/vol0/data/brands/eksmo.json"
        );
    }

    #[test]
    fn brand_metadata_url_keeps_percent_encoded_slug() {
        let slug = brand_slug("https://www.wildberries.ru/brands/%D1%8D%D0%BA%D1%81%D0%BC%D0%BE/")
            .unwrap();
        assert_eq!(
            resolver().brand_metadata_url(slug).unwrap(),
            "https://static-basket-01.wbbasket.ru/vol0/data/brands/%D1%8D%D0%BA%D1%81%D0%BC%D0%BE.json"
        );
    }

    #[test]
    fn brand_metadata_url_treats_scheme_like_slug_as_relative() {
        assert_eq!(
            resolver().brand_metadata_url("mailto:x").unwrap(),
            "https://static-basket-01.wbbasket.ru/vol0/data/brands/mailto:x.json"
        );
    }

    #[test]
    fn metadata_base_without_trailing_slash_is_a_directory() {
        let resolver = RequestResolver::new(CatalogEndpoints {
            brand_metadata_url: "https://static.example/vol0/data/brands".to_owned(),
            ..CatalogEndpoints::default()
        })
        .unwrap();
        assert_eq!(
            resolver.brand_metadata_url("eksmo").unwrap(),
            "https://static.example/vol0/data/brands/eksmo.json"
        );
    }

    #[test]
    fn new_rejects_relative_endpoint() {
        let endpoints = CatalogEndpoints {
            seller_catalog_url: "/sellers/v2/catalog".to_owned(),
            ..CatalogEndpoints::default()
        };
        assert!(matches!(
            RequestResolver::new(endpoints),
            Err(ScraperError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn seller_link_builds_supplier_query() {
        let request = resolver()
            .resolve(&offline_client(), "https://www.wildberries.ru/seller/8969")
            .await
            .unwrap();

        assert_eq!(request.kind, StorefrontKind::Seller);
        assert_eq!(
            request.base_query_url,
            "https://catalog.wb.ru/sellers/v2/catalog?ab_testing=false&appType=1&curr=rub&dest=82&sort=priceup&spp=30&supplier=8969"
        );
        assert_eq!(request.output_filename, "seller_8969.xlsx");
    }

    #[tokio::test]
    async fn seller_links_for_many_ids_embed_the_id() {
        let resolver = resolver();
        let client = offline_client();
        for id in ["1", "8969", "250023413", "4000000000"] {
            let link = format!("https://www.wildberries.ru/seller/{id}");
            let request = resolver.resolve(&client, &link).await.unwrap();
            assert!(
                request.base_query_url.ends_with(&format!("supplier={id}")),
                "query for {id}: {}",
                request.base_query_url
            );
            assert_eq!(request.output_filename, format!("seller_{id}.xlsx"));
        }
    }

    #[tokio::test]
    async fn foreign_domain_is_rejected() {
        let err = resolver()
            .resolve(&offline_client(), "https://www.ozon.ru/seller/8969")
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::WrongDomain);
    }

    #[tokio::test]
    async fn empty_link_is_rejected() {
        let err = resolver().resolve(&offline_client(), "  ").await.unwrap_err();
        assert_eq!(err, ResolveError::WrongDomain);
    }

    #[tokio::test]
    async fn seller_link_without_id_is_rejected() {
        let err = resolver()
            .resolve(&offline_client(), "https://www.wildberries.ru/seller/")
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::EmptySellerId);
    }

    #[tokio::test]
    async fn brand_link_without_trailing_slash_is_invalid() {
        let err = resolver()
            .resolve(&offline_client(), "https://www.wildberries.ru/brands/eksmo")
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::InvalidBrandLink);
    }

    #[tokio::test]
    async fn other_storefront_pages_are_unrecognized() {
        let err = resolver()
            .resolve(
                &offline_client(),
                "https://www.wildberries.ru/catalog/146289541/detail.aspx",
            )
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::UnrecognizedLink);
    }
}
