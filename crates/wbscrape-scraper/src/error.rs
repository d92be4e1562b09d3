use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("malformed response body from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("all {attempts} attempts to fetch {url} failed: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<ScraperError>,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A storefront link that cannot be turned into a scrape request.
///
/// Every variant is a user input problem: it is answered with
/// [`ResolveError::user_message`] and never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("link is missing or does not point at the storefront domain")]
    WrongDomain,

    #[error("seller link has no seller id")]
    EmptySellerId,

    #[error("brand link does not match brands/<slug>/")]
    InvalidBrandLink,

    #[error("could not resolve numeric id for brand \"{slug}\"")]
    BrandIdUnavailable { slug: String },

    #[error("link is neither a seller nor a brand storefront")]
    UnrecognizedLink,
}

impl ResolveError {
    /// Reply text shown to the chat user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::WrongDomain => "Укажите нормальную ссылку на бренд или селлера",
            ResolveError::EmptySellerId | ResolveError::UnrecognizedLink => "Неправильная ссылка.",
            ResolveError::InvalidBrandLink => "Неправильная ссылка на бренд.",
            ResolveError::BrandIdUnavailable { .. } => "Не удалось получить ID бренда.",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
