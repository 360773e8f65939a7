//! Application configuration.
//!
//! Compile-time settings for the import modal. The CSRF token is not
//! configured here: it is read from the session cookie at startup.

/// Origin of the tracker API. Empty means same origin as the page.
pub const API_BASE_URL: &str = "";

/// Bulk trade endpoint, relative to [`API_BASE_URL`].
pub const BULK_PATH: &str = tradeload::config::DEFAULT_BULK_PATH;

/// Portfolio resource path; `{id}` comes from the page route.
pub const PORTFOLIO_PATH: &str = "/portfolio/api/portfolios/";

/// Cookie the tracker sets with the session's CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Preview rows per page.
pub const PAGE_SIZE: usize = 25;

/// Delay before a search term is applied, in milliseconds.
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Maximum file size accepted by the file picker (in bytes).
///
/// 5 MB limit.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Portfolio resource URL for the route's portfolio id.
pub fn portfolio_url(id: &str) -> String {
    format!("{}{}{}/", API_BASE_URL, PORTFOLIO_PATH, id.trim_matches('/'))
}
