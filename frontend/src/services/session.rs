//! Session details taken from the page: the CSRF cookie and the client
//! context built from it.

use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use tradeload::ClientContext;

use crate::config::{API_BASE_URL, BULK_PATH, CSRF_COOKIE};

/// Value of cookie `name` in a `document.cookie` string.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// CSRF token from the session cookie, if the page has one.
pub fn csrf_token() -> Option<String> {
    let document = gloo_utils::document().dyn_into::<HtmlDocument>().ok()?;
    let cookies = document.cookie().ok()?;
    cookie_value(&cookies, CSRF_COOKIE)
}

/// Client context for this page.
pub fn client_context() -> ClientContext {
    let context = ClientContext::new(API_BASE_URL).with_bulk_path(BULK_PATH);
    match csrf_token() {
        Some(token) => context.with_csrf_token(token),
        None => {
            log::warn!("⚠️ No '{}' cookie, submissions will be refused", CSRF_COOKIE);
            context
        }
    }
}
