//! Debounced search input.

use leptos::*;

use crate::config::SEARCH_DEBOUNCE_MS;
use crate::debounce::Debouncer;

#[component]
pub fn SearchBar(
    /// Receives the term once typing pauses.
    #[prop(into)]
    on_search: Callback<String>,
    #[prop(optional, into)] placeholder: Option<String>,
) -> impl IntoView {
    let debouncer = Debouncer::new(SEARCH_DEBOUNCE_MS);

    let pending = debouncer.clone();
    on_cleanup(move || pending.cancel());

    let on_input = move |ev: ev::Event| {
        let term = event_target_value(&ev);
        debouncer.call(move || on_search.call(term));
    };

    view! {
        <input
            type="search"
            class="form-control form-control-sm search-bar"
            placeholder=placeholder.unwrap_or_else(|| "Search trade id, ISIN, security, exchange".to_string())
            on:input=on_input
        />
    }
}
