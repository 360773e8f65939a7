//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Import trades"</h1>
            <p class="subtitle">
                "Upload your broker's trade-book CSV, check every row, fix what the server "
                "rejects and import the whole batch at once."
            </p>
        </div>
    }
}
