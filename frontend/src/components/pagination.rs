//! Page navigation for the preview grid.

use leptos::*;

#[component]
pub fn Pagination(
    /// Current page, 1-based.
    page: RwSignal<usize>,
    #[prop(into)] page_count: Signal<usize>,
) -> impl IntoView {
    let on_prev = move |_| page.update(|p| *p = p.saturating_sub(1).max(1));
    let on_next = move |_| {
        let last = page_count.get();
        page.update(|p| *p = (*p + 1).min(last));
    };

    view! {
        <Show when=move || { page_count.get() > 1 } fallback=|| view! {}>
            <nav class="pagination">
                <button
                    class="btn btn-sm btn-secondary"
                    on:click=on_prev
                    disabled=move || page.get() <= 1
                >
                    "‹ Prev"
                </button>
                <span class="page-info">
                    {move || format!("Page {} of {}", page.get(), page_count.get())}
                </span>
                <button
                    class="btn btn-sm btn-secondary"
                    on:click=on_next
                    disabled=move || page.get() >= page_count.get()
                >
                    "Next ›"
                </button>
            </nav>
        </Show>
    }
}
