//! Preview section: search, grid, pagination and the submit bar.

use leptos::*;
use tradeload::{page_count, page_slice, ClientContext, ImportState, ImportWorkflow, RowId};

use crate::components::{Pagination, PreviewGrid, SearchBar};
use crate::config::PAGE_SIZE;
use crate::services::{client_context, submit_trades};

/// Ids of the rows matching `term`, in preview order.
fn matching_ids(wf: &ImportWorkflow, term: &str) -> Vec<RowId> {
    let preview = wf.preview();
    preview
        .search(term)
        .into_iter()
        .filter_map(|index| preview.get(index).map(|row| row.id))
        .collect()
}

#[component]
pub fn PreviewSection(
    workflow: RwSignal<ImportWorkflow>,
    /// Called with the summary once the batch is accepted.
    #[prop(into)]
    on_imported: Callback<String>,
) -> impl IntoView {
    let context = use_context::<ClientContext>().unwrap_or_else(client_context);

    let (search, set_search) = create_signal(String::new());
    let page = create_rw_signal(1usize);

    let filtered = create_memo(move |_| workflow.with(|wf| matching_ids(wf, &search.get())));
    let pages = Signal::derive(move || filtered.with(|ids| page_count(ids.len(), PAGE_SIZE)));
    let visible = create_memo(move |_| {
        filtered.with(|ids| page_slice(ids, page.get(), PAGE_SIZE).to_vec())
    });

    // Keep the page in range when rows are deleted or the filter narrows.
    create_effect(move |_| {
        let last = pages.get();
        if page.get_untracked() > last {
            page.set(last);
        }
    });

    let on_search = move |term: String| {
        set_search.set(term);
        page.set(1);
    };

    let on_submit = move |_| {
        let payload = match workflow.try_update(|wf| wf.begin_submit()) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                log::warn!("⚠️ {}", e);
                return;
            }
            None => return,
        };

        let context = context.clone();
        spawn_local(async move {
            let outcome = submit_trades(&context, &payload).await;
            let completed = workflow.try_update(|wf| {
                wf.complete_submit(outcome)
                    .map(|state| (state, wf.message().unwrap_or_default().to_string()))
            });

            match completed {
                Some(Ok((ImportState::Succeeded, summary))) => on_imported.call(summary),
                Some(Ok((state, summary))) => log::warn!("⚠️ {}: {}", state, summary),
                Some(Err(e)) => log::error!("❌ {}", e),
                None => {}
            }
        });
    };

    let total = move || workflow.with(|wf| wf.preview().len());
    let failing = move || workflow.with(|wf| wf.preview().error_count());
    let submitting = move || workflow.with(|wf| wf.is_submitting());

    view! {
        <div class="preview-section show">
            <div class="preview-header">
                <div class="preview-title">"📋 Preview"</div>
                <SearchBar on_search=on_search/>
            </div>

            <PreviewGrid workflow=workflow rows=visible/>
            <Pagination page=page page_count=pages/>

            <div class="preview-footer">
                <div class="preview-count">
                    <strong>{total}</strong> " trades"
                    <Show when=move || { failing() > 0 } fallback=|| view! {}>
                        " • " <strong class="text-danger">{failing}</strong> " with errors"
                    </Show>
                </div>
                <button
                    class="btn btn-primary"
                    on:click=on_submit
                    disabled=move || !workflow.with(|wf| wf.can_submit())
                >
                    {move || if submitting() { "⏳ Importing..." } else { "Import" }}
                </button>
            </div>
        </div>
    }
}
