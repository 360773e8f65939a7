//! Import dialog.

use leptos::*;
use tradeload::ImportWorkflow;

use crate::components::{PreviewSection, UploadSection};

#[component]
pub fn ImportModal(
    workflow: RwSignal<ImportWorkflow>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_imported: Callback<String>,
) -> impl IntoView {
    let has_preview = move || workflow.with(|wf| wf.state().is_editable() || wf.is_submitting());
    let message = move || workflow.with(|wf| wf.message().map(str::to_string));
    let closable = move || !workflow.with(|wf| wf.is_submitting());

    view! {
        <div class="modal-backdrop show"></div>
        <div class="modal d-block" role="dialog">
            <div class="modal-dialog modal-xl">
                <div class="modal-content">
                    <div class="modal-header">
                        <h5 class="modal-title">
                            {move || {
                                workflow
                                    .with(|wf| wf.file_name().map(|name| format!("Import {}", name)))
                                    .unwrap_or_else(|| "Import trades".to_string())
                            }}
                        </h5>
                        <button
                            class="btn-close"
                            title="Close"
                            on:click=move |_| on_close.call(())
                            disabled=move || !closable()
                        ></button>
                    </div>
                    <div class="modal-body">
                        <Show when=move || message().is_some() fallback=|| view! {}>
                            <div class="alert alert-warning">{move || message().unwrap_or_default()}</div>
                        </Show>

                        <UploadSection workflow=workflow/>

                        <Show when=has_preview fallback=|| view! {}>
                            <PreviewSection workflow=workflow on_imported=on_imported/>
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}
