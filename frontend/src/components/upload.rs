//! CSV file picker.
//!
//! Selecting a file resets the workflow to that file, reads it and builds
//! the preview. Parse errors end up in the workflow message; only read
//! errors are shown here.

use leptos::*;
use tradeload::{header_line, ImportWorkflow, TRADE_HEADERS};
use web_sys::{Event, HtmlInputElement};

use crate::services::read_file_bytes;

#[component]
pub fn UploadSection(workflow: RwSignal<ImportWorkflow>) -> impl IntoView {
    let (is_reading, set_is_reading) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        set_error.set(None);
        let name = file.name();
        if let Some(Err(e)) = workflow.try_update(|wf| wf.select_file(name.clone())) {
            set_error.set(Some(e.to_string()));
            return;
        }

        spawn_local(async move {
            set_is_reading.set(true);
            log::info!("📄 Reading {}", name);

            match read_file_bytes(&file).await {
                Ok(bytes) => match workflow.try_update(|wf| wf.load_preview_bytes(&bytes)) {
                    Some(Ok(rows)) => log::info!("✅ {}: {} trades", name, rows),
                    Some(Err(e)) => log::warn!("⚠️ {}: {}", name, e),
                    None => {}
                },
                Err(e) => {
                    log::error!("❌ {}", e);
                    set_error.set(Some(e.to_string()));
                }
            }

            set_is_reading.set(false);
        });

        // Picking the same file again must fire `change`.
        input.set_value("");
    };

    let file_name = move || workflow.with(|wf| wf.file_name().map(str::to_string));

    view! {
        <div class="upload-section">
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">
                {move || if is_reading.get() {
                    "⏳ Reading file...".to_string()
                } else {
                    file_name().unwrap_or_else(|| "Choose a trade-book CSV".to_string())
                }}
            </div>

            <Show when=move || !is_reading.get() fallback=|| view! {}>
                <div class="upload-hint">"Expected columns: " {header_line(&TRADE_HEADERS)}</div>
            </Show>

            <Show when=move || error.get().is_some() fallback=|| view! {}>
                <div class="error-message">{move || error.get().unwrap_or_default()}</div>
            </Show>

            <input
                type="file"
                id="fileInput"
                accept=".csv,text/csv"
                style="display:none"
                on:change=on_file_change
                disabled=move || is_reading.get() || workflow.with(|wf| wf.is_submitting())
            />

            <Show when=move || !is_reading.get() fallback=|| view! {}>
                <label for="fileInput" class="upload-button">
                    {move || if file_name().is_some() { "Choose another file" } else { "Choose a CSV file" }}
                </label>
            </Show>
        </div>
    }
}
