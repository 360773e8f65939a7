//! Editable preview grid.
//!
//! Rows are keyed by [`RowId`], so editing or deleting one row never
//! re-creates the inputs of the others. Each row looks its position up at
//! event time since deletes shift indices.

use leptos::*;
use tradeload::annotate::annotate_row;
use tradeload::{ImportWorkflow, RowAnnotation, RowId, TradeField, TRADE_HEADERS};

/// Row number + one column per CSV header + actions.
const COLUMN_COUNT: usize = TRADE_HEADERS.len() + 2;

#[component]
pub fn PreviewGrid(
    workflow: RwSignal<ImportWorkflow>,
    /// Ids of the rows on the current page, in display order.
    #[prop(into)]
    rows: Signal<Vec<RowId>>,
) -> impl IntoView {
    view! {
        <div class="table-responsive">
            <table class="table table-sm table-bordered preview-grid">
                <thead>
                    <tr>
                        <th>"#"</th>
                        {TRADE_HEADERS
                            .iter()
                            .map(|header| view! { <th>{header.label}</th> })
                            .collect_view()}
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || rows.get()
                        key=|id| *id
                        children=move |id| view! { <GridRow id=id workflow=workflow/> }
                    />
                </tbody>
            </table>
            <Show when=move || rows.with(Vec::is_empty) fallback=|| view! {}>
                <div class="empty-grid">"No rows to show"</div>
            </Show>
        </div>
    }
}

fn row_annotation(wf: &ImportWorkflow, id: RowId) -> Option<RowAnnotation> {
    let preview = wf.preview();
    preview
        .position(id)
        .and_then(|index| preview.get(index))
        .map(|row| annotate_row(row, preview.is_validated()))
}

/// 1-based position of the row in the current preview.
fn row_number(wf: &ImportWorkflow, id: RowId) -> Option<usize> {
    wf.preview().position(id).map(|index| index + 1)
}

fn cell_value(wf: &ImportWorkflow, id: RowId, field: TradeField) -> String {
    let preview = wf.preview();
    preview
        .position(id)
        .and_then(|index| preview.get(index))
        .map(|row| row.trade.get(field).to_string())
        .unwrap_or_default()
}

#[component]
fn GridRow(id: RowId, workflow: RwSignal<ImportWorkflow>) -> impl IntoView {
    let note = create_memo(move |_| workflow.with(|wf| row_annotation(wf, id)));
    let editable = move || workflow.with(|wf| wf.state().is_editable());
    let row_class = move || note.with(|n| n.as_ref().map_or("", |n| n.status.css_class()));

    let cells = TRADE_HEADERS
        .iter()
        .map(|header| {
            let field = header.field;
            let message = move || {
                note.with(|n| n.as_ref().and_then(|n| n.cell_message(field)).map(str::to_string))
            };
            let on_input = move |ev: ev::Event| {
                let value = event_target_value(&ev);
                workflow.update(|wf| {
                    let Some(index) = wf.preview().position(id) else {
                        return;
                    };
                    if let Err(e) = wf.edit_field(index, field.key(), value) {
                        log::warn!("⚠️ Edit refused on row {}: {}", id, e);
                    }
                });
            };

            view! {
                <td>
                    <input
                        type="text"
                        class="form-control form-control-sm"
                        class:is-invalid=move || message().is_some()
                        prop:value=move || workflow.with(|wf| cell_value(wf, id, field))
                        on:input=on_input
                        disabled=move || !editable()
                    />
                    {move || message().map(|m| view! { <div class="invalid-feedback">{m}</div> })}
                </td>
            }
        })
        .collect_view();

    let on_delete = move |_| {
        workflow.update(|wf| {
            let Some(index) = wf.preview().position(id) else {
                return;
            };
            if let Err(e) = wf.delete_row(index) {
                log::warn!("⚠️ Delete refused on row {}: {}", id, e);
            }
        });
    };

    let row_message = move || note.with(|n| n.as_ref().and_then(|n| n.row_message.clone()));

    view! {
        <tr class=row_class>
            <td class="row-number">
                {move || workflow.with(|wf| row_number(wf, id)).map(|n| n.to_string()).unwrap_or_default()}
            </td>
            {cells}
            <td>
                <button
                    class="btn btn-sm btn-outline-danger"
                    title="Delete row"
                    on:click=on_delete
                    disabled=move || !editable()
                >
                    "✕"
                </button>
            </td>
        </tr>
        {move || {
            row_message()
                .map(|m| {
                    view! {
                        <tr class="table-danger row-message">
                            <td colspan=COLUMN_COUNT.to_string()>{m}</td>
                        </tr>
                    }
                })
        }}
    }
}
