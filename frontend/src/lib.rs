//! Tradeload - Frontend Rust/Leptos Application
//!
//! A WebAssembly import page for bringing a broker's trade-book CSV into a
//! portfolio, with inline correction of the rows the server rejects.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (portfolio, session status)                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── Notice banner                                          │
//! │  └── ImportModal (while open)                               │
//! │      ├── UploadSection                                      │
//! │      └── PreviewSection (SearchBar, PreviewGrid, Pagination)│
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! All import state lives in one `RwSignal<ImportWorkflow>`; components
//! read it and call its operations.
//!
//! # Modules
//!
//! - [`types`] - Notices and frontend errors
//! - [`components`] - UI components
//! - [`services`] - Bulk submission, session cookie, file reading
//! - [`debounce`] - Debounced callbacks

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use tradeload::{ClientContext, ImportWorkflow};
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod debounce;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;
pub use types::{AppError, AppResult, Notice, NoticeLevel};
pub use debounce::Debouncer;
pub use components::*;
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Tradeload - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(client_context());

    view! {
        <Title text="Import trades"/>
        <Router>
            <main>
                <Routes>
                    <Route path="/portfolios/:id" view=MainContent/>
                    <Route path="/*any" view=NoPortfolio/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn NoPortfolio() -> impl IntoView {
    let session_active = use_context::<ClientContext>().is_some_and(|c| c.csrf_token.is_some());

    view! {
        <Header session_active=session_active/>
        <div class="container">
            <Hero/>
            <div class="alert alert-warning">
                "Open this page from a portfolio: /portfolios/<id>"
            </div>
        </div>
        <Footer/>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let params = use_params_map();
    let portfolio_id = Signal::derive(move || params.with(|p| p.get("id").cloned()));
    let session_active = use_context::<ClientContext>().is_some_and(|c| c.csrf_token.is_some());

    let workflow = create_rw_signal(ImportWorkflow::new(""));
    let (modal_open, set_modal_open) = create_signal(false);
    let (notice, set_notice) = create_signal(None::<Notice>);

    let on_open = move |_| {
        let Some(id) = portfolio_id.get() else {
            return;
        };
        log::info!("📂 Opening import for portfolio {}", id);
        workflow.set(ImportWorkflow::new(portfolio_url(&id)));
        set_notice.set(None);
        set_modal_open.set(true);
    };

    let on_close = move |_: ()| {
        workflow.update(ImportWorkflow::reset);
        set_modal_open.set(false);
    };

    let on_imported = move |summary: String| {
        log::info!("✨ {}", summary);
        set_notice.set(Some(Notice::success(summary)));
        set_modal_open.set(false);
    };

    view! {
        <Header session_active=session_active portfolio=portfolio_id/>

        <div class="container">
            <Hero/>

            {move || {
                notice
                    .get()
                    .map(|n| {
                        view! {
                            <div class=n.level.css_class() role="alert">
                                {n.text}
                                <button class="btn-close" on:click=move |_| set_notice.set(None)></button>
                            </div>
                        }
                    })
            }}

            <Show when=move || !session_active fallback=|| view! {}>
                <div class=NoticeLevel::Warning.css_class()>
                    "No CSRF cookie found. Sign in to the tracker before importing."
                </div>
            </Show>

            <button class="btn btn-primary" on:click=on_open disabled=move || modal_open.get()>
                "📤 Import trades from CSV"
            </button>

            <Show when=move || modal_open.get() fallback=|| view! {}>
                <ImportModal workflow=workflow on_close=on_close on_imported=on_imported/>
            </Show>
        </div>

        <Footer/>
    }
}
