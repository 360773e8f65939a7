use leptos::*;

#[component]
pub fn Header(
    /// Whether a CSRF token was found for this session.
    session_active: bool,
    #[prop(optional)] portfolio: Option<Signal<Option<String>>>,
) -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="/" class="logo">"TRADELOAD"</a>
                <span class="badge">
                    {move || {
                        portfolio
                            .and_then(|p| p.get())
                            .map(|id| format!("Portfolio #{}", id))
                            .unwrap_or_else(|| "No portfolio".to_string())
                    }}
                </span>
            </div>
            <div class="header-right">
                <div class="session-status" class:connected=session_active>
                    <span class="session-dot" class:connected=session_active></span>
                    <span>
                        {if session_active { "Signed in" } else { "No session" }}
                    </span>
                </div>
            </div>
        </header>
    }
}
