//! Session context and hooks for the UI.

use api::config::AppConfig;
use api::{ApiError, HttpBackend};
use dioxus::prelude::*;
use store::SessionState;

/// Everything views need to talk to the backend.
#[derive(Clone, Debug)]
pub struct AppContext {
    pub backend: HttpBackend,
    pub config: AppConfig,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let backend = HttpBackend::new(config.api.base_url.clone())?;
        Ok(Self { backend, config })
    }
}

/// Get the current session state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Backend client and configuration provided by [`AuthProvider`].
pub fn use_app() -> AppContext {
    use_context::<AppContext>()
}

/// Provider component that owns the session state.
/// Wrap your app with this component; it checks the session cookie on mount.
#[component]
pub fn AuthProvider(config: AppConfig, children: Element) -> Element {
    match AppContext::new(config) {
        Ok(app) => rsx! {
            SessionScope { app, {children} }
        },
        Err(e) => {
            tracing::error!("Failed to create HTTP client: {e}");
            rsx! {
                div { class: "app-error", "Unable to start the application." }
            }
        }
    }
}

#[component]
fn SessionScope(app: AppContext, children: Element) -> Element {
    let backend = app.backend.clone();
    use_context_provider(|| app);
    let mut session = use_signal(SessionState::default);
    use_context_provider(|| session);

    // Fetch the current user on mount
    let _ = use_resource(move || {
        let backend = backend.clone();
        async move {
            let state = store::load_session(&backend).await;
            session.set(state);
        }
    });

    rsx! {
        {children}
    }
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && self.backend.base_url() == other.backend.base_url()
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    #[props(default)] on_logout: EventHandler<()>,
) -> Element {
    let mut session = use_auth();
    let app = use_app();

    let onclick = move |_| {
        let backend = app.backend.clone();
        async move {
            let mut state = session();
            store::logout(&backend, &mut state).await;
            session.set(state);
            on_logout.call(());
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
