//! Route guard for pages that need a signed-in user.

use dioxus::prelude::*;
use store::GuardDecision;
use ui::use_auth;

use crate::Route;

/// Renders `children` only for a signed-in user.
///
/// While the session check is outstanding a placeholder is shown and no
/// redirect happens. Each guarded page mounts its own guard, so the decision
/// is re-evaluated on every navigation.
#[component]
pub fn Protected(children: Element) -> Element {
    let session = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if session.read().guard() == GuardDecision::RedirectToLogin {
            tracing::debug!("No session, redirecting to login");
            nav.replace(Route::Login {});
        }
    });

    let decision = session.read().guard();
    match decision {
        GuardDecision::Loading => rsx! {
            div { class: "loading", "Loading..." }
        },
        GuardDecision::Render => rsx! {
            {children}
        },
        GuardDecision::RedirectToLogin => rsx! {},
    }
}
