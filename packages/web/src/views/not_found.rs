use dioxus::prelude::*;

use crate::Route;

/// Unknown paths land on the lead list.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let nav = use_navigator();
    let path = segments.join("/");

    use_effect(move || {
        tracing::debug!("No route for /{path}, redirecting");
        nav.replace(Route::Leads {});
    });

    rsx! {}
}
