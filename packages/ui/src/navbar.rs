use dioxus::prelude::*;

use crate::auth::{use_auth, LogoutButton};

const UI_CSS: Asset = asset!("/assets/ui.css");

/// Top bar. Route links are passed in as children; the user's name and the
/// logout button appear once a user is signed in.
#[component]
pub fn Navbar(#[props(default)] on_logout: EventHandler<()>, children: Element) -> Element {
    let session = use_auth();
    let display_name = session
        .read()
        .user()
        .map(|user| user.display_name().to_string());

    rsx! {
        document::Link { rel: "stylesheet", href: UI_CSS }
        nav {
            class: "navbar",
            h1 { class: "navbar-brand", "Lead Reminders" }
            div {
                class: "navbar-links",
                {children}
                if let Some(name) = display_name {
                    span { class: "navbar-user", "{name}" }
                    LogoutButton { class: "navbar-logout", on_logout }
                }
            }
        }
    }
}
