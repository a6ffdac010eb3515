use dioxus::prelude::*;
use ui::{Footer, Navbar};

use crate::Route;

/// Layout shared by every route: navbar, page, footer.
#[component]
pub fn Shell() -> Element {
    let nav = use_navigator();

    rsx! {
        div {
            class: "app-shell",
            Navbar {
                on_logout: move |_| {
                    nav.replace(Route::Login {});
                },
                Link { to: Route::Leads {}, "Leads" }
                Link { to: Route::UserDetails {}, "User Menu" }
                Link { to: Route::Terms {}, "Terms" }
            }
            main {
                id: "main-content",
                class: "main-content",
                Outlet::<Route> {}
            }
            Footer {}
        }
    }
}
