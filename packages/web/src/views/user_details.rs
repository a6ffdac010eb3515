use dioxus::prelude::*;
use ui::ProfileView;

use super::Protected;
use crate::Route;

/// Profile page. Saving returns to the lead list; deactivating signs out.
#[component]
pub fn UserDetails() -> Element {
    let nav = use_navigator();

    rsx! {
        Protected {
            ProfileView {
                on_saved: move |_| {
                    nav.push(Route::Leads {});
                },
                on_deactivated: move |_| {
                    nav.replace(Route::Login {});
                },
            }
        }
    }
}
