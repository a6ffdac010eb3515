//! Login page view with the OTP form.

use api::User;
use dioxus::prelude::*;
use ui::{use_auth, OtpLogin};

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let mut session = use_auth();
    let nav = use_navigator();

    // If already logged in, go to the lead list
    use_effect(move || {
        if session.read().is_authenticated() {
            nav.replace(Route::Leads {});
        }
    });

    let on_login = move |user: User| {
        session.write().login(user);
        nav.replace(Route::Leads {});
    };

    rsx! {
        OtpLogin { on_login }
        p {
            class: "muted",
            "By signing in you agree to the "
            Link { to: Route::Terms {}, "Terms and Conditions" }
            "."
        }
    }
}
