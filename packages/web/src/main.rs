use api::config::AppConfig;
use dioxus::prelude::*;

use ui::AuthProvider;
use views::{Leads, Login, NotFound, Shell, Terms, UserDetails};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Leads {},
        #[route("/user-details")]
        UserDetails {},
        #[route("/login")]
        Login {},
        #[route("/terms")]
        Terms {},
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const LEADS_TOML: &str = include_str!("../leads.toml");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = AppConfig::load(LEADS_TOML);
    tracing::info!("Using backend at {}", config.api.base_url);

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            config,
            Router::<Route> {}
        }
    }
}
