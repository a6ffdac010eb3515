use dioxus::prelude::*;
use ui::LeadsView;

use super::Protected;

#[component]
pub fn Leads() -> Element {
    rsx! {
        Protected {
            LeadsView {}
        }
    }
}
