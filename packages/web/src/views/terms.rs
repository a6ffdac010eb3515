use dioxus::prelude::*;

#[component]
pub fn Terms() -> Element {
    rsx! {
        ui::Terms {}
    }
}
