use chrono::Datelike;
use dioxus::prelude::*;

#[component]
pub fn Footer() -> Element {
    let year = chrono::Local::now().year();
    rsx! {
        footer {
            class: "footer",
            "© {year} Lead Reminders. All rights reserved."
        }
    }
}
