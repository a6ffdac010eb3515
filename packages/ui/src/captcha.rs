//! reCAPTCHA v2 checkbox, rendered explicitly through `document::eval`.

use dioxus::prelude::*;

const RECAPTCHA_SCRIPT: &str = "https://www.google.com/recaptcha/api.js?render=explicit";

// Waits for the library, renders into the container and forwards every token.
// An expired challenge sends an empty token.
const RENDER_JS: &str = r#"
const container = "__CONTAINER__";
const siteKey = await dioxus.recv();
const render = () => {
    if (!window.grecaptcha || !window.grecaptcha.render) {
        setTimeout(render, 200);
        return;
    }
    window.grecaptcha.render(container, {
        sitekey: siteKey,
        callback: (token) => dioxus.send(token),
        "expired-callback": () => dioxus.send(""),
    });
};
render();
"#;

/// A fresh widget is rendered per `generation`; pass the generation as `key`
/// so the container is replaced after each reset.
#[component]
pub fn Captcha(site_key: String, generation: u32, on_token: EventHandler<String>) -> Element {
    let container = format!("recaptcha-{generation}");
    let script = RENDER_JS.replace("__CONTAINER__", &container);

    use_effect(move || {
        let mut eval = document::eval(&script);
        if let Err(e) = eval.send(site_key.clone()) {
            tracing::error!("Failed to initialise CAPTCHA: {e}");
            return;
        }
        spawn(async move {
            while let Ok(token) = eval.recv::<String>().await {
                on_token.call(token);
            }
        });
    });

    rsx! {
        document::Script { src: RECAPTCHA_SCRIPT }
        div { id: "{container}", class: "captcha" }
    }
}
