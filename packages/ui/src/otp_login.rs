//! Mobile/email OTP login form.

use api::{Backend, User};
use dioxus::prelude::*;
use store::login::INACTIVE_ACCOUNT;
use store::{CaptchaState, LoginStage, OtpFlow, PendingAction};

use crate::auth::use_app;
use crate::captcha::Captcha;

#[component]
pub fn OtpLogin(on_login: EventHandler<User>) -> Element {
    let app = use_app();
    let config = app.config.clone();
    let mut flow = use_signal(move || OtpFlow::from_config(&config));

    let send_backend = app.backend.clone();
    let handle_send = move |_| {
        let Ok(request) = flow.write().begin_send() else {
            return;
        };
        let backend = send_backend.clone();
        spawn(async move {
            let result = backend.send_otp(&request).await;
            flow.write().apply_send(result);
        });
    };

    let verify_backend = app.backend.clone();
    let handle_verify = move |_| {
        let Ok(request) = flow.write().begin_verify() else {
            return;
        };
        let backend = verify_backend.clone();
        spawn(async move {
            let result = backend.login(&request).await;
            let user = flow.write().apply_verify(result);
            if let Some(user) = user {
                on_login.call(user);
            }
        });
    };

    let state = flow.read().clone();
    let site_key = app.config.captcha.site_key.clone();
    let sending = state.is_pending(PendingAction::SendOtp);
    let verifying = state.is_pending(PendingAction::VerifyOtp);
    let otp_sent = *state.stage() == LoginStage::OtpSent;
    let generation = state.captcha_generation();

    rsx! {
        div {
            class: "login-container",
            h2 { "Login" }

            if *state.stage() == LoginStage::InactiveAccount {
                p { class: "warning-message", "{INACTIVE_ACCOUNT}" }
            } else {
                input {
                    r#type: "tel",
                    placeholder: "Enter Mobile Number",
                    value: state.mobile().to_string(),
                    disabled: otp_sent,
                    oninput: move |evt: FormEvent| flow.write().set_mobile(evt.value()),
                }
                if state.requires_email() {
                    input {
                        r#type: "email",
                        placeholder: "Enter Email",
                        value: state.email().to_string(),
                        disabled: otp_sent,
                        oninput: move |evt: FormEvent| flow.write().set_email(evt.value()),
                    }
                }

                if *state.captcha() != CaptchaState::Disabled {
                    Captcha {
                        key: "{generation}",
                        site_key: site_key,
                        generation,
                        on_token: move |token: String| flow.write().set_captcha_token(token),
                    }
                }

                button {
                    class: "btn btn-primary",
                    disabled: !state.can_send(),
                    onclick: handle_send,
                    if sending {
                        "Sending..."
                    } else if otp_sent {
                        "Resend OTP"
                    } else {
                        "Send OTP"
                    }
                }

                if otp_sent {
                    input {
                        r#type: "text",
                        inputmode: "numeric",
                        placeholder: "Enter OTP",
                        value: state.otp().to_string(),
                        oninput: move |evt: FormEvent| flow.write().set_otp(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: !state.can_verify(),
                        onclick: handle_verify,
                        if verifying { "Verifying..." } else { "Verify OTP & Login" }
                    }
                    button {
                        class: "btn btn-link",
                        onclick: move |_| flow.write().restart(),
                        "Use a different number"
                    }
                }
            }

            if let Some(error) = state.error() {
                if *state.stage() != LoginStage::InactiveAccount {
                    p { class: "error-message", "{error}" }
                }
            }
        }
    }
}
