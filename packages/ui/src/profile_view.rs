use api::{Backend, User};
use dioxus::prelude::*;
use store::{PendingAction, ProfileForm};

use crate::auth::{use_app, use_auth};

/// Profile page for the signed-in user. Renders nothing without one.
#[component]
pub fn ProfileView(on_saved: EventHandler<User>, on_deactivated: EventHandler<()>) -> Element {
    let session = use_auth();
    let user = session.read().user.clone();

    match user {
        Some(user) => rsx! {
            ProfileEditor { key: "{user.id}", user, on_saved, on_deactivated }
        },
        None => rsx! {},
    }
}

#[component]
fn ProfileEditor(
    user: User,
    on_saved: EventHandler<User>,
    on_deactivated: EventHandler<()>,
) -> Element {
    let app = use_app();
    let mut session = use_auth();
    let email_editable = app.config.profile.email_editable;
    let mut form = use_signal(move || ProfileForm::new(user, email_editable));

    let save_backend = app.backend.clone();
    let handle_save = move |_| {
        let Ok(user) = form.write().begin_save() else {
            return;
        };
        let backend = save_backend.clone();
        spawn(async move {
            let result = backend.update_user(&user).await;
            let saved = form.write().apply_save(result);
            if let Some(user) = saved {
                session.write().update_user(user.clone());
                on_saved.call(user);
            }
        });
    };

    let deactivate_backend = app.backend.clone();
    let handle_deactivate = move |_| {
        let Ok(id) = form.write().begin_deactivate() else {
            return;
        };
        let backend = deactivate_backend.clone();
        spawn(async move {
            let result = backend.deactivate_user(id).await;
            if form.write().apply_deactivate(result) {
                session.write().clear();
                on_deactivated.call(());
            }
        });
    };

    let state = form.read().clone();
    let saving = state.is_pending(PendingAction::SaveProfile);
    let deactivating = state.is_pending(PendingAction::Deactivate);

    rsx! {
        div {
            class: "profile-container",
            h2 { "User Details" }

            label { r#for: "profile-name", "Name" }
            input {
                id: "profile-name",
                r#type: "text",
                placeholder: "Name",
                value: state.name().to_string(),
                oninput: move |evt: FormEvent| form.write().set_name(evt.value()),
            }

            label { r#for: "profile-mobile", "Mobile Number" }
            input {
                id: "profile-mobile",
                r#type: "text",
                value: state.masked_mobile(),
                readonly: true,
                disabled: true,
            }

            label { r#for: "profile-email", "Email ID" }
            input {
                id: "profile-email",
                r#type: "email",
                placeholder: "Email ID",
                value: state.email().to_string(),
                readonly: !state.email_editable(),
                disabled: !state.email_editable(),
                oninput: move |evt: FormEvent| form.write().set_email(evt.value()),
            }

            button {
                class: "btn btn-primary",
                disabled: saving,
                onclick: handle_save,
                if saving { "Saving..." } else { "Save Details" }
            }

            if let Some(error) = state.error() {
                p { class: "error-message", "{error}" }
            }

            div {
                class: "danger-zone",
                if state.is_confirming_deactivate() {
                    p {
                        class: "warning-message",
                        "Deactivating your account is permanent. You will be logged out and will stop receiving reminders."
                    }
                    button {
                        class: "btn btn-danger",
                        disabled: deactivating,
                        onclick: handle_deactivate,
                        if deactivating { "Deactivating..." } else { "Yes, deactivate my account" }
                    }
                    button {
                        class: "btn btn-link",
                        onclick: move |_| form.write().cancel_deactivate(),
                        "Cancel"
                    }
                } else {
                    button {
                        class: "btn btn-danger",
                        onclick: move |_| form.write().request_deactivate(),
                        "Deactivate Account"
                    }
                }
            }
        }
    }
}
