//! Lead list page: add form, search and filter, table with inline edit.

use api::{Backend, Lead};
use dioxus::prelude::*;
use store::validation::MAX_MEETING_NOTES;
use store::{ActivityFilter, Followup, LeadField, LeadList, PendingAction, SessionState};

use crate::auth::{use_app, use_auth};
use crate::icons::{FaBan, FaPen};
use crate::Icon;

async fn refetch<B: Backend>(mut list: Signal<LeadList>, backend: B) {
    // Peek: a tracked read here would subscribe the loader to `list`.
    let Some(owner) = list.peek().begin_fetch() else {
        return;
    };
    let result = backend.list_leads(owner).await;
    list.write().apply_fetch(result);
}

async fn follow_up<B: Backend>(followup: Followup, list: Signal<LeadList>, backend: B) {
    if followup == Followup::Refetch {
        refetch(list, backend).await;
    }
}

/// Fetch the signed-in user's leads on mount and whenever the user changes.
fn use_lead_loader<B: Backend + Clone + 'static>(
    mut list: Signal<LeadList>,
    session: Signal<SessionState>,
    backend: B,
) -> Resource<()> {
    use_resource(move || {
        let backend = backend.clone();
        let owner = session.read().user_id();
        async move {
            list.write().set_owner(owner);
            refetch(list, backend).await;
        }
    })
}

#[component]
pub fn LeadsView() -> Element {
    let app = use_app();
    let session = use_auth();
    let settings = app.config.leads.clone();
    let mut list = use_signal(move || LeadList::from_settings(None, &settings));
    let _ = use_lead_loader(list, session, app.backend.clone());

    let create_backend = app.backend.clone();
    let handle_create = move |_| {
        let Ok(draft) = list.write().begin_create() else {
            return;
        };
        let backend = create_backend.clone();
        spawn(async move {
            let result = backend.create_lead(&draft).await;
            let followup = list.write().apply_create(result);
            follow_up(followup, list, backend).await;
        });
    };

    let update_backend = app.backend.clone();
    let handle_update = move |_| {
        let Ok((id, draft)) = list.write().begin_update() else {
            return;
        };
        let backend = update_backend.clone();
        spawn(async move {
            let result = backend.update_lead(id, &draft).await;
            let followup = list.write().apply_update(id, result);
            follow_up(followup, list, backend).await;
        });
    };

    let deactivate_backend = app.backend.clone();
    let handle_deactivate = move |id| {
        let Ok(id) = list.write().begin_deactivate(id) else {
            return;
        };
        let backend = deactivate_backend.clone();
        spawn(async move {
            let result = backend.deactivate_lead(id).await;
            let followup = list.write().apply_deactivate(id, result);
            follow_up(followup, list, backend).await;
        });
    };

    let state = list.read();
    let rows: Vec<Lead> = state.visible().into_iter().cloned().collect();
    let editing = state.editing().cloned();
    let saving = state.is_pending(PendingAction::SaveLead);
    let deactivating = state.is_pending(PendingAction::Deactivate);
    let search = state.search().to_string();
    let filter = state.filter();
    let error = state.error().map(str::to_string);
    let loaded = state.is_loaded();
    drop(state);

    rsx! {
        div {
            class: "leads-page",
            h2 { class: "section-title", "Add Leads Form" }
            div {
                class: "lead-form",
                LeadInput { list, field: LeadField::Name, placeholder: "Name" }
                LeadInput { list, field: LeadField::Mobile, placeholder: "Mobile", input_type: "tel" }
                LeadInput { list, field: LeadField::Email, placeholder: "Email", input_type: "email" }
                LeadInput { list, field: LeadField::MeetingDate, input_type: "date" }
                LeadInput { list, field: LeadField::MeetingNotes, placeholder: "Meeting Notes (max 50 characters)" }
                button {
                    class: "btn btn-primary",
                    disabled: saving,
                    onclick: handle_create,
                    "Add Lead"
                }
            }
            if let Some(error) = error {
                p { class: "error-message", "{error}" }
            }

            div {
                class: "leads-toolbar",
                h2 { class: "section-title", "Leads Records" }
                div {
                    class: "leads-filters",
                    input {
                        r#type: "text",
                        placeholder: "Search by Name",
                        value: "{search}",
                        oninput: move |evt: FormEvent| list.write().set_search(evt.value()),
                    }
                    select {
                        value: "{filter}",
                        onchange: move |evt: FormEvent| {
                            match evt.value().parse::<ActivityFilter>() {
                                Ok(filter) => list.write().set_filter(filter),
                                Err(e) => tracing::warn!("{e}"),
                            }
                        },
                        for option_filter in ActivityFilter::ALL {
                            option {
                                key: "{option_filter}",
                                value: "{option_filter}",
                                selected: option_filter == filter,
                                {option_filter.label()}
                            }
                        }
                    }
                }
            }

            if !loaded {
                p { class: "muted", "Loading leads..." }
            }

            table {
                class: "leads-table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Mobile" }
                        th { "Email" }
                        th { "Meeting Date" }
                        th { "Meeting Notes" }
                        th { "Actions" }
                    }
                }
                tbody {
                    for lead in rows {
                        if editing.as_ref().is_some_and(|edit| edit.id == lead.id) {
                            tr {
                                key: "{lead.id}",
                                td { LeadInput { list, field: LeadField::Name, editing: true } }
                                td { LeadInput { list, field: LeadField::Mobile, input_type: "tel", editing: true } }
                                td { LeadInput { list, field: LeadField::Email, input_type: "email", editing: true } }
                                td { LeadInput { list, field: LeadField::MeetingDate, input_type: "date", editing: true } }
                                td { LeadInput { list, field: LeadField::MeetingNotes, editing: true } }
                                td {
                                    button {
                                        class: "btn btn-primary btn-small",
                                        disabled: saving,
                                        onclick: handle_update.clone(),
                                        "Save"
                                    }
                                    button {
                                        class: "btn btn-danger btn-small",
                                        onclick: move |_| list.write().cancel_edit(),
                                        "Cancel"
                                    }
                                }
                            }
                        } else {
                            LeadRow {
                                key: "{lead.id}",
                                lead: lead.clone(),
                                deactivating,
                                on_edit: move |id| {
                                    list.write().start_edit(id);
                                },
                                on_deactivate: handle_deactivate.clone(),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LeadRow(
    lead: Lead,
    deactivating: bool,
    on_edit: EventHandler<api::Id>,
    on_deactivate: EventHandler<api::Id>,
) -> Element {
    let id = lead.id;
    let class = if lead.is_active { "" } else { "inactive" };

    rsx! {
        tr {
            class: "{class}",
            td { "{lead.name}" }
            td { "{lead.mobile}" }
            td { "{lead.email}" }
            td { "{lead.meeting_date}" }
            td { "{lead.meeting_notes}" }
            td {
                if lead.is_active {
                    button {
                        class: "btn btn-primary btn-small",
                        title: "Edit",
                        onclick: move |_| on_edit.call(id),
                        Icon { icon: FaPen, width: 12, height: 12 }
                    }
                    button {
                        class: "btn btn-danger btn-small",
                        title: "Deactivate",
                        disabled: deactivating,
                        onclick: move |_| on_deactivate.call(id),
                        Icon { icon: FaBan, width: 12, height: 12 }
                    }
                } else {
                    span { class: "muted", "Inactive" }
                }
            }
        }
    }
}

/// One field of either the add form or the row being edited.
#[component]
fn LeadInput(
    list: Signal<LeadList>,
    field: LeadField,
    #[props(default = "")] placeholder: &'static str,
    #[props(default = "text")] input_type: &'static str,
    #[props(default)] editing: bool,
) -> Element {
    let value = {
        let state = list.read();
        let form = if editing {
            state.editing().map(|edit| &edit.form)
        } else {
            Some(state.new_lead())
        };
        form.map(|form| form.get(field).to_string()).unwrap_or_default()
    };

    rsx! {
        input {
            r#type: input_type,
            placeholder: placeholder,
            value: "{value}",
            maxlength: if field == LeadField::MeetingNotes { "{MAX_MEETING_NOTES}" },
            oninput: move |evt: FormEvent| {
                let mut list = list;
                if editing {
                    list.write().set_edit_field(field, evt.value());
                } else {
                    list.write().set_new_field(field, evt.value());
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use api::MemoryBackend;
    use dioxus_core::{NoOpMutations, VirtualDom};

    use super::*;

    fn loader_harness() -> Element {
        let backend = use_context::<MemoryBackend>();
        let initial = use_context::<SessionState>();
        let session = use_signal(move || initial);
        let list = use_signal(|| LeadList::new(None));
        let _ = use_lead_loader(list, session, backend);
        use_context::<ListSlot>().set(Some(list));

        let state = list.read();
        let loaded = state.is_loaded();
        let count = state.visible().len();
        rsx! { "{loaded} {count}" }
    }

    type ListSlot = Rc<Cell<Option<Signal<LeadList>>>>;

    async fn settle(dom: &mut VirtualDom) {
        for _ in 0..20 {
            let work = tokio::time::timeout(Duration::from_millis(20), dom.wait_for_work());
            if work.await.is_err() {
                break;
            }
            dom.render_immediate(&mut NoOpMutations);
        }
    }

    #[tokio::test]
    async fn test_loader_fetches_once() {
        let backend = MemoryBackend::new();
        let user = backend.seed_user("Asha", "9876543210", "asha@example.in");
        backend.sign_in(user.id);
        backend.seed_lead(user.id, "Anil", "9123456780", true);
        let expected = vec![format!("GET /users/{}/leads", user.id)];

        let slot = ListSlot::default();
        let mut dom = VirtualDom::new(loader_harness)
            .with_root_context(backend.clone())
            .with_root_context(SessionState::signed_in(user))
            .with_root_context(slot.clone());
        dom.rebuild_in_place();
        settle(&mut dom).await;

        assert_eq!(backend.requests(), expected);
        assert!(dioxus_ssr::render(&dom).contains("true 1"));

        // Typing in the search box re-renders without another request.
        let mut list = slot.get().unwrap();
        dom.in_runtime(|| list.write().set_search("zzz".into()));
        settle(&mut dom).await;

        assert_eq!(backend.requests(), expected);
        assert!(dioxus_ssr::render(&dom).contains("true 0"));
    }

    #[tokio::test]
    async fn test_loader_skips_without_user() {
        let backend = MemoryBackend::new();
        let mut dom = VirtualDom::new(loader_harness)
            .with_root_context(backend.clone())
            .with_root_context(SessionState::signed_out())
            .with_root_context(ListSlot::default());
        dom.rebuild_in_place();
        settle(&mut dom).await;

        assert!(backend.requests().is_empty());
    }

    fn inactive_row() -> Element {
        let lead = Lead {
            id: 3,
            user_id: 1,
            name: "Anil".into(),
            mobile: "9123456780".into(),
            email: String::new(),
            meeting_date: "2025-03-01".into(),
            meeting_notes: String::new(),
            is_active: false,
        };
        rsx! {
            table {
                tbody {
                    LeadRow { lead, deactivating: false, on_edit: |_| {}, on_deactivate: |_| {} }
                }
            }
        }
    }

    #[test]
    fn test_inactive_row_has_no_actions() {
        let mut dom = VirtualDom::new(inactive_row);
        dom.rebuild_in_place();
        let html = dioxus_ssr::render(&dom);

        assert!(html.contains(r#"<tr class="inactive">"#));
        assert!(html.contains("Inactive"));
        assert!(html.contains("Anil"));
        assert!(!html.contains(r#"title="Edit""#));
        assert!(!html.contains(r#"title="Deactivate""#));
    }
}
