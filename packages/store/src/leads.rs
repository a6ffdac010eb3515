//! # Lead list view-model
//!
//! [`LeadList`] owns the client's cached copy of the signed-in user's leads
//! together with everything the lead page edits locally: the add form, the
//! single inline edit session, search text, activity filter and the current
//! error message.
//!
//! Networked operations come in two halves so a UI can release its state
//! borrow while the request is in flight:
//!
//! | Operation | Begin | Apply | Request |
//! |-----------|-------|-------|---------|
//! | fetch | [`begin_fetch`](LeadList::begin_fetch) | [`apply_fetch`](LeadList::apply_fetch) | `GET /users/{id}/leads` |
//! | create | [`begin_create`](LeadList::begin_create) | [`apply_create`](LeadList::apply_create) | `POST /leads` |
//! | update | [`begin_update`](LeadList::begin_update) | [`apply_update`](LeadList::apply_update) | `PUT /leads/{id}` |
//! | deactivate | [`begin_deactivate`](LeadList::begin_deactivate) | [`apply_deactivate`](LeadList::apply_deactivate) | `PATCH /leads/{id}/deactivate` |
//!
//! `begin_*` validates, claims the pending token and returns the request body.
//! `apply_*` always releases the token. On failure the cached list is left
//! untouched and a fixed message is set. On success the server's record is
//! patched into the cache, or a refetch is requested, depending on
//! [`RefreshPolicy`].
//!
//! The async drivers ([`refresh`](LeadList::refresh), [`create`](LeadList::create),
//! [`update`](LeadList::update), [`deactivate`](LeadList::deactivate)) chain both
//! halves against a [`Backend`].

use api::config::LeadSettings;
use api::{ApiError, Backend, Id, Lead, LeadDraft, RefreshPolicy};

use crate::error::Rejected;
use crate::filter::{filter_leads, ActivityFilter};
use crate::pending::{PendingAction, PendingSet};
use crate::validation::{LeadField, LeadForm, LeadRules};

pub const CREATE_ERROR: &str =
    "Error adding lead, please make sure to enter unique phone numbers";
pub const UPDATE_ERROR: &str =
    "Error updating lead, please make sure to enter unique phone numbers";
pub const DEACTIVATE_ERROR: &str = "Error deactivating lead, please try again.";
pub const FETCH_ERROR: &str = "Error fetching leads, please refresh the page.";

/// What the caller should do after applying a mutation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    Nothing,
    Refetch,
}

/// The row currently in inline-edit mode, keyed by lead id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: Id,
    pub form: LeadForm,
}

/// View-model behind the leads page.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadList {
    owner: Option<Id>,
    leads: Vec<Lead>,
    loaded: bool,
    new_lead: LeadForm,
    editing: Option<EditSession>,
    search: String,
    filter: ActivityFilter,
    error: Option<String>,
    pending: PendingSet,
    rules: LeadRules,
    refresh: RefreshPolicy,
}

impl LeadList {
    pub fn new(owner: Option<Id>) -> Self {
        Self {
            owner,
            leads: Vec::new(),
            loaded: false,
            new_lead: LeadForm::default(),
            editing: None,
            search: String::new(),
            filter: ActivityFilter::default(),
            error: None,
            pending: PendingSet::new(),
            rules: LeadRules::default(),
            refresh: RefreshPolicy::default(),
        }
    }

    /// A list configured from the `[leads]` settings section.
    pub fn from_settings(owner: Option<Id>, settings: &LeadSettings) -> Self {
        Self::new(owner)
            .with_rules(LeadRules {
                mobile_required: settings.mobile_required,
            })
            .with_refresh(settings.refresh)
    }

    pub fn with_rules(mut self, rules: LeadRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn owner(&self) -> Option<Id> {
        self.owner
    }

    /// Switch to another user's list, dropping the cache if the owner changed.
    pub fn set_owner(&mut self, owner: Option<Id>) {
        if self.owner != owner {
            *self = Self::new(owner)
                .with_rules(self.rules)
                .with_refresh(self.refresh);
        }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn lead(&self, id: Id) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    /// Whether at least one fetch has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self, action: PendingAction) -> bool {
        self.pending.is_pending(action)
    }

    // ----- derived list -----

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search;
    }

    pub fn filter(&self) -> ActivityFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: ActivityFilter) {
        self.filter = filter;
    }

    /// Leads to display, recomputed from the cache, search text and filter.
    pub fn visible(&self) -> Vec<&Lead> {
        filter_leads(&self.leads, &self.search, self.filter)
    }

    // ----- add form -----

    pub fn new_lead(&self) -> &LeadForm {
        &self.new_lead
    }

    pub fn set_new_field(&mut self, field: LeadField, value: String) {
        self.new_lead.set(field, value);
        self.error = None;
    }

    // ----- edit mode -----

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, id: Id) -> bool {
        self.editing.as_ref().is_some_and(|e| e.id == id)
    }

    /// Put `id` into edit mode, discarding any other row's unsaved changes.
    /// Inactive leads cannot be edited.
    pub fn start_edit(&mut self, id: Id) -> bool {
        let Some(form) = self
            .lead(id)
            .filter(|l| l.is_active)
            .map(LeadForm::from_lead)
        else {
            return false;
        };
        self.editing = Some(EditSession { id, form });
        self.error = None;
        true
    }

    pub fn set_edit_field(&mut self, field: LeadField, value: String) {
        if let Some(edit) = self.editing.as_mut() {
            edit.form.set(field, value);
            self.error = None;
        }
    }

    /// Leave edit mode without a network call.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.error = None;
    }

    // ----- fetch -----

    /// The owner whose leads should be requested, or `None` if nobody is signed in.
    pub fn begin_fetch(&self) -> Option<Id> {
        if self.owner.is_none() {
            tracing::warn!("Skipping lead fetch: no signed-in user");
        }
        self.owner
    }

    pub fn apply_fetch(&mut self, result: Result<Vec<Lead>, ApiError>) {
        match result {
            Ok(leads) => {
                self.leads = leads;
                self.loaded = true;
                let stale = self
                    .editing
                    .as_ref()
                    .is_some_and(|edit| self.lead(edit.id).is_none());
                if stale {
                    self.editing = None;
                }
            }
            Err(e) => {
                tracing::error!("Error fetching leads: {e}");
                self.error = Some(FETCH_ERROR.to_string());
            }
        }
    }

    // ----- create -----

    pub fn begin_create(&mut self) -> Result<LeadDraft, Rejected> {
        let owner = self.owner.ok_or(Rejected::NoOwner)?;
        if let Err(e) = self.new_lead.validate(self.rules) {
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        self.claim(PendingAction::SaveLead)?;
        self.error = None;
        Ok(self.new_lead.to_draft(owner, true))
    }

    pub fn apply_create(&mut self, result: Result<Lead, ApiError>) -> Followup {
        self.pending.finish(PendingAction::SaveLead);
        match result {
            Ok(lead) => {
                self.new_lead = LeadForm::default();
                self.patch_or_refetch(|leads| leads.push(lead))
            }
            Err(e) => {
                tracing::error!("Error adding lead: {e}");
                self.error = Some(CREATE_ERROR.to_string());
                Followup::Nothing
            }
        }
    }

    // ----- update -----

    pub fn begin_update(&mut self) -> Result<(Id, LeadDraft), Rejected> {
        let owner = self.owner.ok_or(Rejected::NoOwner)?;
        let edit = self.editing.as_ref().ok_or(Rejected::NotEditing)?;
        let is_active = self
            .lead(edit.id)
            .map(|l| l.is_active)
            .ok_or(Rejected::UnknownLead(edit.id))?;
        if let Err(e) = edit.form.validate(self.rules) {
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        let request = (edit.id, edit.form.to_draft(owner, is_active));
        self.claim(PendingAction::SaveLead)?;
        self.error = None;
        Ok(request)
    }

    pub fn apply_update(&mut self, id: Id, result: Result<Lead, ApiError>) -> Followup {
        self.pending.finish(PendingAction::SaveLead);
        match result {
            Ok(lead) => {
                if self.is_editing(id) {
                    self.editing = None;
                }
                self.patch_or_refetch(|leads| replace(leads, lead))
            }
            Err(e) => {
                tracing::error!("Error updating lead {id}: {e}");
                self.error = Some(UPDATE_ERROR.to_string());
                Followup::Nothing
            }
        }
    }

    // ----- deactivate -----

    pub fn begin_deactivate(&mut self, id: Id) -> Result<Id, Rejected> {
        if self.lead(id).is_none() {
            return Err(Rejected::UnknownLead(id));
        }
        self.claim(PendingAction::Deactivate)?;
        Ok(id)
    }

    pub fn apply_deactivate(&mut self, id: Id, result: Result<Lead, ApiError>) -> Followup {
        self.pending.finish(PendingAction::Deactivate);
        match result {
            Ok(lead) => {
                if self.is_editing(id) {
                    self.editing = None;
                }
                self.patch_or_refetch(|leads| replace(leads, lead))
            }
            Err(e) => {
                tracing::error!("Error deactivating lead {id}: {e}");
                self.error = Some(DEACTIVATE_ERROR.to_string());
                Followup::Nothing
            }
        }
    }

    // ----- drivers -----

    /// Fetch the owner's leads. A no-op without an owner.
    pub async fn refresh<B: Backend>(&mut self, backend: &B) {
        if let Some(owner) = self.begin_fetch() {
            let result = backend.list_leads(owner).await;
            self.apply_fetch(result);
        }
    }

    /// Submit the add form.
    pub async fn create<B: Backend>(&mut self, backend: &B) -> Result<(), Rejected> {
        let draft = self.begin_create()?;
        let result = backend.create_lead(&draft).await;
        if self.apply_create(result) == Followup::Refetch {
            self.refresh(backend).await;
        }
        Ok(())
    }

    /// Save the row in edit mode.
    pub async fn update<B: Backend>(&mut self, backend: &B) -> Result<(), Rejected> {
        let (id, draft) = self.begin_update()?;
        let result = backend.update_lead(id, &draft).await;
        if self.apply_update(id, result) == Followup::Refetch {
            self.refresh(backend).await;
        }
        Ok(())
    }

    /// Soft-delete a lead.
    pub async fn deactivate<B: Backend>(&mut self, backend: &B, id: Id) -> Result<(), Rejected> {
        let id = self.begin_deactivate(id)?;
        let result = backend.deactivate_lead(id).await;
        if self.apply_deactivate(id, result) == Followup::Refetch {
            self.refresh(backend).await;
        }
        Ok(())
    }

    fn claim(&mut self, action: PendingAction) -> Result<(), Rejected> {
        if self.pending.try_begin(action) {
            Ok(())
        } else {
            Err(Rejected::Busy(action))
        }
    }

    fn patch_or_refetch(&mut self, patch: impl FnOnce(&mut Vec<Lead>)) -> Followup {
        match self.refresh {
            RefreshPolicy::Patch => {
                patch(&mut self.leads);
                Followup::Nothing
            }
            RefreshPolicy::Refetch => Followup::Refetch,
        }
    }
}

/// Swap `lead` in at the position of the entry with the same id.
fn replace(leads: &mut [Lead], lead: Lead) {
    match leads.iter_mut().find(|l| l.id == lead.id) {
        Some(slot) => *slot = lead,
        None => tracing::warn!("Server returned lead {} that is not cached", lead.id),
    }
}
