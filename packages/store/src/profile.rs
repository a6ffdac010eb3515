//! Profile form: rename, and the two-step account deactivation.

use api::{ApiError, Backend, User};

use crate::error::Rejected;
use crate::pending::{PendingAction, PendingSet};
use crate::validation::FormError;

pub const SAVE_ERROR: &str = "Error saving details, please try again.";
pub const DEACTIVATE_ACCOUNT_ERROR: &str = "Error deactivating account, please try again.";

/// Show only the last four digits of a mobile number.
pub fn mask_mobile(mobile: &str) -> String {
    let count = mobile.chars().count();
    let keep = count.min(4);
    mobile
        .chars()
        .enumerate()
        .map(|(i, c)| if i < count - keep { '*' } else { c })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileForm {
    user: User,
    name: String,
    email: String,
    email_editable: bool,
    confirming_deactivate: bool,
    error: Option<String>,
    pending: PendingSet,
}

impl ProfileForm {
    pub fn new(user: User, email_editable: bool) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            user,
            email_editable,
            confirming_deactivate: false,
            error: None,
            pending: PendingSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn email_editable(&self) -> bool {
        self.email_editable
    }

    pub fn masked_mobile(&self) -> String {
        mask_mobile(&self.user.mobile)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self, action: PendingAction) -> bool {
        self.pending.is_pending(action)
    }

    pub fn is_confirming_deactivate(&self) -> bool {
        self.confirming_deactivate
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.error = None;
    }

    /// Ignored unless the deployment lets users change their email.
    pub fn set_email(&mut self, email: String) {
        if self.email_editable {
            self.email = email;
            self.error = None;
        }
    }

    pub fn begin_save(&mut self) -> Result<User, Rejected> {
        if self.name.trim().is_empty() {
            self.error = Some(FormError::NameRequired.to_string());
            return Err(FormError::NameRequired.into());
        }
        if self.email_editable && self.email.trim().is_empty() {
            self.error = Some(FormError::EmailRequired.to_string());
            return Err(FormError::EmailRequired.into());
        }
        if !self.pending.try_begin(PendingAction::SaveProfile) {
            return Err(Rejected::Busy(PendingAction::SaveProfile));
        }
        self.error = None;
        Ok(User {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.user.clone()
        })
    }

    /// Returns the saved user for the session store.
    pub fn apply_save(&mut self, result: Result<User, ApiError>) -> Option<User> {
        self.pending.finish(PendingAction::SaveProfile);
        match result {
            Ok(user) => {
                self.name = user.name.clone();
                self.email = user.email.clone();
                self.user = user.clone();
                Some(user)
            }
            Err(e) => {
                tracing::error!("Error saving user {}: {e}", self.user.id);
                self.error = Some(SAVE_ERROR.to_string());
                None
            }
        }
    }

    /// First step: show the irreversible-action warning.
    pub fn request_deactivate(&mut self) {
        self.confirming_deactivate = true;
        self.error = None;
    }

    pub fn cancel_deactivate(&mut self) {
        self.confirming_deactivate = false;
    }

    /// Second step. Only valid after [`request_deactivate`](Self::request_deactivate).
    pub fn begin_deactivate(&mut self) -> Result<api::Id, Rejected> {
        if !self.confirming_deactivate {
            return Err(Rejected::OutOfOrder);
        }
        if !self.pending.try_begin(PendingAction::Deactivate) {
            return Err(Rejected::Busy(PendingAction::Deactivate));
        }
        Ok(self.user.id)
    }

    /// Returns true when the account is gone and the session must be cleared.
    pub fn apply_deactivate(&mut self, result: Result<(), ApiError>) -> bool {
        self.pending.finish(PendingAction::Deactivate);
        self.confirming_deactivate = false;
        match result {
            Ok(()) => {
                tracing::info!("Deactivated user {}", self.user.id);
                self.user.is_active = false;
                true
            }
            Err(e) => {
                tracing::error!("Error deactivating user {}: {e}", self.user.id);
                self.error = Some(DEACTIVATE_ACCOUNT_ERROR.to_string());
                false
            }
        }
    }

    pub async fn save<B: Backend>(&mut self, backend: &B) -> Result<Option<User>, Rejected> {
        let user = self.begin_save()?;
        let result = backend.update_user(&user).await;
        Ok(self.apply_save(result))
    }

    pub async fn deactivate<B: Backend>(&mut self, backend: &B) -> Result<bool, Rejected> {
        let id = self.begin_deactivate()?;
        let result = backend.deactivate_user(id).await;
        Ok(self.apply_deactivate(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::MemoryBackend;

    fn signed_in() -> (MemoryBackend, User) {
        let backend = MemoryBackend::new();
        let user = backend.seed_user("Asha", "9876543210", "asha@example.in");
        backend.sign_in(user.id);
        (backend, user)
    }

    #[test]
    fn test_mask_mobile() {
        assert_eq!(mask_mobile("9876543210"), "******3210");
        assert_eq!(mask_mobile("123"), "123");
        assert_eq!(mask_mobile(""), "");
    }

    #[tokio::test]
    async fn test_save_renames() {
        let (backend, user) = signed_in();
        let mut form = ProfileForm::new(user.clone(), false);
        form.set_name("  Asha Rao ".into());
        form.set_email("other@example.in".into());

        let saved = form.save(&backend).await.unwrap().unwrap();
        assert_eq!(saved.name, "Asha Rao");
        // Email is read-only here.
        assert_eq!(saved.email, "asha@example.in");
        assert_eq!(saved.mobile, user.mobile);
        assert_eq!(backend.user(user.id), Some(saved));
    }

    #[tokio::test]
    async fn test_save_failure_keeps_state() {
        let (backend, user) = signed_in();
        let mut form = ProfileForm::new(user.clone(), true);
        form.set_email("new@example.in".into());
        backend.fail_next(ApiError::Transport("offline".into()));

        assert_eq!(form.save(&backend).await, Ok(None));
        assert_eq!(form.error(), Some(SAVE_ERROR));
        assert_eq!(form.email(), "new@example.in");
        assert!(!form.is_pending(PendingAction::SaveProfile));
        assert_eq!(backend.user(user.id), Some(user));
    }

    #[tokio::test]
    async fn test_save_requires_name() {
        let (backend, user) = signed_in();
        let mut form = ProfileForm::new(user, false);
        form.set_name("   ".into());
        assert_eq!(
            form.save(&backend).await,
            Err(Rejected::Invalid(FormError::NameRequired))
        );
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_deactivate_needs_confirmation() {
        let (backend, user) = signed_in();
        let mut form = ProfileForm::new(user.clone(), false);

        assert_eq!(form.deactivate(&backend).await, Err(Rejected::OutOfOrder));
        assert!(backend.requests().is_empty());

        form.request_deactivate();
        form.cancel_deactivate();
        assert!(form.deactivate(&backend).await.is_err());

        form.request_deactivate();
        assert_eq!(form.deactivate(&backend).await, Ok(true));
        assert!(!backend.user(user.id).unwrap().is_active);
        assert_eq!(backend.session(), None);
        assert!(!form.is_confirming_deactivate());
    }

    #[tokio::test]
    async fn test_deactivate_failure_surfaces_message() {
        let (backend, user) = signed_in();
        let mut form = ProfileForm::new(user, false);
        form.request_deactivate();
        backend.fail_next(ApiError::Transport("offline".into()));

        assert_eq!(form.deactivate(&backend).await, Ok(false));
        assert_eq!(form.error(), Some(DEACTIVATE_ACCOUNT_ERROR));
    }
}
