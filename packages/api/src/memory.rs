use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::backend::Backend;
use crate::error::ApiError;
use crate::models::{
    Id, Lead, LeadDraft, LoginOutcome, LoginRequest, OtpRequest, User, INACTIVE_USER_MESSAGE,
};

/// Code accepted by [`MemoryBackend`] for every OTP it "dispatches".
pub const DEV_OTP: &str = "123456";

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    leads: Vec<Lead>,
    session: Option<Id>,
    otp_issued: HashSet<String>,
    next_id: Id,
    requests: Vec<String>,
    fail_next: Option<ApiError>,
    require_captcha: bool,
}

impl State {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, request: String) -> Result<(), ApiError> {
        self.requests.push(request);
        match self.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn require_session(&self) -> Result<Id, ApiError> {
        self.session.ok_or(ApiError::Unauthenticated)
    }

    fn duplicate_mobile(&self, user_id: Id, mobile: &str, except: Option<Id>) -> bool {
        !mobile.is_empty()
            && self
                .leads
                .iter()
                .any(|l| l.user_id == user_id && l.mobile == mobile && Some(l.id) != except)
    }
}

fn duplicate_error() -> ApiError {
    ApiError::Status {
        status: 409,
        message: Some("A lead with this mobile number already exists".to_string()),
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: None,
    }
}

/// In-memory [`Backend`] for tests and offline development.
///
/// Mirrors the server contract: duplicate mobiles per user are rejected with 409,
/// users are created on first verification, inactive accounts get the
/// `{message: "User is inactive"}` notice, and deactivation is idempotent.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject OTP dispatch without a CAPTCHA token.
    pub fn with_captcha_required(self) -> Self {
        self.state.lock().unwrap().require_captcha = true;
        self
    }

    /// Insert an account directly, bypassing the OTP flow.
    pub fn seed_user(&self, name: &str, mobile: &str, email: &str) -> User {
        let mut state = self.state.lock().unwrap();
        let user = User {
            id: state.next_id(),
            name: name.to_string(),
            mobile: mobile.to_string(),
            email: email.to_string(),
            is_active: true,
        };
        state.users.push(user.clone());
        user
    }

    /// Insert a lead directly for `user_id`.
    pub fn seed_lead(&self, user_id: Id, name: &str, mobile: &str, is_active: bool) -> Lead {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let lead = LeadDraft {
            user_id,
            name: name.to_string(),
            mobile: mobile.to_string(),
            email: String::new(),
            meeting_date: "2025-03-01".to_string(),
            meeting_notes: String::new(),
            is_active,
        }
        .into_lead(id);
        state.leads.push(lead.clone());
        lead
    }

    /// Pretend the browser already holds a session cookie for `user_id`.
    pub fn sign_in(&self, user_id: Id) {
        self.state.lock().unwrap().session = Some(user_id);
    }

    pub fn session(&self) -> Option<Id> {
        self.state.lock().unwrap().session
    }

    pub fn user(&self, id: Id) -> Option<User> {
        let state = self.state.lock().unwrap();
        state.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn lead(&self, id: Id) -> Option<Lead> {
        let state = self.state.lock().unwrap();
        state.leads.iter().find(|l| l.id == id).cloned()
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.state.lock().unwrap().fail_next = Some(error);
    }

    /// Every request received so far, as `"METHOD /path"`.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Backend for MemoryBackend {
    async fn list_leads(&self, user_id: Id) -> Result<Vec<Lead>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record(format!("GET /users/{user_id}/leads"))?;
        state.require_session()?;
        Ok(state
            .leads
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_lead(&self, draft: &LeadDraft) -> Result<Lead, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record("POST /leads".to_string())?;
        state.require_session()?;
        if state.duplicate_mobile(draft.user_id, &draft.mobile, None) {
            return Err(duplicate_error());
        }
        let id = state.next_id();
        let lead = draft.clone().into_lead(id);
        state.leads.push(lead.clone());
        Ok(lead)
    }

    async fn update_lead(&self, id: Id, draft: &LeadDraft) -> Result<Lead, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record(format!("PUT /leads/{id}"))?;
        state.require_session()?;
        if state.duplicate_mobile(draft.user_id, &draft.mobile, Some(id)) {
            return Err(duplicate_error());
        }
        let slot = state
            .leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(not_found)?;
        *slot = draft.clone().into_lead(id);
        Ok(slot.clone())
    }

    async fn deactivate_lead(&self, id: Id) -> Result<Lead, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record(format!("PATCH /leads/{id}/deactivate"))?;
        state.require_session()?;
        let lead = state
            .leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(not_found)?;
        lead.is_active = false;
        Ok(lead.clone())
    }

    async fn send_otp(&self, request: &OtpRequest) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record("POST /users/send-otp".to_string())?;
        if state.require_captcha && request.recaptcha_token.is_none() {
            return Err(ApiError::Status {
                status: 400,
                message: Some("reCAPTCHA verification failed".to_string()),
            });
        }
        state.otp_issued.insert(request.mobile.clone());
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record("POST /users/login".to_string())?;
        if !state.otp_issued.contains(&request.mobile) || request.otp != DEV_OTP {
            return Err(ApiError::Status {
                status: 400,
                message: Some("Invalid OTP".to_string()),
            });
        }
        state.otp_issued.remove(&request.mobile);

        let existing = state
            .users
            .iter()
            .find(|u| u.mobile == request.mobile)
            .cloned();
        let user = match existing {
            Some(user) => user,
            None => {
                let user = User {
                    id: state.next_id(),
                    name: String::new(),
                    mobile: request.mobile.clone(),
                    email: request.email.clone(),
                    is_active: true,
                };
                state.users.push(user.clone());
                user
            }
        };

        if !user.is_active {
            return Ok(LoginOutcome::Inactive(INACTIVE_USER_MESSAGE.to_string()));
        }
        state.session = Some(user.id);
        Ok(LoginOutcome::Active(user))
    }

    async fn check_session(&self) -> Result<Option<User>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record("GET /users/auth/check".to_string())?;
        let Some(id) = state.session else {
            return Ok(None);
        };
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record("GET /users/logout".to_string())?;
        state.session = None;
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<User, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record(format!("PUT /users/{}", user.id))?;
        state.require_session()?;
        let slot = state
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(not_found)?;
        *slot = user.clone();
        Ok(slot.clone())
    }

    async fn deactivate_user(&self, id: Id) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.record(format!("PATCH /users/{id}/deactivate"))?;
        state.require_session()?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(not_found)?;
        user.is_active = false;
        if state.session == Some(id) {
            state.session = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(user_id: Id, name: &str, mobile: &str) -> LeadDraft {
        LeadDraft {
            user_id,
            name: name.to_string(),
            mobile: mobile.to_string(),
            email: String::new(),
            meeting_date: "2025-03-01".to_string(),
            meeting_notes: String::new(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_otp_login_creates_user_and_session() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.check_session().await.unwrap(), None);

        backend
            .send_otp(&OtpRequest {
                email: "asha@example.in".into(),
                mobile: "9876543210".into(),
                recaptcha_token: None,
            })
            .await
            .unwrap();
        let outcome = backend
            .login(&LoginRequest {
                email: "asha@example.in".into(),
                mobile: "9876543210".into(),
                otp: DEV_OTP.into(),
            })
            .await
            .unwrap();

        let LoginOutcome::Active(user) = outcome else {
            panic!("expected an active login");
        };
        assert_eq!(user.mobile, "9876543210");
        assert_eq!(backend.check_session().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_wrong_otp_is_rejected() {
        let backend = MemoryBackend::new();
        backend
            .send_otp(&OtpRequest {
                email: String::new(),
                mobile: "9876543210".into(),
                recaptcha_token: None,
            })
            .await
            .unwrap();
        let err = backend
            .login(&LoginRequest {
                email: String::new(),
                mobile: "9876543210".into(),
                otp: "000000".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(backend.session(), None);
    }

    #[tokio::test]
    async fn test_captcha_required() {
        let backend = MemoryBackend::new().with_captcha_required();
        let request = OtpRequest {
            email: String::new(),
            mobile: "9876543210".into(),
            recaptcha_token: None,
        };
        assert!(backend.send_otp(&request).await.is_err());
        let request = OtpRequest {
            recaptcha_token: Some("token".into()),
            ..request
        };
        assert!(backend.send_otp(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_mobile_per_user() {
        let backend = MemoryBackend::new();
        let asha = backend.seed_user("Asha", "9876543210", "");
        let ravi = backend.seed_user("Ravi", "9123456780", "");
        backend.sign_in(asha.id);

        backend.create_lead(&draft(asha.id, "A", "9000000001")).await.unwrap();
        let err = backend
            .create_lead(&draft(asha.id, "B", "9000000001"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));

        // Same number under a different owner is fine.
        backend.create_lead(&draft(ravi.id, "C", "9000000001")).await.unwrap();
        assert_eq!(backend.list_leads(asha.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deactivate_is_idempotent() {
        let backend = MemoryBackend::new();
        let user = backend.seed_user("Asha", "9876543210", "");
        backend.sign_in(user.id);
        let lead = backend.seed_lead(user.id, "Lead", "9000000001", true);

        assert!(!backend.deactivate_lead(lead.id).await.unwrap().is_active);
        assert!(!backend.deactivate_lead(lead.id).await.unwrap().is_active);
        assert_eq!(backend.list_leads(user.id).await.unwrap().len(), 1);

        backend.deactivate_user(user.id).await.unwrap();
        backend.sign_in(user.id);
        backend.deactivate_user(user.id).await.unwrap();
        assert!(!backend.user(user.id).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_inactive_user_login_gets_notice() {
        let backend = MemoryBackend::new();
        let user = backend.seed_user("Asha", "9876543210", "");
        backend.sign_in(user.id);
        backend.deactivate_user(user.id).await.unwrap();

        backend
            .send_otp(&OtpRequest {
                email: String::new(),
                mobile: "9876543210".into(),
                recaptcha_token: None,
            })
            .await
            .unwrap();
        let outcome = backend
            .login(&LoginRequest {
                email: String::new(),
                mobile: "9876543210".into(),
                otp: DEV_OTP.into(),
            })
            .await
            .unwrap();
        assert_eq!(outcome, LoginOutcome::Inactive(INACTIVE_USER_MESSAGE.into()));
        assert_eq!(backend.session(), None);
    }

    #[tokio::test]
    async fn test_fail_next_only_fails_once() {
        let backend = MemoryBackend::new();
        backend.fail_next(ApiError::Transport("offline".into()));
        assert!(backend.check_session().await.is_err());
        assert!(backend.check_session().await.is_ok());
        assert_eq!(
            backend.requests(),
            vec!["GET /users/auth/check", "GET /users/auth/check"]
        );
    }
}
