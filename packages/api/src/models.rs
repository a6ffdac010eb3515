//! # Wire models for the leads backend
//!
//! These are the JSON shapes exchanged with the REST backend. They are
//! `Serialize + Deserialize + PartialEq` so they can be cached in UI signals and
//! compared in tests.
//!
//! | Type | Direction | Purpose |
//! |------|-----------|---------|
//! | [`User`] | both | The signed-in account. Soft-deactivated via `is_active`. |
//! | [`Lead`] | response | A contact with a scheduled meeting, owned by one user. |
//! | [`LeadDraft`] | request | Body of `POST /leads` and `PUT /leads/{id}`. |
//! | [`OtpRequest`] | request | Body of `POST /users/send-otp`. |
//! | [`LoginRequest`] | request | Body of `POST /users/login`. |
//! | [`LoginOutcome`] | response | Either an active user or the inactive-account notice. |

use serde::{Deserialize, Serialize};

/// Numeric identifier used by the backend for users and leads.
pub type Id = i64;

/// Message the backend returns instead of a user when the account is deactivated.
pub const INACTIVE_USER_MESSAGE: &str = "User is inactive";

fn default_true() -> bool {
    true
}

/// A signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl User {
    /// Name to show in the navbar, falling back to the mobile number.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.mobile
        } else {
            &self.name
        }
    }
}

/// A lead as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Id,
    #[serde(alias = "userId")]
    pub user_id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    /// `YYYY-MM-DD`, as produced by a date input.
    #[serde(default)]
    pub meeting_date: String,
    #[serde(default)]
    pub meeting_notes: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Lead fields sent on create and update, tagged with the owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDraft {
    #[serde(rename = "userId")]
    pub user_id: Id,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub meeting_date: String,
    pub meeting_notes: String,
    pub is_active: bool,
}

impl LeadDraft {
    /// Materialise the draft as a stored lead with the given id.
    pub fn into_lead(self, id: Id) -> Lead {
        Lead {
            id,
            user_id: self.user_id,
            name: self.name,
            mobile: self.mobile,
            email: self.email,
            meeting_date: self.meeting_date,
            meeting_notes: self.meeting_notes,
            is_active: self.is_active,
        }
    }
}

/// Identity plus CAPTCHA proof, submitted to dispatch an OTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRequest {
    pub email: String,
    pub mobile: String,
    #[serde(rename = "recaptchaToken")]
    pub recaptcha_token: Option<String>,
}

/// Identity plus the code the user received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub mobile: String,
    pub otp: String,
}

/// Raw body of `POST /users/login`: a user, or a `{message}` notice.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum LoginPayload {
    User(User),
    Notice { message: String },
}

/// Result of a successful verify call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The account is active; a session has been established.
    Active(User),
    /// The code was accepted but the account is deactivated.
    Inactive(String),
}

impl From<LoginPayload> for LoginOutcome {
    fn from(payload: LoginPayload) -> Self {
        match payload {
            LoginPayload::User(user) if user.is_active => LoginOutcome::Active(user),
            LoginPayload::User(_) => LoginOutcome::Inactive(INACTIVE_USER_MESSAGE.to_string()),
            LoginPayload::Notice { message } => LoginOutcome::Inactive(message),
        }
    }
}
