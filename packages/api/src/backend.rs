//! The REST surface the client consumes, as an async trait.
//!
//! [`crate::HttpBackend`] talks to the real server; [`crate::MemoryBackend`]
//! keeps everything in process for tests and offline development.

use std::future::Future;

use crate::error::ApiError;
use crate::models::{Id, Lead, LeadDraft, LoginOutcome, LoginRequest, OtpRequest, User};

/// Async interface over the leads backend.
pub trait Backend {
    /// `GET /users/{user_id}/leads`
    fn list_leads(&self, user_id: Id) -> impl Future<Output = Result<Vec<Lead>, ApiError>>;

    /// `POST /leads`
    fn create_lead(&self, draft: &LeadDraft) -> impl Future<Output = Result<Lead, ApiError>>;

    /// `PUT /leads/{id}`
    fn update_lead(
        &self,
        id: Id,
        draft: &LeadDraft,
    ) -> impl Future<Output = Result<Lead, ApiError>>;

    /// `PATCH /leads/{id}/deactivate`
    fn deactivate_lead(&self, id: Id) -> impl Future<Output = Result<Lead, ApiError>>;

    /// `POST /users/send-otp`
    fn send_otp(&self, request: &OtpRequest) -> impl Future<Output = Result<(), ApiError>>;

    /// `POST /users/login`
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginOutcome, ApiError>>;

    /// `GET /users/auth/check`. `Ok(None)` means there is no session.
    fn check_session(&self) -> impl Future<Output = Result<Option<User>, ApiError>>;

    /// `GET /users/logout`
    fn logout(&self) -> impl Future<Output = Result<(), ApiError>>;

    /// `PUT /users/{id}`
    fn update_user(&self, user: &User) -> impl Future<Output = Result<User, ApiError>>;

    /// `PATCH /users/{id}/deactivate`
    fn deactivate_user(&self, id: Id) -> impl Future<Output = Result<(), ApiError>>;
}
