//! reqwest-backed [`Backend`] implementation.
//!
//! Sessions are carried by a cookie the backend issues; the client never stores
//! credentials itself. In the browser every request is sent with
//! `credentials: "include"` so the cookie rides along cross-origin. Native builds
//! keep the cookie in reqwest's jar instead.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::backend::Backend;
use crate::error::ApiError;
use crate::models::{
    Id, Lead, LeadDraft, LoginOutcome, LoginPayload, LoginRequest, OtpRequest, User,
    INACTIVE_USER_MESSAGE,
};

/// HTTP client for the leads backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = Client::builder().cookie_store(true).build()?;
        #[cfg(target_arch = "wasm32")]
        let client = Client::new();

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        let builder = self.client.request(method, self.url(path));
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();
        builder
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = error_message(response).await;
        Err(status_error(status.as_u16(), message))
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pull `message` out of a JSON error body, if there is one.
async fn error_message(response: Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body.get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

fn status_error(status: u16, message: Option<String>) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthenticated,
        _ => ApiError::Status { status, message },
    }
}

fn is_inactive_notice(message: Option<&str>) -> bool {
    message.is_some_and(|m| m.eq_ignore_ascii_case(INACTIVE_USER_MESSAGE))
}

impl Backend for HttpBackend {
    async fn list_leads(&self, user_id: Id) -> Result<Vec<Lead>, ApiError> {
        Self::send_json(self.request(Method::GET, &format!("/users/{user_id}/leads"))).await
    }

    async fn create_lead(&self, draft: &LeadDraft) -> Result<Lead, ApiError> {
        Self::send_json(self.request(Method::POST, "/leads").json(draft)).await
    }

    async fn update_lead(&self, id: Id, draft: &LeadDraft) -> Result<Lead, ApiError> {
        Self::send_json(self.request(Method::PUT, &format!("/leads/{id}")).json(draft)).await
    }

    async fn deactivate_lead(&self, id: Id) -> Result<Lead, ApiError> {
        Self::send_json(self.request(Method::PATCH, &format!("/leads/{id}/deactivate"))).await
    }

    async fn send_otp(&self, request: &OtpRequest) -> Result<(), ApiError> {
        Self::send(self.request(Method::POST, "/users/send-otp").json(request)).await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, ApiError> {
        let response = self
            .request(Method::POST, "/users/login")
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            // Some deployments reject inactive accounts with 403 + the notice.
            let message = error_message(response).await;
            if is_inactive_notice(message.as_deref()) {
                return Ok(LoginOutcome::Inactive(INACTIVE_USER_MESSAGE.to_string()));
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let payload: LoginPayload = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(payload.into())
    }

    async fn check_session(&self) -> Result<Option<User>, ApiError> {
        match Self::send_json::<User>(self.request(Method::GET, "/users/auth/check")).await {
            Ok(user) => Ok(Some(user)),
            Err(ApiError::Unauthenticated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Self::send(self.request(Method::GET, "/users/logout")).await?;
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<User, ApiError> {
        Self::send_json(self.request(Method::PUT, &format!("/users/{}", user.id)).json(user)).await
    }

    async fn deactivate_user(&self, id: Id) -> Result<(), ApiError> {
        Self::send(self.request(Method::PATCH, &format!("/users/{id}/deactivate"))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let backend = HttpBackend::new("http://localhost:3000/api/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:3000/api");
        assert_eq!(
            backend.url("/leads/7/deactivate"),
            "http://localhost:3000/api/leads/7/deactivate"
        );
        assert_eq!(
            backend.url("users/3/leads"),
            "http://localhost:3000/api/users/3/leads"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        assert_eq!(status_error(401, None), ApiError::Unauthenticated);
        assert_eq!(status_error(403, None), ApiError::Unauthenticated);
        assert_eq!(
            status_error(409, Some("duplicate".into())),
            ApiError::Status {
                status: 409,
                message: Some("duplicate".into())
            }
        );
    }

    #[test]
    fn test_inactive_notice() {
        assert!(is_inactive_notice(Some("User is inactive")));
        assert!(is_inactive_notice(Some("user is INACTIVE")));
        assert!(!is_inactive_notice(Some("Invalid OTP")));
        assert!(!is_inactive_notice(None));
    }
}
