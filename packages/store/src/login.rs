//! # OTP login state machine
//!
//! ```text
//! collecting-identity --send ok--> otp-sent --verify active--> authenticated
//!                                      |
//!                                      +--verify inactive--> inactive-account
//! ```
//!
//! Identity is validated before any request: the mobile must match the
//! 10-digit pattern, the email must be present when the deployment collects it,
//! and the CAPTCHA must be solved when the gate is enabled. Send and verify
//! failures stay in place with a message; nothing is retried automatically.
//!
//! CAPTCHA tokens are single-use, so the widget is reset after every send and
//! every verify attempt. [`OtpFlow::captcha_generation`] changes on each reset
//! so the UI can remount the widget.

use api::config::AppConfig;
use api::{ApiError, Backend, LoginOutcome, LoginRequest, OtpRequest, User};

use crate::error::Rejected;
use crate::pending::{PendingAction, PendingSet};
use crate::validation::{is_valid_mobile, FormError};

pub const SEND_ERROR: &str = "Failed to send OTP. Please try again.";
pub const VERIFY_ERROR: &str = "An error occurred while verifying OTP.";
pub const INACTIVE_ACCOUNT: &str =
    "Your account is inactive. Please contact support to reactivate it.";

/// Where the login flow currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStage {
    CollectingIdentity,
    OtpSent,
    Authenticated(User),
    InactiveAccount,
}

/// Progress of the CAPTCHA precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptchaState {
    /// The gate is switched off for this deployment.
    Disabled,
    Unsolved,
    Solved(String),
}

impl CaptchaState {
    fn token(&self) -> Option<String> {
        match self {
            CaptchaState::Solved(token) => Some(token.clone()),
            _ => None,
        }
    }
}

/// View-model behind the login page.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpFlow {
    stage: LoginStage,
    mobile: String,
    email: String,
    otp: String,
    require_email: bool,
    captcha: CaptchaState,
    captcha_generation: u32,
    error: Option<String>,
    pending: PendingSet,
}

impl OtpFlow {
    pub fn new(require_email: bool, captcha_enabled: bool) -> Self {
        Self {
            stage: LoginStage::CollectingIdentity,
            mobile: String::new(),
            email: String::new(),
            otp: String::new(),
            require_email,
            captcha: if captcha_enabled {
                CaptchaState::Unsolved
            } else {
                CaptchaState::Disabled
            },
            captcha_generation: 0,
            error: None,
            pending: PendingSet::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.login.require_email, config.captcha.enabled)
    }

    pub fn stage(&self) -> &LoginStage {
        &self.stage
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn otp(&self) -> &str {
        &self.otp
    }

    pub fn requires_email(&self) -> bool {
        self.require_email
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self, action: PendingAction) -> bool {
        self.pending.is_pending(action)
    }

    pub fn captcha(&self) -> &CaptchaState {
        &self.captcha
    }

    pub fn captcha_generation(&self) -> u32 {
        self.captcha_generation
    }

    /// Whether the "Send OTP" control may be pressed.
    pub fn can_send(&self) -> bool {
        self.pending.is_idle()
            && !matches!(self.captcha, CaptchaState::Unsolved)
            && self.accepts_identity()
    }

    fn accepts_identity(&self) -> bool {
        matches!(
            self.stage,
            LoginStage::CollectingIdentity | LoginStage::OtpSent
        )
    }

    /// Whether the "Verify OTP & Login" control may be pressed.
    pub fn can_verify(&self) -> bool {
        self.pending.is_idle() && self.stage == LoginStage::OtpSent
    }

    pub fn set_mobile(&mut self, mobile: String) {
        self.mobile = mobile;
        self.error = None;
    }

    pub fn set_email(&mut self, email: String) {
        self.email = email;
        self.error = None;
    }

    pub fn set_otp(&mut self, otp: String) {
        self.otp = otp;
        self.error = None;
    }

    /// Record the token the CAPTCHA widget produced. An empty token means it expired.
    pub fn set_captcha_token(&mut self, token: String) {
        if self.captcha == CaptchaState::Disabled {
            return;
        }
        self.captcha = if token.is_empty() {
            CaptchaState::Unsolved
        } else {
            CaptchaState::Solved(token)
        };
        self.error = None;
    }

    fn reset_captcha(&mut self) {
        if self.captcha != CaptchaState::Disabled {
            self.captcha = CaptchaState::Unsolved;
            self.captcha_generation = self.captcha_generation.wrapping_add(1);
        }
    }

    /// Go back to identity entry, e.g. to use a different number.
    pub fn restart(&mut self) {
        self.stage = LoginStage::CollectingIdentity;
        self.otp.clear();
        self.error = None;
        self.reset_captcha();
    }

    fn validate_identity(&self) -> Result<(), FormError> {
        if !is_valid_mobile(self.mobile.trim()) {
            return Err(FormError::InvalidMobile);
        }
        if self.require_email && self.email.trim().is_empty() {
            return Err(FormError::EmailRequired);
        }
        if self.captcha == CaptchaState::Unsolved {
            return Err(FormError::CaptchaRequired);
        }
        Ok(())
    }

    // ----- send -----

    pub fn begin_send(&mut self) -> Result<OtpRequest, Rejected> {
        if !self.accepts_identity() {
            return Err(Rejected::OutOfOrder);
        }
        if self.pending.is_pending(PendingAction::VerifyOtp) {
            return Err(Rejected::Busy(PendingAction::VerifyOtp));
        }
        if let Err(e) = self.validate_identity() {
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        if !self.pending.try_begin(PendingAction::SendOtp) {
            return Err(Rejected::Busy(PendingAction::SendOtp));
        }
        self.error = None;
        Ok(OtpRequest {
            email: self.email.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
            recaptcha_token: self.captcha.token(),
        })
    }

    pub fn apply_send(&mut self, result: Result<(), ApiError>) {
        self.pending.finish(PendingAction::SendOtp);
        self.reset_captcha();
        match result {
            Ok(()) if self.accepts_identity() => {
                self.stage = LoginStage::OtpSent;
                self.otp.clear();
            }
            Ok(()) => {
                tracing::warn!("Ignoring OTP send that finished after login completed");
            }
            Err(e) => {
                tracing::error!("Error sending OTP: {e}");
                self.error = Some(SEND_ERROR.to_string());
            }
        }
    }

    // ----- verify -----

    pub fn begin_verify(&mut self) -> Result<LoginRequest, Rejected> {
        if self.stage != LoginStage::OtpSent {
            return Err(Rejected::OutOfOrder);
        }
        if self.otp.trim().is_empty() {
            self.error = Some(FormError::OtpRequired.to_string());
            return Err(FormError::OtpRequired.into());
        }
        if self.pending.is_pending(PendingAction::SendOtp) {
            return Err(Rejected::Busy(PendingAction::SendOtp));
        }
        if !self.pending.try_begin(PendingAction::VerifyOtp) {
            return Err(Rejected::Busy(PendingAction::VerifyOtp));
        }
        self.error = None;
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
            otp: self.otp.trim().to_string(),
        })
    }

    /// Returns the signed-in user when the session was established.
    pub fn apply_verify(&mut self, result: Result<LoginOutcome, ApiError>) -> Option<User> {
        self.pending.finish(PendingAction::VerifyOtp);
        self.reset_captcha();
        match result {
            Ok(LoginOutcome::Active(user)) => {
                tracing::info!("Signed in as user {}", user.id);
                self.stage = LoginStage::Authenticated(user.clone());
                Some(user)
            }
            Ok(LoginOutcome::Inactive(message)) => {
                tracing::warn!("Login refused: {message}");
                self.stage = LoginStage::InactiveAccount;
                self.error = Some(INACTIVE_ACCOUNT.to_string());
                None
            }
            Err(e) => {
                tracing::error!("Error verifying OTP: {e}");
                self.error = Some(VERIFY_ERROR.to_string());
                None
            }
        }
    }

    // ----- drivers -----

    pub async fn send<B: Backend>(&mut self, backend: &B) -> Result<(), Rejected> {
        let request = self.begin_send()?;
        let result = backend.send_otp(&request).await;
        self.apply_send(result);
        Ok(())
    }

    pub async fn verify<B: Backend>(&mut self, backend: &B) -> Result<Option<User>, Rejected> {
        let request = self.begin_verify()?;
        let result = backend.login(&request).await;
        Ok(self.apply_verify(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{MemoryBackend, DEV_OTP};

    fn identity(flow: &mut OtpFlow) {
        flow.set_mobile("9876543210".into());
        flow.set_email("asha@example.in".into());
    }

    #[tokio::test]
    async fn test_happy_path() {
        let backend = MemoryBackend::new();
        let mut flow = OtpFlow::new(true, false);
        identity(&mut flow);

        flow.send(&backend).await.unwrap();
        assert_eq!(flow.stage(), &LoginStage::OtpSent);

        flow.set_otp(DEV_OTP.into());
        let user = flow.verify(&backend).await.unwrap().unwrap();
        assert_eq!(user.mobile, "9876543210");
        assert_eq!(flow.stage(), &LoginStage::Authenticated(user));
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn test_identity_validated_before_request() {
        let backend = MemoryBackend::new();
        let mut flow = OtpFlow::new(true, false);

        flow.set_mobile("5876543210".into());
        assert_eq!(
            flow.send(&backend).await,
            Err(Rejected::Invalid(FormError::InvalidMobile))
        );

        flow.set_mobile("9876543210".into());
        assert_eq!(
            flow.send(&backend).await,
            Err(Rejected::Invalid(FormError::EmailRequired))
        );
        assert_eq!(flow.error(), Some("Email is mandatory."));
        assert!(backend.requests().is_empty());

        // Deployments that do not collect email only need the mobile.
        let mut flow = OtpFlow::new(false, false);
        flow.set_mobile("9876543210".into());
        assert!(flow.send(&backend).await.is_ok());
    }

    #[tokio::test]
    async fn test_captcha_gates_send_and_resets_after_each_attempt() {
        let backend = MemoryBackend::new().with_captcha_required();
        let mut flow = OtpFlow::new(true, true);
        identity(&mut flow);
        assert!(!flow.can_send());
        assert_eq!(
            flow.send(&backend).await,
            Err(Rejected::Invalid(FormError::CaptchaRequired))
        );

        flow.set_captcha_token("token-1".into());
        assert!(flow.can_send());
        flow.send(&backend).await.unwrap();
        assert_eq!(flow.stage(), &LoginStage::OtpSent);
        assert_eq!(flow.captcha(), &CaptchaState::Unsolved);
        let generation = flow.captcha_generation();

        flow.set_otp("000000".into());
        assert_eq!(flow.verify(&backend).await, Ok(None));
        assert_eq!(flow.error(), Some(VERIFY_ERROR));
        assert_eq!(flow.stage(), &LoginStage::OtpSent);
        // A failed verify needs a fresh CAPTCHA before resending.
        assert_eq!(flow.captcha(), &CaptchaState::Unsolved);
        assert_ne!(flow.captcha_generation(), generation);
        assert!(!flow.can_send());
    }

    #[tokio::test]
    async fn test_inactive_account_stays_unauthenticated() {
        let backend = MemoryBackend::new();
        let user = backend.seed_user("Asha", "9876543210", "asha@example.in");
        backend.sign_in(user.id);
        backend.deactivate_user(user.id).await.unwrap();

        let mut flow = OtpFlow::new(true, false);
        identity(&mut flow);
        flow.send(&backend).await.unwrap();
        flow.set_otp(DEV_OTP.into());

        assert_eq!(flow.verify(&backend).await, Ok(None));
        assert_eq!(flow.stage(), &LoginStage::InactiveAccount);
        assert_eq!(flow.error(), Some(INACTIVE_ACCOUNT));
        assert_eq!(backend.session(), None);
        assert!(!flow.can_send());
        assert!(!flow.can_verify());
        assert_eq!(flow.send(&backend).await, Err(Rejected::OutOfOrder));
    }

    #[tokio::test]
    async fn test_send_failure_stays_put() {
        let backend = MemoryBackend::new();
        backend.fail_next(ApiError::Transport("offline".into()));
        let mut flow = OtpFlow::new(true, false);
        identity(&mut flow);

        flow.send(&backend).await.unwrap();
        assert_eq!(flow.stage(), &LoginStage::CollectingIdentity);
        assert_eq!(flow.error(), Some(SEND_ERROR));
        assert!(!flow.is_pending(PendingAction::SendOtp));
    }

    #[test]
    fn test_verify_requires_code_and_single_flight() {
        let mut flow = OtpFlow::new(false, false);
        assert_eq!(flow.begin_verify(), Err(Rejected::OutOfOrder));

        flow.set_mobile("9876543210".into());
        flow.begin_send().unwrap();
        assert_eq!(
            flow.begin_send(),
            Err(Rejected::Busy(PendingAction::SendOtp))
        );
        flow.apply_send(Ok(()));

        assert_eq!(
            flow.begin_verify(),
            Err(Rejected::Invalid(FormError::OtpRequired))
        );
        flow.set_otp("123456".into());
        flow.begin_verify().unwrap();
        assert!(!flow.can_verify());
        assert!(!flow.can_send());
        assert_eq!(
            flow.begin_verify(),
            Err(Rejected::Busy(PendingAction::VerifyOtp))
        );
        assert_eq!(
            flow.begin_send(),
            Err(Rejected::Busy(PendingAction::VerifyOtp))
        );
    }

    #[test]
    fn test_verify_waits_for_resend() {
        let mut flow = OtpFlow::new(false, false);
        flow.set_mobile("9876543210".into());
        flow.begin_send().unwrap();
        flow.apply_send(Ok(()));
        flow.set_otp("123456".into());

        // Resend in flight
        flow.begin_send().unwrap();
        assert!(!flow.can_verify());
        assert_eq!(
            flow.begin_verify(),
            Err(Rejected::Busy(PendingAction::SendOtp))
        );
        assert!(!flow.is_pending(PendingAction::VerifyOtp));

        flow.apply_send(Ok(()));
        assert!(flow.can_verify());
        assert!(flow.begin_verify().is_ok());
    }

    #[test]
    fn test_late_send_keeps_completed_login() {
        let user = User {
            id: 7,
            name: "Asha".into(),
            mobile: "9876543210".into(),
            email: "asha@example.in".into(),
            is_active: true,
        };
        let mut flow = OtpFlow::new(false, false);
        flow.set_mobile("9876543210".into());
        flow.begin_send().unwrap();
        flow.apply_send(Ok(()));
        flow.set_otp("123456".into());
        flow.begin_verify().unwrap();
        flow.apply_verify(Ok(LoginOutcome::Active(user.clone())));

        flow.apply_send(Ok(()));
        assert_eq!(flow.stage(), &LoginStage::Authenticated(user));
        assert_eq!(flow.otp(), "123456");
    }

    #[test]
    fn test_restart_returns_to_identity() {
        let mut flow = OtpFlow::new(false, false);
        flow.set_mobile("9876543210".into());
        flow.begin_send().unwrap();
        flow.apply_send(Ok(()));
        flow.set_otp("1234".into());

        flow.restart();
        assert_eq!(flow.stage(), &LoginStage::CollectingIdentity);
        assert_eq!(flow.otp(), "");
        assert_eq!(flow.mobile(), "9876543210");
    }
}
