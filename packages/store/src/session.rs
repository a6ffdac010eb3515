//! Tab-wide session state and the route guard decision.

use api::{ApiError, Backend, User};

/// The signed-in user, if any. `loading` stays true until the initial session
/// check has answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub loading: bool,
}

/// What a guarded route should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    Render,
    RedirectToLogin,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    /// A resolved session with no user.
    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<api::Id> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }

    /// While loading nothing is decided, regardless of `user`.
    pub fn guard(&self) -> GuardDecision {
        if self.loading {
            GuardDecision::Loading
        } else if self.user.is_some() {
            GuardDecision::Render
        } else {
            GuardDecision::RedirectToLogin
        }
    }

    /// Settle the initial session check. Any failure counts as signed out.
    pub fn resolve(&mut self, result: Result<Option<User>, ApiError>) {
        self.user = match result {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("Error checking session: {e}");
                None
            }
        };
        self.loading = false;
    }

    pub fn login(&mut self, user: User) {
        *self = Self::signed_in(user);
    }

    /// Replace the stored user after a profile save.
    pub fn update_user(&mut self, user: User) {
        if self.user_id() != Some(user.id) {
            tracing::warn!("Ignoring profile update for user {} outside the session", user.id);
            return;
        }
        self.user = Some(user);
    }

    pub fn clear(&mut self) {
        *self = Self::signed_out();
    }
}

/// Ask the backend who the current cookie belongs to.
pub async fn load_session<B: Backend>(backend: &B) -> SessionState {
    let mut state = SessionState::default();
    state.resolve(backend.check_session().await);
    state
}

/// End the session on the server and locally. Local state is cleared even
/// when the server call fails.
pub async fn logout<B: Backend>(backend: &B, session: &mut SessionState) {
    if let Err(e) = backend.logout().await {
        tracing::error!("Error logging out: {e}");
    }
    session.clear();
}
