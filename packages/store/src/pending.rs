//! In-flight tokens, one per action class.
//!
//! A control whose action is pending is rendered disabled, and a second `begin`
//! of the same class is refused until the first one is applied.

use std::collections::HashSet;
use std::fmt;

/// Networked actions that must not be submitted twice concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingAction {
    SendOtp,
    VerifyOtp,
    SaveLead,
    SaveProfile,
    Deactivate,
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PendingAction::SendOtp => "send-otp",
            PendingAction::VerifyOtp => "verify-otp",
            PendingAction::SaveLead => "save-lead",
            PendingAction::SaveProfile => "save-profile",
            PendingAction::Deactivate => "deactivate",
        };
        f.write_str(name)
    }
}

/// Set of actions currently awaiting a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSet {
    active: HashSet<PendingAction>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `action`. Returns false if it is already in flight.
    pub fn try_begin(&mut self, action: PendingAction) -> bool {
        let claimed = self.active.insert(action);
        if !claimed {
            tracing::debug!("Ignoring duplicate {action} while one is in flight");
        }
        claimed
    }

    /// Release `action`; called on every outcome.
    pub fn finish(&mut self, action: PendingAction) {
        self.active.remove(&action);
    }

    pub fn is_pending(&self, action: PendingAction) -> bool {
        self.active.contains(&action)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }
}
