//! Reasons a view-model refuses to start a request.

use api::Id;
use thiserror::Error;

use crate::pending::PendingAction;
use crate::validation::FormError;

/// Why a `begin_*` call produced no request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error(transparent)]
    Invalid(#[from] FormError),
    #[error("{0} already in progress")]
    Busy(PendingAction),
    #[error("no signed-in user")]
    NoOwner,
    #[error("no lead is being edited")]
    NotEditing,
    #[error("unknown lead {0}")]
    UnknownLead(Id),
    #[error("not available at this step")]
    OutOfOrder,
}
