pub mod error;
pub mod filter;
pub mod leads;
pub mod login;
pub mod pending;
pub mod profile;
pub mod session;
pub mod validation;

pub use error::Rejected;
pub use filter::{filter_leads, ActivityFilter};
pub use leads::{EditSession, Followup, LeadList};
pub use login::{CaptchaState, LoginStage, OtpFlow};
pub use pending::{PendingAction, PendingSet};
pub use profile::{mask_mobile, ProfileForm};
pub use session::{load_session, logout, GuardDecision, SessionState};
pub use validation::{is_valid_mobile, FormError, LeadField, LeadForm, LeadRules};
