//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod auth;
pub use auth::{use_app, use_auth, AppContext, AuthProvider, LogoutButton};

mod captcha;
pub use captcha::Captcha;

mod footer;
pub use footer::Footer;

mod leads_view;
pub use leads_view::LeadsView;

mod navbar;
pub use navbar::Navbar;

mod otp_login;
pub use otp_login::OtpLogin;

mod profile_view;
pub use profile_view::ProfileView;

mod terms;
pub use terms::Terms;
