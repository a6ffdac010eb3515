//! # API crate: the leads backend contract
//!
//! Everything the frontends need to talk to the REST backend: wire models, the
//! [`Backend`] trait with one method per endpoint, a reqwest implementation
//! ([`HttpBackend`]) and an in-process one ([`MemoryBackend`]) for tests and
//! offline development.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `User`, `Lead`, request bodies, login outcome |
//! | [`config`] | `leads.toml` / compile-time environment configuration |
//! | [`error`] | [`ApiError`] |
//!
//! ## Endpoints
//!
//! | Method | Path | [`Backend`] method |
//! |--------|------|--------------------|
//! | GET | `/users/{userId}/leads` | `list_leads` |
//! | POST | `/leads` | `create_lead` |
//! | PUT | `/leads/{id}` | `update_lead` |
//! | PATCH | `/leads/{id}/deactivate` | `deactivate_lead` |
//! | POST | `/users/send-otp` | `send_otp` |
//! | POST | `/users/login` | `login` |
//! | GET | `/users/auth/check` | `check_session` |
//! | GET | `/users/logout` | `logout` |
//! | PUT | `/users/{id}` | `update_user` |
//! | PATCH | `/users/{id}/deactivate` | `deactivate_user` |

mod backend;
pub mod config;
pub mod error;
mod http;
mod memory;
pub mod models;

pub use backend::Backend;
pub use config::{AppConfig, RefreshPolicy};
pub use error::ApiError;
pub use http::HttpBackend;
pub use memory::{MemoryBackend, DEV_OTP};
pub use models::{Id, Lead, LeadDraft, LoginOutcome, LoginRequest, OtpRequest, User};
