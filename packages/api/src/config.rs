//! # Application configuration (`leads.toml`)
//!
//! Every section is optional; a missing or empty file is equivalent to
//! [`AppConfig::default`].
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3000/api"
//!
//! [captcha]
//! enabled = true
//! site_key = "6Lc..."
//!
//! [login]
//! require_email = true
//!
//! [leads]
//! mobile_required = false
//! refresh = "patch"       # or "refetch"
//!
//! [profile]
//! email_editable = false
//! ```
//!
//! The web entry point bundles its `leads.toml` at compile time and hands it
//! to [`AppConfig::load`]. Browser builds have no process environment, so
//! `load` also reads `LEADS_API_BASE_URL`, `LEADS_CAPTCHA_SITE_KEY` and
//! `LEADS_CAPTCHA_ENABLED` at compile time.

use serde::{Deserialize, Serialize};

/// Backend origin used by debug builds.
pub const LOCAL_API_BASE_URL: &str = "http://localhost:3000/api";
/// Backend origin used by release builds.
pub const PRODUCTION_API_BASE_URL: &str = "https://leadsapp.vsagrawal.in/api";

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub captcha: CaptchaSettings,
    #[serde(default)]
    pub login: LoginSettings,
    #[serde(default)]
    pub leads: LeadSettings,
    #[serde(default)]
    pub profile: ProfileSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    if cfg!(debug_assertions) {
        LOCAL_API_BASE_URL.to_string()
    } else {
        PRODUCTION_API_BASE_URL.to_string()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// CAPTCHA gate in front of OTP dispatch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptchaSettings {
    /// When false, OTP dispatch needs no CAPTCHA proof.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub site_key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginSettings {
    /// Collect an email address alongside the mobile number.
    #[serde(default = "default_true")]
    pub require_email: bool,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            require_email: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadSettings {
    #[serde(default)]
    pub mobile_required: bool,
    #[serde(default)]
    pub refresh: RefreshPolicy,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// Let users change their email from the profile page. Mobile is always read-only.
    #[serde(default)]
    pub email_editable: bool,
}

/// How the cached lead list catches up with the server after a mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// Replace or append the server-returned record in place.
    #[default]
    Patch,
    /// Fetch the whole list again.
    Refetch,
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "leads.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Parse the bundled config file, then overlay the compile-time environment.
    ///
    /// A file that fails to parse is logged and replaced by the defaults.
    pub fn load(bundled: &str) -> Self {
        let config = Self::from_toml(bundled).unwrap_or_else(|e| {
            tracing::error!("Ignoring invalid {}: {e}", Self::filename());
            Self::default()
        });
        config.with_overrides(
            option_env!("LEADS_API_BASE_URL"),
            option_env!("LEADS_CAPTCHA_SITE_KEY"),
            option_env!("LEADS_CAPTCHA_ENABLED"),
        )
    }

    fn with_overrides(
        mut self,
        base_url: Option<&str>,
        site_key: Option<&str>,
        captcha_enabled: Option<&str>,
    ) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(key) = site_key.filter(|k| !k.trim().is_empty()) {
            self.captcha.site_key = key.trim().to_string();
            self.captcha.enabled = true;
        }
        match captcha_enabled.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "false" || v == "0" || v == "off" => self.captcha.enabled = false,
            Some(v) if v == "true" || v == "1" || v == "on" => self.captcha.enabled = true,
            Some(v) => tracing::warn!("Ignoring LEADS_CAPTCHA_ENABLED={v}"),
            None => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.captcha.enabled);
        assert!(config.login.require_email);
        assert_eq!(config.leads.refresh, RefreshPolicy::Patch);
    }

    #[test]
    fn test_debug_default_points_at_localhost() {
        if cfg!(debug_assertions) {
            assert_eq!(AppConfig::default().api.base_url, LOCAL_API_BASE_URL);
        }
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [captcha]
            enabled = true
            site_key = "site"

            [leads]
            refresh = "refetch"
            "#,
        )
        .unwrap();
        assert!(config.captcha.enabled);
        assert_eq!(config.captcha.site_key, "site");
        assert_eq!(config.leads.refresh, RefreshPolicy::Refetch);
        assert!(!config.leads.mobile_required);
        assert!(!config.profile.email_editable);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("https://example.test/api"),
            Some("key"),
            None,
        );
        assert_eq!(config.api.base_url, "https://example.test/api");
        assert!(config.captcha.enabled);

        let config = config.with_overrides(None, None, Some("off"));
        assert!(!config.captcha.enabled);
        assert_eq!(config.captcha.site_key, "key");
    }

    #[test]
    fn test_load_falls_back_on_invalid_file() {
        let config = AppConfig::load("[leads]\nrefresh = \"sometimes\"\n");
        assert_eq!(config.leads.refresh, RefreshPolicy::Patch);
        assert!(config.login.require_email);

        let config = AppConfig::load("[profile]\nemail_editable = true\n");
        assert!(config.profile.email_editable);
    }
}
