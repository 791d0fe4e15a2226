// ============================
// crates/authgate/src/config.rs
// ============================
//! Configuration management.
use std::time::Duration;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Signing secret shipped for development. Tokens signed with it are
/// forgeable by anyone who has read this source file.
pub const DEV_SIGNING_SECRET: &str = "authgate-dev-secret-do-not-deploy";

/// Access token lifetime: one hour.
const DEFAULT_ACCESS_TTL_SECS: u64 = 60 * 60;
/// Refresh token lifetime: seven days.
const DEFAULT_REFRESH_TTL_SECS: u64 = 60 * 60 * 24 * 7;
/// Default scrypt work factor (log2 of the CPU/memory cost parameter).
const DEFAULT_HASH_LOG_N: u8 = 15;

/// Application settings, read-only after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Extra fields every signup request must carry.
    pub user_fields: Vec<String>,
    /// Record fields projected into token claims. `identifier` is always
    /// included regardless of this list.
    pub jwt_fields: Vec<String>,
    /// HMAC secret signing both token kinds.
    pub signing_secret: String,
    /// Access token TTL in seconds
    pub access_ttl_secs: u64,
    /// Refresh token TTL in seconds
    pub refresh_ttl_secs: u64,
    /// scrypt work factor (log2 N)
    pub hash_log_n: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_fields: Vec::new(),
            jwt_fields: vec!["identifier".to_string()],
            signing_secret: DEV_SIGNING_SECRET.to_string(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
            hash_log_n: DEFAULT_HASH_LOG_N,
        }
    }
}

impl Settings {
    /// Load settings from `authgate.toml` and `AUTHGATE_`-prefixed
    /// environment variables, merged onto the shipped defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("authgate.toml")
    }

    /// Load settings from an explicit TOML path plus the environment.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("AUTHGATE_"))
            .extract()?;

        Ok(settings)
    }

    /// Whether the signing secret is still the development placeholder.
    pub fn uses_dev_secret(&self) -> bool {
        self.signing_secret == DEV_SIGNING_SECRET
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_secs)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_windows() {
        let settings = Settings::default();
        assert_eq!(settings.access_ttl(), Duration::from_secs(3600));
        assert_eq!(settings.refresh_ttl(), Duration::from_secs(7 * 24 * 3600));
        assert_eq!(settings.jwt_fields, vec!["identifier".to_string()]);
        assert!(settings.user_fields.is_empty());
        assert!(settings.uses_dev_secret());
    }

    #[test]
    fn overridden_secret_is_not_flagged_as_dev() {
        let settings = Settings {
            signing_secret: "a-real-deployment-secret".to_string(),
            ..Settings::default()
        };
        assert!(!settings.uses_dev_secret());
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from("does-not-exist.toml").unwrap();
        assert_eq!(settings.access_ttl_secs, 3600);
    }
}
