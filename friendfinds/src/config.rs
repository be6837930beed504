//! Store connection settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_TABLE: &str = "recommendations";
const REST_PATH: &str = "rest/v1";

/// Problems with loaded settings that only show up when they are used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// No store URL was configured.
    #[error("FRIENDFINDS_STORE_URL is not set")]
    MissingStoreUrl,
    /// The store URL does not parse or cannot carry a path.
    #[error("invalid store url `{url}`: {reason}")]
    InvalidStoreUrl {
        /// Configured value.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// No API key was configured.
    #[error("FRIENDFINDS_API_KEY is not set")]
    MissingApiKey,
}

/// Configuration for reaching the hosted recommendation table.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FRIENDFINDS")]
pub struct StoreSettings {
    /// Base URL of the hosted project, e.g. `https://abc.supabase.co`.
    pub store_url: Option<String>,
    /// Public API key sent in the `apikey` header.
    pub api_key: Option<String>,
    /// Table name override.
    pub table: Option<String>,
    /// Request timeout in seconds.
    #[ortho_config(default = 10)]
    pub timeout_secs: u64,
}

impl StoreSettings {
    /// Return the configured table, falling back to the default.
    pub fn table(&self) -> &str {
        self.table
            .as_deref()
            .map(str::trim)
            .filter(|table| !table.is_empty())
            .unwrap_or(DEFAULT_TABLE)
    }

    /// Return the request timeout, never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Return the API key.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingApiKey`] when it is unset or blank.
    pub fn api_key(&self) -> Result<&str, SettingsError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingApiKey)
    }

    /// Row endpoint `{store_url}/rest/v1/{table}`.
    ///
    /// # Errors
    ///
    /// Returns an error when the store URL is unset, does not parse, or
    /// cannot be a base for paths.
    pub fn endpoint(&self) -> Result<Url, SettingsError> {
        let raw = self
            .store_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingStoreUrl)?;
        let invalid = |reason: String| SettingsError::InvalidStoreUrl {
            url: raw.to_owned(),
            reason,
        };
        let mut endpoint = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
        endpoint
            .path_segments_mut()
            .map_err(|()| invalid("url cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(REST_PATH.split('/'))
            .push(self.table());
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for store configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 4] = [
        "FRIENDFINDS_STORE_URL",
        "FRIENDFINDS_API_KEY",
        "FRIENDFINDS_TABLE",
        "FRIENDFINDS_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> StoreSettings {
        StoreSettings::load_from_iter([OsString::from("friendfinds")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.table(), DEFAULT_TABLE);
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert_eq!(settings.endpoint(), Err(SettingsError::MissingStoreUrl));
        assert_eq!(settings.api_key(), Err(SettingsError::MissingApiKey));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FRIENDFINDS_STORE_URL", Some("https://abc.example.co/".to_owned())),
            ("FRIENDFINDS_API_KEY", Some("anon".to_owned())),
            ("FRIENDFINDS_TABLE", Some("picks".to_owned())),
            ("FRIENDFINDS_TIMEOUT_SECS", Some("3".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.endpoint().map(String::from),
            Ok("https://abc.example.co/rest/v1/picks".to_owned())
        );
        assert_eq!(settings.api_key(), Ok("anon"));
        assert_eq!(settings.timeout(), Duration::from_secs(3));
    }

    #[rstest]
    #[case::not_a_url("abc.example.co")]
    #[case::cannot_be_base("mailto:ops@example.co")]
    fn malformed_store_urls_are_rejected(#[case] raw: &str) {
        let settings = StoreSettings {
            store_url: Some(raw.to_owned()),
            api_key: None,
            table: None,
            timeout_secs: 10,
        };

        assert!(matches!(
            settings.endpoint(),
            Err(SettingsError::InvalidStoreUrl { .. })
        ));
    }

    #[rstest]
    fn zero_timeout_is_raised_to_one_second() {
        let settings = StoreSettings {
            store_url: None,
            api_key: None,
            table: Some("  ".to_owned()),
            timeout_secs: 0,
        };

        assert_eq!(settings.timeout(), Duration::from_secs(1));
        assert_eq!(settings.table(), DEFAULT_TABLE);
    }
}
