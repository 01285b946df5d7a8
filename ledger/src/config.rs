//! JSONBin settings loaded via OrthoConfig.
//!
//! Only the binary reads these; the library takes the resulting
//! [`JsonBinConfig`] explicitly.

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{MutationReadPolicy, UnknownReadPolicy};
use crate::outbound::jsonbin::{CredentialHeader, DEFAULT_BASE_URL, JsonBinConfig, UnknownKeyScheme};

/// Settings read from `JSONBIN_*` environment variables and config files.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JSONBIN")]
pub struct JsonBinSettings {
    /// Access or master key.
    pub access_key: Option<String>,
    /// Bin holding the ledger document.
    pub bin_id: Option<String>,
    /// API root override.
    pub base_url: Option<String>,
    /// `access` (default), `master`, or a custom `X-` header name.
    pub key_scheme: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// `strict` (default) or `best-effort`.
    pub mutation_read_policy: Option<String>,
}

/// Invalid values in [`JsonBinSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The base URL does not parse.
    #[error("invalid base URL '{value}': {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The key scheme is not recognised.
    #[error(transparent)]
    KeyScheme(#[from] UnknownKeyScheme),
    /// The read policy is not recognised.
    #[error(transparent)]
    ReadPolicy(#[from] UnknownReadPolicy),
}

impl JsonBinSettings {
    /// Build the adapter configuration.
    ///
    /// Missing credentials are carried through as `None`; the adapter reports
    /// them when first used.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] for an unparsable base URL or key scheme.
    pub fn to_store_config(&self) -> Result<JsonBinConfig, SettingsError> {
        let raw_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw_url).map_err(|error| SettingsError::InvalidBaseUrl {
            value: raw_url.to_owned(),
            message: error.to_string(),
        })?;
        let header = match self.key_scheme.as_deref() {
            Some(scheme) => scheme.parse::<CredentialHeader>()?,
            None => CredentialHeader::default(),
        };

        let mut config = JsonBinConfig::new(base_url);
        config.credential_header = header.clone();
        if let Some(key) = &self.access_key {
            config = config.with_credential(header, key.clone());
        }
        if let Some(bin_id) = &self.bin_id {
            config = config.with_bin_id(bin_id.clone());
        }
        if let Some(seconds) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(seconds));
        }
        Ok(config)
    }

    /// Read policy for mutating operations.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ReadPolicy`] for an unknown policy name.
    pub fn read_policy(&self) -> Result<MutationReadPolicy, SettingsError> {
        Ok(self
            .mutation_read_policy
            .as_deref()
            .map(str::parse::<MutationReadPolicy>)
            .transpose()?
            .unwrap_or_default())
    }
}

impl fmt::Debug for JsonBinSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonBinSettings")
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("bin_id", &self.bin_id)
            .field("base_url", &self.base_url)
            .field("key_scheme", &self.key_scheme)
            .field("timeout_secs", &self.timeout_secs)
            .field("mutation_read_policy", &self.mutation_read_policy)
            .finish()
    }
}
