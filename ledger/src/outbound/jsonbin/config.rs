//! Connection settings for the JSONBin adapter.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

/// Public JSONBin v3 API root.
pub const DEFAULT_BASE_URL: &str = "https://api.jsonbin.io/v3";

/// Header used to present the credential.
///
/// JSONBin accepts a scoped access key (`X-Access-Key`) or the account master
/// key (`X-Master-Key`); both work for reading and writing one bin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CredentialHeader {
    /// `X-Access-Key`.
    #[default]
    AccessKey,
    /// `X-Master-Key`.
    MasterKey,
    /// Any other header name.
    Custom(String),
}

impl CredentialHeader {
    /// HTTP header name carrying the credential.
    pub fn header_name(&self) -> &str {
        match self {
            Self::AccessKey => "X-Access-Key",
            Self::MasterKey => "X-Master-Key",
            Self::Custom(name) => name.as_str(),
        }
    }
}

/// Error returned for an unrecognised credential scheme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key scheme '{0}', expected 'access', 'master', or an X- header name")]
pub struct UnknownKeyScheme(String);

impl FromStr for CredentialHeader {
    type Err = UnknownKeyScheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "access" | "access-key" | "x-access-key" => Ok(Self::AccessKey),
            "master" | "master-key" | "x-master-key" => Ok(Self::MasterKey),
            lowered if lowered.starts_with("x-") && lowered.len() > 2 => {
                Ok(Self::Custom(trimmed.to_owned()))
            }
            _ => Err(UnknownKeyScheme(value.to_owned())),
        }
    }
}

/// Explicit adapter configuration.
///
/// The credential and bin id are optional so a partially configured store can
/// still be built; the adapter reports what is missing on first use.
#[derive(Clone)]
pub struct JsonBinConfig {
    /// Header strategy for the credential.
    pub credential_header: CredentialHeader,
    /// Access or master key.
    pub credential: Option<Zeroizing<String>>,
    /// Identifier of the bin holding the ledger document.
    pub bin_id: Option<String>,
    /// API root, `https://api.jsonbin.io/v3` by default.
    pub base_url: Url,
    /// Per-request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

impl JsonBinConfig {
    /// Configuration against `base_url` with nothing else set.
    pub fn new(base_url: Url) -> Self {
        Self {
            credential_header: CredentialHeader::default(),
            credential: None,
            bin_id: None,
            base_url,
            timeout: None,
        }
    }

    /// Configuration against the public API root with nothing else set.
    ///
    /// # Errors
    ///
    /// Returns the parse error if [`DEFAULT_BASE_URL`] is not a valid URL.
    pub fn try_default() -> Result<Self, url::ParseError> {
        Url::parse(DEFAULT_BASE_URL).map(Self::new)
    }

    /// Set the credential and the header that carries it.
    #[must_use]
    pub fn with_credential(mut self, header: CredentialHeader, value: impl Into<String>) -> Self {
        self.credential_header = header;
        self.credential = Some(Zeroizing::new(value.into()));
        self
    }

    /// Set the bin identifier.
    #[must_use]
    pub fn with_bin_id(mut self, bin_id: impl Into<String>) -> Self {
        self.bin_id = Some(bin_id.into());
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Names of required settings that are absent or blank.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self
            .credential
            .as_ref()
            .is_none_or(|value| value.trim().is_empty())
        {
            missing.push("credential");
        }
        if self
            .bin_id
            .as_deref()
            .is_none_or(|value| value.trim().is_empty())
        {
            missing.push("bin id");
        }
        missing
    }
}

impl fmt::Debug for JsonBinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonBinConfig")
            .field("credential_header", &self.credential_header)
            .field(
                "credential",
                &self.credential.as_ref().map(|_| "<redacted>"),
            )
            .field("bin_id", &self.bin_id)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}
