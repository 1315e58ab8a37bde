//! Dashboard configuration
//!
//! Loaded from TOML; every key is optional and falls back to the values
//! the dashboard ships with.
//!
//! ```toml
//! base_id = "appMQ6QuquWCz2uNk"
//! page_size = 20
//!
//! [tables]
//! competitor_pins = "Competitor Pins"
//!
//! [retry]
//! max_retries = 3
//! backoff_ms = 2000
//! ```

use crate::error::{ConfigError, StoreError};
use once_cell::sync::Lazy;
use pinlens_schema::TableKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default remote base
pub const DEFAULT_BASE_ID: &str = "appMQ6QuquWCz2uNk";

/// Default storage key of the bearer credential
pub const DEFAULT_CREDENTIAL_KEY: &str = "pinterest_dashboard_airtable_key";

static BASE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(app[A-Za-z0-9]+)").expect("valid base id pattern"));

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Remote base id, or a pasted URL containing one
    pub base_id: String,
    /// Storage key of the bearer credential
    pub credential_key: String,
    /// Initial page size of every table view
    pub page_size: usize,
    /// Remote table names
    pub tables: TableNames,
    /// Rate-limit retry policy
    pub retry: RetryPolicy,
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base id
    #[inline]
    #[must_use]
    pub fn with_base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = base_id.into();
        self
    }

    /// With credential key
    #[inline]
    #[must_use]
    pub fn with_credential_key(mut self, key: impl Into<String>) -> Self {
        self.credential_key = key.into();
        self
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// With retry policy
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// With remote name for one table
    #[inline]
    #[must_use]
    pub fn with_table_name(mut self, kind: TableKind, name: impl Into<String>) -> Self {
        self.tables.set(kind, name.into());
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`]
    /// when [`DashboardConfig::validate`] fails.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`DashboardConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check values the types cannot enforce
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size must be at least 1"));
        }
        if self.base_id.trim().is_empty() {
            return Err(ConfigError::invalid("base_id must not be empty"));
        }
        if self.credential_key.trim().is_empty() {
            return Err(ConfigError::invalid("credential_key must not be empty"));
        }
        for kind in TableKind::ALL {
            if self.tables.get(kind).trim().is_empty() {
                return Err(ConfigError::invalid(format!("table name for {kind} must not be empty")));
            }
        }
        Ok(())
    }

    /// Base id with any surrounding URL stripped
    ///
    /// Returns the first `app…` token, or the raw value when there is none.
    #[must_use]
    pub fn normalized_base_id(&self) -> &str {
        BASE_ID
            .find(&self.base_id)
            .map_or(self.base_id.trim(), |m| m.as_str())
    }

    /// Remote name of a table
    #[inline]
    #[must_use]
    pub fn table_name(&self, kind: TableKind) -> &str {
        self.tables.get(kind)
    }

    /// Read the bearer credential from the environment
    ///
    /// The variable is the credential key in upper case.
    ///
    /// # Errors
    ///
    /// [`StoreError::MissingCredential`] when unset or blank.
    pub fn credential(&self) -> Result<BearerToken, StoreError> {
        let var = self.credential_key.to_uppercase();
        std::env::var(&var)
            .ok()
            .and_then(|raw| BearerToken::new(raw).ok())
            .ok_or(StoreError::MissingCredential(var))
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_id: DEFAULT_BASE_ID.to_string(),
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
            page_size: pinlens_view::DEFAULT_PAGE_SIZE,
            tables: TableNames::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Remote table names per [`TableKind`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    /// Competitor pins table
    pub competitor_pins: String,
    /// Pin analysis table
    pub pin_analysis: String,
    /// Intelligence reports table
    pub competitor_intelligence: String,
    /// Content queue table
    pub content_queue: String,
}

impl TableNames {
    /// Name for one table
    #[must_use]
    pub fn get(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::CompetitorPins => &self.competitor_pins,
            TableKind::PinAnalysis => &self.pin_analysis,
            TableKind::CompetitorIntelligence => &self.competitor_intelligence,
            TableKind::ContentQueue => &self.content_queue,
        }
    }

    /// Replace the name for one table
    pub fn set(&mut self, kind: TableKind, name: String) {
        let slot = match kind {
            TableKind::CompetitorPins => &mut self.competitor_pins,
            TableKind::PinAnalysis => &mut self.pin_analysis,
            TableKind::CompetitorIntelligence => &mut self.competitor_intelligence,
            TableKind::ContentQueue => &mut self.content_queue,
        };
        *slot = name;
    }

    /// Table kind with this remote name, if any
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<TableKind> {
        TableKind::ALL.into_iter().find(|kind| self.get(*kind) == name)
    }
}

impl Default for TableNames {
    fn default() -> Self {
        let name = |kind: TableKind| kind.schema().remote_name().to_string();
        Self {
            competitor_pins: name(TableKind::CompetitorPins),
            pin_analysis: name(TableKind::PinAnalysis),
            competitor_intelligence: name(TableKind::CompetitorIntelligence),
            content_queue: name(TableKind::ContentQueue),
        }
    }
}

/// Rate-limit retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Consecutive retries per page
    pub max_retries: u32,
    /// Sleep between retries, in milliseconds
    pub backoff_ms: u64,
}

impl RetryPolicy {
    /// Sleep between retries
    #[inline]
    #[must_use]
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_ms: 2000,
        }
    }
}

/// Bearer credential for the record store
///
/// `Debug` and `Display` never show the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a credential, trimming whitespace
    ///
    /// # Errors
    ///
    /// [`StoreError::MissingCredential`] for a blank value.
    pub fn new(raw: impl Into<String>) -> Result<Self, StoreError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StoreError::MissingCredential("credential".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// `Authorization` header value
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// The raw secret
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
