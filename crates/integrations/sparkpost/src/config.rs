use serde::{Deserialize, Serialize};

use crate::error::SparkPostError;

/// Path of the Transmissions endpoint, relative to [`SparkPostConfig::api_base_url`].
pub const TRANSMISSIONS_PATH: &str = "/api/v1/transmissions";

/// Process-wide `SparkPost` settings.
///
/// Built once at startup and never mutated afterwards; a single value can be
/// shared by reference across any number of concurrent deliveries.
///
/// # Examples
///
/// ```
/// use courier_sparkpost::SparkPostConfig;
///
/// let config = SparkPostConfig::new("key")
///     .with_track_opens(true)
///     .with_return_path("bounces@example.com");
/// assert!(config.track_opens);
/// assert!(!config.track_clicks);
/// assert_eq!(
///     config.transmissions_url(),
///     "https://api.sparkpost.com/api/v1/transmissions"
/// );
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct SparkPostConfig {
    /// Value of the `Authorization` header, sent as-is (no `Bearer` prefix).
    #[serde(default)]
    pub api_key: String,

    /// API host. Defaults to `https://api.sparkpost.com`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Sets `options.open_tracking` on every transmission.
    #[serde(default)]
    pub track_opens: bool,

    /// Sets `options.click_tracking` on every transmission.
    #[serde(default)]
    pub track_clicks: bool,

    /// Top-level `campaign_id`, omitted when unset.
    #[serde(default)]
    pub campaign_id: Option<String>,

    /// Top-level `return_path`, omitted when unset.
    #[serde(default)]
    pub return_path: Option<String>,

    /// `options.transactional`, omitted when unset.
    #[serde(default)]
    pub transactional: Option<bool>,

    /// `options.sandbox`, omitted when unset.
    #[serde(default)]
    pub sandbox: Option<bool>,

    /// `options.skip_suppression`, omitted when unset.
    #[serde(default)]
    pub skip_suppression: Option<bool>,

    /// `options.inline_css`, omitted when unset.
    #[serde(default)]
    pub inline_css: Option<bool>,

    /// `options.ip_pool`, omitted when unset.
    #[serde(default)]
    pub ip_pool: Option<String>,

    /// Client-side request timeout in seconds. No timeout when unset; zero is rejected.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    "https://api.sparkpost.com".to_owned()
}

impl std::fmt::Debug for SparkPostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparkPostConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("track_opens", &self.track_opens)
            .field("track_clicks", &self.track_clicks)
            .field("campaign_id", &self.campaign_id)
            .field("return_path", &self.return_path)
            .field("transactional", &self.transactional)
            .field("sandbox", &self.sandbox)
            .field("skip_suppression", &self.skip_suppression)
            .field("inline_css", &self.inline_css)
            .field("ip_pool", &self.ip_pool)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for SparkPostConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            track_opens: false,
            track_clicks: false,
            campaign_id: None,
            return_path: None,
            transactional: None,
            sandbox: None,
            skip_suppression: None,
            inline_css: None,
            ip_pool: None,
            timeout_secs: None,
        }
    }
}

impl SparkPostConfig {
    /// Create a configuration with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Override the API host (EU accounts, or a mock server in tests).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Enable or disable open tracking.
    #[must_use]
    pub fn with_track_opens(mut self, enabled: bool) -> Self {
        self.track_opens = enabled;
        self
    }

    /// Enable or disable click tracking.
    #[must_use]
    pub fn with_track_clicks(mut self, enabled: bool) -> Self {
        self.track_clicks = enabled;
        self
    }

    /// Attach a campaign ID to every transmission.
    #[must_use]
    pub fn with_campaign_id(mut self, campaign_id: impl Into<String>) -> Self {
        self.campaign_id = Some(campaign_id.into());
        self
    }

    /// Set the envelope return path of every transmission.
    #[must_use]
    pub fn with_return_path(mut self, return_path: impl Into<String>) -> Self {
        self.return_path = Some(return_path.into());
        self
    }

    /// Mark transmissions as transactional.
    #[must_use]
    pub fn with_transactional(mut self, transactional: bool) -> Self {
        self.transactional = Some(transactional);
        self
    }

    /// Send through the `SparkPost` sandbox domain.
    #[must_use]
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = Some(sandbox);
        self
    }

    /// Ignore the account suppression list.
    #[must_use]
    pub fn with_skip_suppression(mut self, skip: bool) -> Self {
        self.skip_suppression = Some(skip);
        self
    }

    /// Ask `SparkPost` to inline CSS into HTML content.
    #[must_use]
    pub fn with_inline_css(mut self, inline: bool) -> Self {
        self.inline_css = Some(inline);
        self
    }

    /// Route transmissions through a dedicated IP pool.
    #[must_use]
    pub fn with_ip_pool(mut self, ip_pool: impl Into<String>) -> Self {
        self.ip_pool = Some(ip_pool.into());
        self
    }

    /// Apply a client-side request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Full URL of the Transmissions endpoint.
    pub fn transmissions_url(&self) -> String {
        format!(
            "{}{TRANSMISSIONS_PATH}",
            self.api_base_url.trim_end_matches('/')
        )
    }

    /// Check that the configuration can authenticate against `SparkPost`.
    pub fn validate(&self) -> Result<(), SparkPostError> {
        if self.api_key.trim().is_empty() {
            return Err(SparkPostError::Configuration(
                "api_key must not be empty".into(),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(SparkPostError::Configuration(
                "api_base_url must not be empty".into(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(SparkPostError::Configuration(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
