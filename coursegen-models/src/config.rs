//! Client configuration.
//!
//! The only required setting is the API key. Everything else has a default
//! and can be overridden from the environment or with `with_*` methods.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `COURSEGEN_API_KEY` (or `OPENAI_API_KEY`) | required |
//! | `COURSEGEN_BASE_URL` | `https://api.openai.com/v1` |
//! | `COURSEGEN_MODEL` | `gpt-4o` |
//! | `COURSEGEN_IMAGE_MODEL` | `dall-e-3` |
//! | `COURSEGEN_TIMEOUT_SECS` | `120` |
//! | `COURSEGEN_APP_URL` | unset |
//! | `COURSEGEN_APP_TITLE` | `coursegen` |

use crate::error::ModelError;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default completion endpoint base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Default value of the `X-Title` header.
pub const DEFAULT_APP_TITLE: &str = "coursegen";

const API_KEY_VARS: [&str; 2] = ["COURSEGEN_API_KEY", "OPENAI_API_KEY"];

/// Settings shared by the completion and image clients.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: Url,
    model: String,
    image_model: String,
    timeout: Duration,
    app_url: Option<String>,
    app_title: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .field("app_url", &self.app_url)
            .field("app_title", &self.app_title)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with the given API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            model: DEFAULT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            app_url: None,
            app_title: Some(DEFAULT_APP_TITLE.to_string()),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// A missing API key is a configuration error.
    pub fn from_env() -> Result<Self, ModelError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ModelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = API_KEY_VARS.iter().find_map(|&var| get(var)).ok_or_else(|| {
            ModelError::configuration(
                "COURSEGEN_API_KEY (or OPENAI_API_KEY) environment variable not set",
            )
        })?;

        let mut config = Self::new(api_key);

        if let Some(url) = get("COURSEGEN_BASE_URL") {
            config = config.with_base_url(&url)?;
        }
        if let Some(model) = get("COURSEGEN_MODEL") {
            config = config.with_model(model);
        }
        if let Some(model) = get("COURSEGEN_IMAGE_MODEL") {
            config = config.with_image_model(model);
        }
        if let Some(secs) = get("COURSEGEN_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ModelError::configuration(format!("COURSEGEN_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(app_url) = get("COURSEGEN_APP_URL") {
            config = config.with_app_url(app_url);
        }
        if let Some(title) = get("COURSEGEN_APP_TITLE") {
            config = config.with_app_title(title);
        }

        Ok(config)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ModelError> {
        let parsed = Url::parse(url)
            .map_err(|e| ModelError::configuration(format!("invalid base URL '{url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ModelError::configuration(format!(
                "base URL must be http(s): {url}"
            )));
        }
        self.base_url = parsed;
        Ok(self)
    }

    /// Set the completion model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the image model.
    #[must_use]
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `HTTP-Referer` header value.
    #[must_use]
    pub fn with_app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = Some(url.into());
        self
    }

    /// Set the `X-Title` header value.
    #[must_use]
    pub fn with_app_title(mut self, title: impl Into<String>) -> Self {
        self.app_title = Some(title.into());
        self
    }

    /// The API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The completion model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The image model.
    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The `HTTP-Referer` header value.
    pub fn app_url(&self) -> Option<&str> {
        self.app_url.as_deref()
    }

    /// The `X-Title` header value.
    pub fn app_title(&self) -> Option<&str> {
        self.app_title.as_deref()
    }

    /// Full URL of an endpoint below the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}
