//! # Storefront Configuration
//!
//! Configuration for the backend connection, user-facing messages and display.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Load Order (later overrides earlier)                  │
//! │                                                                         │
//! │  1. Defaults (this file)                                               │
//! │  2. storefront.toml (explicit path, or the platform config dir)        │
//! │  3. Environment: STOREFRONT_API_URL, STOREFRONT_TIMEOUT_SECS,          │
//! │                  STOREFRONT_LOCALE                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! base_url = "https://api.example.com/"
//! cart_path = "/carrinho"
//! checkout_path = "/carrinho"
//! timeout_secs = 30
//!
//! [messages]
//! locale = "pt-br"   # en | pt-br
//! # fetch_error = "custom text"
//! # checkout_error = "custom text"
//!
//! [display]
//! currency_symbol = "R$"
//! decimal_separator = ","
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use storefront_core::Money;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "STOREFRONT_API_URL";
/// Environment variable overriding `api.timeout_secs`.
pub const ENV_TIMEOUT_SECS: &str = "STOREFRONT_TIMEOUT_SECS";
/// Environment variable overriding `messages.locale`.
pub const ENV_LOCALE: &str = "STOREFRONT_LOCALE";

/// Backend path serving both the cart read and the checkout submit.
pub const DEFAULT_CART_PATH: &str = "/carrinho";

// =============================================================================
// Locale
// =============================================================================

/// Language for the advisory messages shown after a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,

    #[serde(rename = "pt-br")]
    PtBr,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::PtBr => write!(f, "pt-br"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "pt" | "pt-br" => Ok(Locale::PtBr),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown locale: '{}'. Valid options: en, pt-br",
                other
            ))),
        }
    }
}

// =============================================================================
// Messages
// =============================================================================

/// The two advisory strings the store can surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    /// Shown when loading the cart fails.
    pub fetch_error: String,
    /// Shown when submitting checkout fails.
    pub checkout_error: String,
}

impl Messages {
    /// Built-in messages for a locale.
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Messages {
                fetch_error: "items could not be retrieved, try again later.".to_string(),
                checkout_error: "the order could not be completed, try again.".to_string(),
            },
            Locale::PtBr => Messages {
                fetch_error: "Não foi possível obter os itens, tente novamente mais tarde"
                    .to_string(),
                checkout_error: "Não foi possível finalizar o pedido, tente novamente".to_string(),
            },
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Messages::for_locale(Locale::default())
    }
}

/// `[messages]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageSettings {
    /// Language of the built-in messages.
    #[serde(default)]
    pub locale: Locale,

    /// Replaces the built-in fetch failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,

    /// Replaces the built-in checkout failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_error: Option<String>,
}

impl MessageSettings {
    /// Resolves locale defaults and explicit overrides into final messages.
    pub fn resolve(&self) -> Messages {
        let mut messages = Messages::for_locale(self.locale);
        if let Some(ref text) = self.fetch_error {
            messages.fetch_error = text.clone();
        }
        if let Some(ref text) = self.checkout_error {
            messages.checkout_error = text.clone();
        }
        messages
    }
}

// =============================================================================
// API Settings
// =============================================================================

/// `[api]` section: where and how to reach the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path for reading the cart (GET).
    #[serde(default = "default_cart_path")]
    pub cart_path: String,

    /// Path for submitting checkout (POST).
    #[serde(default = "default_cart_path")]
    pub checkout_path: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_cart_path() -> String {
    DEFAULT_CART_PATH.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            cart_path: default_cart_path(),
            checkout_path: default_cart_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parses the base URL.
    pub fn parsed_base_url(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(url)
    }
}

// =============================================================================
// Display Settings
// =============================================================================

/// `[display]` section: how amounts are rendered for people.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

impl DisplaySettings {
    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_client::config::DisplaySettings;
    /// use storefront_core::Money;
    ///
    /// let display = DisplaySettings {
    ///     currency_symbol: "R$".into(),
    ///     decimal_separator: ",".into(),
    /// };
    /// assert_eq!(display.format_money(Money::from_cents(990)), "R$ 9,90");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let space = if self.currency_symbol.chars().count() > 1 { " " } else { "" };

        format!(
            "{}{}{}{}{}{:02}",
            sign,
            self.currency_symbol,
            space,
            amount.units().abs(),
            self.decimal_separator,
            amount.cents_part()
        )
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub messages: MessageSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl StorefrontConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.api.parsed_base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        for (name, path) in [
            ("cart_path", &self.api.cart_path),
            ("checkout_path", &self.api.checkout_path),
        ] {
            if !path.starts_with('/') {
                return Err(ClientError::InvalidConfig(format!(
                    "{} must start with '/', got: {}",
                    name, path
                )));
            }
        }

        Ok(())
    }

    /// Returns the resolved advisory messages.
    pub fn messages(&self) -> Messages {
        self.messages.resolve()
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric timeout in environment"),
            }
        }

        if let Some(locale) = lookup(ENV_LOCALE) {
            match locale.parse() {
                Ok(parsed) => {
                    debug!(locale = %locale, "Overriding locale from environment");
                    self.messages.locale = parsed;
                }
                Err(_) => warn!(locale = %locale, "Unknown locale in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "cart")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_locale_parsing() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("pt-BR".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!("pt_br".parse::<Locale>().unwrap(), Locale::PtBr);
        assert!("klingon".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.cart_path, "/carrinho");
        assert_eq!(config.api.checkout_path, "/carrinho");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
        assert_eq!(
            config.messages().fetch_error,
            "items could not be retrieved, try again later."
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();

        config.api.base_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api.base_url = "https://shop.example.com/api/".into();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 5;
        config.api.cart_path = "carrinho".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_message_overrides() {
        let settings = MessageSettings {
            locale: Locale::PtBr,
            fetch_error: None,
            checkout_error: Some("Pedido falhou".into()),
        };
        let messages = settings.resolve();

        assert_eq!(
            messages.fetch_error,
            "Não foi possível obter os itens, tente novamente mais tarde"
        );
        assert_eq!(messages.checkout_error, "Pedido falhou");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "https://api.example.com/"),
            (ENV_TIMEOUT_SECS, "7"),
            (ENV_LOCALE, "pt-br"),
        ]);

        let mut config = StorefrontConfig::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://api.example.com/");
        assert_eq!(config.api.timeout_secs, 7);
        assert_eq!(config.messages.locale, Locale::PtBr);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = StorefrontConfig::default();
        config.apply_overrides_from(|key| match key {
            ENV_TIMEOUT_SECS => Some("soon".into()),
            ENV_LOCALE => Some("xx".into()),
            _ => None,
        });

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.messages.locale, Locale::En);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
            [api]
            base_url = "https://shop.example.com/"
            timeout_secs = 10

            [messages]
            locale = "pt-br"
        "#;

        let config: StorefrontConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.cart_path, "/carrinho");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.messages.locale, Locale::PtBr);

        let written = toml::to_string_pretty(&config).unwrap();
        assert!(written.contains("[api]"));
        assert!(written.contains("locale = \"pt-br\""));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "storefront-config-test-{}.toml",
            std::process::id()
        ));
        let mut config = StorefrontConfig::default();
        config.display.currency_symbol = "R$".into();
        config.save(Some(path.clone())).unwrap();

        let loaded = StorefrontConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.display.currency_symbol, "R$");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_or_default_falls_back_on_bad_file() {
        let path = std::env::temp_dir().join(format!(
            "storefront-config-broken-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        assert!(StorefrontConfig::load(Some(path.clone())).is_err());
        let config = StorefrontConfig::load_or_default(Some(path.clone()));
        assert_eq!(config.api.cart_path, "/carrinho");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_format_money() {
        let display = DisplaySettings::default();
        assert_eq!(display.format_money(Money::from_cents(1234)), "$12.34");
        assert_eq!(display.format_money(Money::from_cents(-550)), "-$5.50");
        assert_eq!(display.format_money(Money::zero()), "$0.00");
    }
}
