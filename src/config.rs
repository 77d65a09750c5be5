use log::LevelFilter;
use std::env;
use thiserror::Error;

/// Environment variable overriding the maximum log level.
pub const LOG_LEVEL_VARIABLE: &str = "ANDROID_RUST_LOG";
/// Environment variable overriding the Android log tag.
pub const LOG_TAG_VARIABLE: &str = "ANDROID_RUST_LOG_TAG";

/// The message sent to callbacks by default.
pub const DEFAULT_MESSAGE: &str = "Hello from Rust";
/// The default Android log tag. Matches the library name.
pub const DEFAULT_LOG_TAG: &str = "rust";

/// An environment override that was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("Ignoring invalid ANDROID_RUST_LOG value {0:?}.")]
    InvalidLogLevel(String),
    #[error("Ignoring empty ANDROID_RUST_LOG_TAG value.")]
    EmptyLogTag,
}

/// Bridge configuration.
///
/// Example:
/// ```
/// use log::LevelFilter;
/// use rust::BridgeConfig;
///
/// let config = BridgeConfig::default()
///     .with_message("Hi")
///     .with_max_log_level(LevelFilter::Debug);
/// assert_eq!(config.message(), "Hi");
/// assert_eq!(config.log_tag(), "rust");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    message: String,
    log_tag: String,
    max_log_level: LevelFilter,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            message: DEFAULT_MESSAGE.to_owned(),
            log_tag: DEFAULT_LOG_TAG.to_owned(),
            max_log_level: LevelFilter::Info,
        }
    }
}

impl BridgeConfig {
    /// Default configuration with overrides read from the process environment.
    ///
    /// Unparsable values are ignored and returned as warnings. This runs before a logger
    /// is installed, so the caller logs them once it is.
    pub fn from_env() -> (Self, Vec<ConfigWarning>) {
        let mut config = Self::default();
        let mut warnings = vec![];
        if let Ok(level) = env::var(LOG_LEVEL_VARIABLE) {
            match level.parse::<LevelFilter>() {
                Ok(level) => config.max_log_level = level,
                Err(_) => warnings.push(ConfigWarning::InvalidLogLevel(level)),
            }
        }
        if let Ok(tag) = env::var(LOG_TAG_VARIABLE) {
            if tag.is_empty() {
                warnings.push(ConfigWarning::EmptyLogTag);
            } else {
                config.log_tag = tag;
            }
        }
        (config, warnings)
    }

    /// Set the message sent to callbacks.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the Android log tag.
    pub fn with_log_tag(mut self, log_tag: impl Into<String>) -> Self {
        self.log_tag = log_tag.into();
        self
    }

    /// Set the maximum log level.
    pub fn with_max_log_level(mut self, max_log_level: LevelFilter) -> Self {
        self.max_log_level = max_log_level;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn log_tag(&self) -> &str {
        &self.log_tag
    }

    pub fn max_log_level(&self) -> LevelFilter {
        self.max_log_level
    }
}
