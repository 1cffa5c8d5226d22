use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discount::DiscountTable;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub authorization: AuthorizationConfig,
    pub logging: LoggingConfig,
    pub discounts: Vec<DiscountEntry>,
}

#[derive(Clone, Debug)]
pub struct AuthorizationConfig {
    pub mode: AuthorizationMode,
    pub api_key: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountEntry {
    pub discount_type: String,
    pub product_category: String,
    pub magnitude: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationMode {
    AllowAll,
    DenyAll,
    ApiKey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub authorization_mode: Option<AuthorizationMode>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            authorization: AuthorizationConfig { mode: AuthorizationMode::DenyAll, api_key: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
            discounts: Vec::new(),
        }
    }
}

impl std::str::FromStr for AuthorizationMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow_all" => Ok(Self::AllowAll),
            "deny_all" => Ok(Self::DenyAll),
            "api_key" => Ok(Self::ApiKey),
            other => Err(ConfigError::Validation(format!(
                "unsupported authorization mode `{other}` (expected allow_all|deny_all|api_key)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Layers defaults, config file, `PRICEWISE_*` environment and explicit
    /// overrides, in that order, then validates the result.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("pricewise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn discount_table(&self) -> DiscountTable {
        DiscountTable::new(self.discounts.iter().map(|entry| {
            (entry.discount_type.clone(), entry.product_category.clone(), entry.magnitude)
        }))
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(authorization) = patch.authorization {
            if let Some(mode) = authorization.mode {
                self.authorization.mode = mode;
            }
            if let Some(api_key) = authorization.api_key {
                self.authorization.api_key = Some(api_key.into());
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(discounts) = patch.discounts {
            self.discounts = discounts;
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PRICEWISE_AUTHORIZATION_MODE") {
            self.authorization.mode = value.parse()?;
        }
        if let Some(value) = read_env("PRICEWISE_AUTHORIZATION_API_KEY") {
            self.authorization.api_key = Some(value.into());
        }

        let log_level =
            read_env("PRICEWISE_LOGGING_LEVEL").or_else(|| read_env("PRICEWISE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PRICEWISE_LOGGING_FORMAT").or_else(|| read_env("PRICEWISE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(mode) = overrides.authorization_mode {
            self.authorization.mode = mode;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_authorization(&self.authorization)?;
        validate_logging(&self.logging)?;
        validate_discounts(&self.discounts)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("pricewise.toml"), PathBuf::from("config/pricewise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_authorization(authorization: &AuthorizationConfig) -> Result<(), ConfigError> {
    if authorization.mode != AuthorizationMode::ApiKey {
        return Ok(());
    }

    let missing = authorization
        .api_key
        .as_ref()
        .map(|value| value.expose_secret().trim().is_empty())
        .unwrap_or(true);
    if missing {
        return Err(ConfigError::Validation(
            "authorization.api_key is required when authorization.mode is `api_key`".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_discounts(discounts: &[DiscountEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for (index, entry) in discounts.iter().enumerate() {
        if entry.discount_type.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "discounts[{index}].discount_type must not be empty"
            )));
        }
        if entry.product_category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "discounts[{index}].product_category must not be empty"
            )));
        }
        if !seen.insert((entry.discount_type.as_str(), entry.product_category.as_str())) {
            return Err(ConfigError::Validation(format!(
                "discounts[{index}] duplicates discount_type `{}` for product_category `{}`",
                entry.discount_type, entry.product_category
            )));
        }
    }

    Ok(())
}

/// Reads a config environment variable; empty or blank values count as unset.
pub fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    authorization: Option<AuthorizationPatch>,
    logging: Option<LoggingPatch>,
    discounts: Option<Vec<DiscountEntry>>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthorizationPatch {
    mode: Option<AuthorizationMode>,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
