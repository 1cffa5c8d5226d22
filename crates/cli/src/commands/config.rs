use std::fs;
use std::path::{Path, PathBuf};

use pricewise_core::config::{read_env, AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::CommandResult;

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let log_level_overridden = options.overrides.log_level.is_some();
    let mode_overridden = options.overrides.authorization_mode.is_some();

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: 2,
                output: format!("config validation failed: {error}"),
            };
        }
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];

    let mode_source = if mode_overridden {
        "flag (--authorization-mode)".to_string()
    } else {
        source("authorization.mode", &["PRICEWISE_AUTHORIZATION_MODE"])
    };
    lines.push(render_line(
        "authorization.mode",
        &format!("{:?}", config.authorization.mode),
        mode_source,
    ));
    let api_key = config
        .authorization
        .api_key
        .as_ref()
        .map(|key| redact_key(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line(
        "authorization.api_key",
        &api_key,
        source("authorization.api_key", &["PRICEWISE_AUTHORIZATION_API_KEY"]),
    ));

    let level_source = if log_level_overridden {
        "flag (--log-level)".to_string()
    } else {
        source("logging.level", &["PRICEWISE_LOGGING_LEVEL", "PRICEWISE_LOG_LEVEL"])
    };
    lines.push(render_line("logging.level", &config.logging.level, level_source));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["PRICEWISE_LOGGING_FORMAT", "PRICEWISE_LOG_FORMAT"]),
    ));

    lines.push(render_line(
        "discounts",
        &format!("{} row(s)", config.discounts.len()),
        source("discounts", &[]),
    ));
    for entry in &config.discounts {
        lines.push(format!(
            "  - {} / {} = {}",
            entry.discount_type, entry.product_category, entry.magnitude
        ));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("pricewise.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/pricewise.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| read_env(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_key(key: &str) -> String {
    if key.trim().is_empty() {
        return "<empty>".to_string();
    }

    "<redacted>".to_string()
}
