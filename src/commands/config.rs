//! Config commands (show, set, get)

use owo_colors::OwoColorize;
use serde_json::json;

use crate::commands::CommandOutput;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::{HelpdeskError, Result};

const SECRET_KEYS: &[&str] = &["auth.nonce", "auth.app_password"];

/// Mask a secret, showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

fn validate_config_key(key: &str) -> Result<()> {
    if CONFIG_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(HelpdeskError::Config(format!(
            "unknown config key '{key}'. Valid keys: {}",
            CONFIG_KEYS.join(", ")
        )))
    }
}

/// Effective value of a key, after environment overrides
fn effective_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "url" => config.url(),
        "auth.nonce" => config.nonce(),
        "auth.username" => config.username(),
        "auth.app_password" => config.app_password(),
        "timeout_secs" => Some(config.timeout_secs.to_string()),
        _ => None,
    }
}

fn status_text(configured: bool) -> String {
    if configured {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    }
}

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let credential = config.credential();

    let auth_mode = if credential.is_anonymous() {
        "anonymous"
    } else if config.app_password().is_some() && config.username().is_some() {
        "application_password"
    } else {
        "nonce"
    };

    let json_output = json!({
        "url": config.url(),
        "auth": {
            "mode": auth_mode,
            "nonce_configured": config.nonce().is_some(),
            "username": config.username(),
            "app_password_configured": config.app_password().is_some(),
        },
        "timeout_secs": config.timeout_secs,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    match config.url() {
        Some(url) => text_output.push_str(&format!("{}: {url}\n", "url".cyan())),
        None => text_output.push_str(&format!(
            "{}: {}\n",
            "url".cyan(),
            "not configured".dimmed()
        )),
    }
    text_output.push_str(&format!(
        "{}: {}\n\n",
        "timeout_secs".cyan(),
        config.timeout_secs
    ));

    // Never print the secrets themselves
    text_output.push_str(&format!("{} ({auth_mode}):\n", "auth".cyan()));
    text_output.push_str(&format!(
        "  nonce: {}\n",
        status_text(config.nonce().is_some())
    ));
    match config.username() {
        Some(username) => text_output.push_str(&format!("  username: {username}\n")),
        None => text_output.push_str(&format!("  username: {}\n", status_text(false))),
    }
    text_output.push_str(&format!(
        "  app_password: {}\n",
        status_text(config.app_password().is_some())
    ));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if SECRET_KEYS.contains(&key) {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    };

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {key} = {shown}"))
    .print(output_json)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    validate_config_key(key)?;

    let config = Config::load()?;
    let value = effective_value(&config, key)
        .ok_or_else(|| HelpdeskError::Config(format!("{key} not set")))?;

    let (json_output, text_output) = if SECRET_KEYS.contains(&key) {
        let masked = mask_sensitive_value(&value);
        let json = json!({
            "key": key,
            "value": masked,
            "configured": true,
            "masked": true,
        });
        let text = format!("{masked} (masked - showing first 2 and last 2 characters)");
        (json, text)
    } else {
        let json = json!({
            "key": key,
            "value": value,
            "configured": true,
            "masked": false,
        });
        (json, value)
    };

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output_json)
}
