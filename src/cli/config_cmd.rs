//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::audio::OutputFormat;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::RecordingDuration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    match config_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Current value of a key, rendered for display
fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "duration" => config.duration.clone(),
        "format" => config.format.clone(),
        "mic_device" => config.mic_device.map(|i| i.to_string()),
        "system_device" => config.system_device.map(|i| i.to_string()),
        "output_dir" => config.output_dir.clone(),
        _ => None,
    }
}

/// Validate a value and store it under `key`
fn apply_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "duration" => {
            value
                .parse::<RecordingDuration>()
                .map_err(|e| invalid(e.to_string()))?;
            config.duration = Some(value.to_string());
        }
        "format" => {
            // Unlike recording, a stored format must be one we can write
            let format = value.parse::<OutputFormat>().map_err(|_| {
                invalid(format!(
                    "Invalid value '{}'. Valid options: {}",
                    value,
                    OutputFormat::ALL
                        .iter()
                        .map(|f| f.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            config.format = Some(format.as_str().to_string());
        }
        "mic_device" => config.mic_device = Some(parse_index(value).map_err(invalid)?),
        "system_device" => config.system_device = Some(parse_index(value).map_err(invalid)?),
        "output_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            config.output_dir = Some(value.to_string());
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }

    Ok(())
}

/// Parse a device index
fn parse_index(value: &str) -> Result<usize, String> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Value must be a device index (0, 1, 2, ...), got '{}'", value))
}
