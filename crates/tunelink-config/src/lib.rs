mod config;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tunelink_core::{TunelinkError, TunelinkResult};

pub use config::{ApiConfig, BotCredentials, DiscordConfig, LogConfig, TunelinkConfig};

pub const DEFAULT_ENDPOINT: &str = "https://ytm2spotify.com/convert";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
pub const APPLICATION_ID_VAR: &str = "DISCORD_CLIENT_ID";
pub const ENDPOINT_VAR: &str = "TUNELINK_API_ENDPOINT";
pub const TIMEOUT_VAR: &str = "TUNELINK_API_TIMEOUT_SECS";
pub const LOG_VAR: &str = "TUNELINK_LOG";
pub const CONFIG_PATH_VAR: &str = "TUNELINK_CONFIG";

/// Keys accepted by `config get` / `config set`.
pub const KNOWN_KEYS: [&str; 5] = [
    "discord.token",
    "discord.application_id",
    "api.endpoint",
    "api.timeout_secs",
    "log.level",
];

pub fn config_path() -> TunelinkResult<PathBuf> {
    if let Some(path) = non_blank(env::var(CONFIG_PATH_VAR).ok()) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| TunelinkError::Config("home directory not found".to_string()))?;
    Ok(home.join(".tunelink").join("config.toml"))
}

/// Loads `.env` from the working directory. Returns the loaded path, or
/// `None` when there is no such file.
pub fn load_dotenv() -> TunelinkResult<Option<PathBuf>> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome(result: dotenvy::Result<PathBuf>) -> TunelinkResult<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(TunelinkError::Config(format!("failed to load .env: {err}"))),
    }
}

pub fn load_config() -> TunelinkResult<TunelinkConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(TunelinkConfig::default());
    }
    let content = fs::read_to_string(&path)
        .map_err(|err| TunelinkError::Config(format!("failed to read config: {err}")))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> TunelinkResult<TunelinkConfig> {
    toml::from_str(content)
        .map_err(|err| TunelinkError::Config(format!("failed to parse config: {err}")))
}

pub fn save_config(config: &TunelinkConfig) -> TunelinkResult<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| TunelinkError::Config(format!("failed to create config dir: {err}")))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|err| TunelinkError::Config(format!("failed to serialize config: {err}")))?;
    fs::write(&path, content)
        .map_err(|err| TunelinkError::Config(format!("failed to write config: {err}")))?;
    Ok(())
}

pub fn config_exists() -> TunelinkResult<bool> {
    let path = config_path()?;
    Ok(path.exists())
}

/// Resolves bot credentials from the process environment and the config file.
pub fn resolve_credentials(config: &TunelinkConfig) -> TunelinkResult<BotCredentials> {
    resolve_credentials_with(config, |key| env::var(key).ok())
}

/// Like [`resolve_credentials`], reading variables through `lookup`.
///
/// Fails when either value is missing or blank, or when the application id is
/// not a non-zero integer.
pub fn resolve_credentials_with(
    config: &TunelinkConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> TunelinkResult<BotCredentials> {
    let token = non_blank(lookup(TOKEN_VAR))
        .or_else(|| non_blank(config.discord.token.clone()))
        .ok_or_else(|| {
            TunelinkError::Config(format!(
                "missing bot token: set {TOKEN_VAR} or discord.token"
            ))
        })?;

    let raw_id = non_blank(lookup(APPLICATION_ID_VAR))
        .or_else(|| non_blank(config.discord.application_id.clone()))
        .ok_or_else(|| {
            TunelinkError::Config(format!(
                "missing application id: set {APPLICATION_ID_VAR} or discord.application_id"
            ))
        })?;

    let application_id = raw_id
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| {
            TunelinkError::Config(format!(
                "application id must be a non-zero integer, got '{raw_id}'"
            ))
        })?;

    Ok(BotCredentials {
        token: token.trim().to_string(),
        application_id,
    })
}

pub fn resolve_endpoint(config: &TunelinkConfig) -> String {
    resolve_endpoint_with(config, |key| env::var(key).ok())
}

pub fn resolve_endpoint_with(
    config: &TunelinkConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> String {
    non_blank(lookup(ENDPOINT_VAR))
        .or_else(|| non_blank(config.api.endpoint.clone()))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

pub fn resolve_timeout_secs(config: &TunelinkConfig) -> TunelinkResult<Option<u64>> {
    resolve_timeout_secs_with(config, |key| env::var(key).ok())
}

pub fn resolve_timeout_secs_with(
    config: &TunelinkConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> TunelinkResult<Option<u64>> {
    match non_blank(lookup(TIMEOUT_VAR)) {
        Some(value) => parse_timeout_secs(TIMEOUT_VAR, &value).map(Some),
        None => match config.api.timeout_secs {
            Some(0) => Err(TunelinkError::Config(
                "api.timeout_secs must be a positive number of seconds".to_string(),
            )),
            secs => Ok(secs),
        },
    }
}

/// A zero timeout would fail every request, so only positive values pass.
fn parse_timeout_secs(name: &str, value: &str) -> TunelinkResult<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs != 0)
        .ok_or_else(|| {
            TunelinkError::Config(format!("{name} must be a positive number of seconds"))
        })
}

pub fn resolve_log_level(config: &TunelinkConfig) -> String {
    non_blank(env::var(LOG_VAR).ok())
        .or_else(|| non_blank(config.log.level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

pub fn get_config_value(config: &TunelinkConfig, key_path: &str) -> TunelinkResult<Option<String>> {
    let parts: Vec<&str> = key_path.split('.').collect();
    let value = match parts.as_slice() {
        ["discord", "token"] => config.discord.token.clone(),
        ["discord", "application_id"] => config.discord.application_id.clone(),
        ["api", "endpoint"] => config.api.endpoint.clone(),
        ["api", "timeout_secs"] => config.api.timeout_secs.map(|secs| secs.to_string()),
        ["log", "level"] => config.log.level.clone(),
        _ => {
            return Err(TunelinkError::Config(format!(
                "unknown key '{key_path}' (known keys: {})",
                KNOWN_KEYS.join(", ")
            )));
        }
    };
    Ok(value)
}

pub fn set_config_value(key_path: &str, value: &str) -> TunelinkResult<()> {
    let path = config_path()?;
    let content = if path.exists() {
        fs::read_to_string(&path)
            .map_err(|err| TunelinkError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let content = apply_config_value(&content, key_path, value)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| TunelinkError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(&path, content)
        .map_err(|err| TunelinkError::Config(format!("failed to write config: {err}")))?;

    Ok(())
}

/// Sets `key_path` inside a TOML document, preserving the rest of it.
pub fn apply_config_value(content: &str, key_path: &str, value: &str) -> TunelinkResult<String> {
    if !KNOWN_KEYS.contains(&key_path) {
        return Err(TunelinkError::Config(format!(
            "unknown key '{key_path}' (known keys: {})",
            KNOWN_KEYS.join(", ")
        )));
    }

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|err| TunelinkError::Config(format!("failed to parse config: {err}")))?;

    let Some((table_name, key)) = key_path.split_once('.') else {
        return Err(TunelinkError::Config(
            "key path must have 2 parts (e.g., 'discord.token')".to_string(),
        ));
    };

    let table = doc
        .as_table_mut()
        .entry(table_name)
        .or_insert(toml_edit::Item::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| TunelinkError::Config(format!("cannot set nested value in '{key_path}'")))?;

    if key_path == "api.timeout_secs" {
        let secs = parse_timeout_secs(key_path, value)?;
        let secs = i64::try_from(secs).map_err(|_| {
            TunelinkError::Config(format!("{key_path} is too large: {secs}"))
        })?;
        table[key] = toml_edit::value(secs);
    } else {
        table[key] = toml_edit::value(value);
    }

    Ok(doc.to_string())
}

pub fn open_in_editor() -> TunelinkResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&TunelinkConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "nano".to_string()
        }
    });

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .map_err(|err| TunelinkError::Config(format!("failed to open editor '{editor}': {err}")))?;

    if !status.success() {
        return Err(TunelinkError::Config(format!(
            "editor exited with status: {status}"
        )));
    }

    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
