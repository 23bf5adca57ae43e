//! User configuration and on-disk locations

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    pub theme: Option<String>,
    /// Repository filter last chosen on the RFC list, as `owner/name`.
    pub last_repo: Option<String>,
}

/// Load UI configuration from the user's config directory.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_ui_config() -> anyhow::Result<Option<UiConfig>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    load_ui_config_from(&path)
}

fn load_ui_config_from(path: &Path) -> anyhow::Result<Option<UiConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(Some(config))
}

/// Save UI configuration to the user's config directory.
///
/// # Errors
///
/// Returns an error if the config directory cannot be created or the file cannot be written.
pub fn save_ui_config(config: &UiConfig) -> anyhow::Result<()> {
    let Some(path) = config_path() else {
        return Ok(());
    };
    save_ui_config_to(&path, config)
}

fn save_ui_config_to(path: &Path, config: &UiConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(config)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

/// `$XDG_*` directory, falling back to `$HOME/<fallback>`.
fn xdg_dir(var: &str, fallback: &str) -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(var) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    std::env::var("HOME")
        .ok()
        .map(|home| Path::new(&home).join(fallback))
}

fn config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|base| base.join(".rfc-ui").join("ui.json"))
}

/// Location of the response cache database.
#[must_use]
pub fn cache_db_path() -> Option<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache").map(|base| base.join("rfc-ui").join("cache.db"))
}

/// Location of the log file.
#[must_use]
pub fn log_file_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|base| base.join("rfc-ui").join("rfc-ui.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("rfc-ui-config-test-{}-{name}", std::process::id()))
            .join("ui.json")
    }

    #[test]
    fn missing_file_is_none() {
        let path = temp_path("missing");
        assert!(load_ui_config_from(&path).expect("load").is_none());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let config = UiConfig {
            theme: Some("nord".to_string()),
            last_repo: Some("acme/rfcs".to_string()),
        };
        save_ui_config_to(&path, &config).expect("save");
        let loaded = load_ui_config_from(&path).expect("load");
        assert_eq!(loaded, Some(config));
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let config: UiConfig =
            serde_json::from_str(r#"{"theme":"gruvbox","default_diff_view":"unified"}"#)
                .expect("parse");
        assert_eq!(config.theme.as_deref(), Some("gruvbox"));
        assert_eq!(config.last_repo, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path("malformed");
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).expect("mkdir");
        }
        std::fs::write(&path, "{not json").expect("write");
        assert!(load_ui_config_from(&path).is_err());
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
