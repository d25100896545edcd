//! Config file read/write.

use crate::schema::BridgeConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config directory.
/// Priority: `SWIPEBRIDGE_CONFIG_DIR` env > `~/.swipebridge/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SWIPEBRIDGE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".swipebridge"),
        None => PathBuf::from(".swipebridge"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// A missing file (first run) yields an empty config; `prepare` fills in the
/// defaults.
pub async fn load_config(path: &Path) -> Result<BridgeConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; starting from an empty config");
        return Ok(BridgeConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: BridgeConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write config to disk atomically (write to temp file, rename).
pub async fn write_config(config: &BridgeConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to rename temp config to: {}", path.display()))?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("swipebridge-config-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty_config() {
        let path = scratch_dir().join("config.yaml");
        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[tokio::test]
    async fn write_then_load() {
        let dir = scratch_dir();
        let path = config_file_path(&dir);
        let cfg = apply_all_defaults(BridgeConfig::default());
        write_config(&cfg, &path).await.unwrap();
        assert!(!path.with_extension("yaml.tmp").exists());

        let loaded = load_config(&path).await.unwrap();
        assert_eq!(loaded, cfg);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn parses_camel_case_yaml() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(
            &path,
            "channel:\n  name: app/commands\n  callTimeoutMs: 1200\nintents:\n  authorization: denied\n",
        )
        .unwrap();

        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg.channel_name(), Some("app/commands"));
        assert_eq!(cfg.call_timeout(), Some(std::time::Duration::from_millis(1200)));
        assert_eq!(cfg.intents.unwrap().authorization.as_deref(), Some("denied"));
        let _ = std::fs::remove_dir_all(dir);
    }
}
