//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::dispatch::DispatchMode;
use crate::launcher::LauncherStrategy;

/// Default catalog host serving `swlist.json` and per-entry descriptors
pub const DEFAULT_CATALOG_HOST: &str = "https://aedmadrid.github.io/OrdenadorASO";

/// Browser executables probed, in order, by the external-process launcher
pub const DEFAULT_BROWSER_CANDIDATES: &[&str] = &[
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/brave-browser",
    "/snap/bin/chromium",
];

/// Portal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub dispatch: DispatchConfig,
    pub launcher: LauncherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog host
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// How fetched descriptors are interpreted
    pub mode: DispatchMode,
    /// Entry id used by the fixed single-entry launch
    pub sol_entry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Which launch strategy realizes a request
    pub strategy: LauncherStrategy,
    /// Ordered browser probe list for the external strategy
    pub browser_candidates: Vec<String>,
    /// Isolated profile directory handed to the spawned browser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data_dir: Option<PathBuf>,
    /// Terminate the host process after a successful external hand-off
    pub exit_on_handoff: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                host: DEFAULT_CATALOG_HOST.to_string(),
            },
            dispatch: DispatchConfig {
                mode: DispatchMode::Validated,
                sol_entry: "sol.app".to_string(),
            },
            launcher: LauncherConfig {
                strategy: LauncherStrategy::External,
                browser_candidates: DEFAULT_BROWSER_CANDIDATES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                user_data_dir: None,
                exit_on_handoff: true,
            },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("PORTAL_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("portal")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "catalog.host" => Ok(self.catalog.host.clone()),

            "dispatch.mode" => Ok(self.dispatch.mode.as_str().to_string()),
            "dispatch.sol_entry" => Ok(self.dispatch.sol_entry.clone()),

            "launcher.strategy" => Ok(self.launcher.strategy.as_str().to_string()),
            "launcher.browser_candidates" => Ok(self.launcher.browser_candidates.join(", ")),
            "launcher.user_data_dir" => Ok(self
                .launcher
                .user_data_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(default)".to_string())),
            "launcher.exit_on_handoff" => Ok(self.launcher.exit_on_handoff.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `portal config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "catalog.host" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(anyhow!("Catalog host must be an http(s) URL: {}", value));
                }
                self.catalog.host = value.trim_end_matches('/').to_string();
            }

            "dispatch.mode" => {
                self.dispatch.mode = DispatchMode::parse(value).ok_or_else(|| {
                    anyhow!(
                        "Invalid dispatch mode: {}. Valid options: validated, raw-shell",
                        value
                    )
                })?;
            }
            "dispatch.sol_entry" => {
                self.dispatch.sol_entry = value.to_string();
            }

            "launcher.strategy" => {
                self.launcher.strategy = LauncherStrategy::parse(value).ok_or_else(|| {
                    anyhow!(
                        "Invalid launcher strategy: {}. Valid options: embedded, external",
                        value
                    )
                })?;
            }
            "launcher.browser_candidates" => {
                self.launcher.browser_candidates = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "launcher.user_data_dir" => {
                self.launcher.user_data_dir = Some(PathBuf::from(value));
            }
            "launcher.exit_on_handoff" => {
                self.launcher.exit_on_handoff = value
                    .parse()
                    .with_context(|| format!("Invalid exit_on_handoff value: {}", value))?;
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `portal config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "catalog.host",
            "dispatch.mode",
            "dispatch.sol_entry",
            "launcher.strategy",
            "launcher.browser_candidates",
            "launcher.user_data_dir",
            "launcher.exit_on_handoff",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.host, DEFAULT_CATALOG_HOST);
        assert_eq!(config.dispatch.mode, DispatchMode::Validated);
        assert!(!config.launcher.browser_candidates.is_empty());
        assert!(config.launcher.exit_on_handoff);
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut config = Config::default();
        config
            .set("catalog.host", "https://catalog.example.com/")
            .unwrap();
        assert_eq!(
            config.get("catalog.host").unwrap(),
            "https://catalog.example.com"
        );

        config.set("dispatch.mode", "raw-shell").unwrap();
        assert_eq!(config.get("dispatch.mode").unwrap(), "raw-shell");

        config.set("launcher.strategy", "embedded").unwrap();
        assert_eq!(config.get("launcher.strategy").unwrap(), "embedded");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("catalog.host", "ftp://nope").is_err());
        assert!(config.set("dispatch.mode", "yolo").is_err());
        assert!(config.set("launcher.strategy", "teleport").is_err());
        assert!(config.set("no.such.key", "x").is_err());
    }

    #[test]
    fn test_browser_candidates_parse_from_csv() {
        let mut config = Config::default();
        config
            .set("launcher.browser_candidates", "/a/one, /b/two,,/c/three ")
            .unwrap();
        assert_eq!(
            config.launcher.browser_candidates,
            vec!["/a/one", "/b/two", "/c/three"]
        );
    }

    #[test]
    fn test_list_covers_every_key() {
        let config = Config::default();
        let listed = config.list().unwrap();
        assert_eq!(listed.len(), 7);
        for (key, _) in listed {
            assert!(config.get(&key).is_ok());
        }
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.catalog.host, config.catalog.host);
        assert_eq!(parsed.dispatch.mode, config.dispatch.mode);
        assert_eq!(parsed.launcher.strategy, config.launcher.strategy);
    }
}
