//! Where waymark keeps its files.
//!
//! A dev build (`cargo run` or debug assertions) keeps everything next to the
//! working directory. An installed build uses the platform directories:
//!
//! | | config | data (store, logs) |
//! |---|---|---|
//! | Linux | `~/.config/waymark/` | `~/.local/share/waymark/` |
//! | macOS | `~/Library/Application Support/waymark/` | same |
//! | Windows | `%APPDATA%\waymark\` | same |

use std::path::{Path, PathBuf};

const APP_DIR: &str = "waymark";
const CONFIG_FILE: &str = "config.json";
const STORE_FILE: &str = "waymark-store.json";

/// Returns true when running from cargo or as a debug build
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Resolved config and data roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub config: PathBuf,
    pub data: PathBuf,
}

impl AppDirs {
    /// Everything under one local directory
    pub fn local(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            config: root.clone(),
            data: root,
        }
    }

    /// Platform directories, or `None` when the platform reports no data directory
    pub fn installed() -> Option<Self> {
        let data = dirs::data_dir()?.join(APP_DIR);

        // Only Linux separates config from data
        let config = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .map(|p| p.join(APP_DIR))
                .unwrap_or_else(|| data.clone())
        } else {
            data.clone()
        };
        Some(Self { config, data })
    }

    pub fn resolve() -> Self {
        if is_dev_mode() {
            return Self::local(".");
        }
        Self::installed().unwrap_or_else(|| Self::local("."))
    }

    pub fn config_file(&self) -> PathBuf {
        self.config.join(CONFIG_FILE)
    }

    pub fn store_file(&self) -> PathBuf {
        self.data.join(STORE_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data.join("logs")
    }

    /// Create the config, data and log directories
    pub fn create_all(&self) -> std::io::Result<()> {
        for dir in [&self.config, &self.data, &self.logs_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

pub fn config_file() -> PathBuf {
    AppDirs::resolve().config_file()
}

/// Key/value store holding history and favorites
pub fn store_file() -> PathBuf {
    AppDirs::resolve().store_file()
}

pub fn logs_dir() -> PathBuf {
    AppDirs::resolve().logs_dir()
}

/// Where the export and import dialogs open when nothing was exported yet
pub fn default_export_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Called early in startup, before logging is set up
pub fn ensure_directories() -> std::io::Result<()> {
    AppDirs::resolve().create_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_mode_resolves_locally() {
        // Tests run as debug builds
        assert!(is_dev_mode());
        assert_eq!(AppDirs::resolve(), AppDirs::local("."));
        assert_eq!(config_file(), PathBuf::from("./config.json"));
        assert_eq!(logs_dir(), PathBuf::from("./logs"));
    }

    #[test]
    fn test_file_names() {
        let dirs = AppDirs::local("/tmp/waymark-root");
        assert!(dirs.config_file().ends_with("config.json"));
        assert!(dirs.store_file().ends_with("waymark-store.json"));
        assert!(dirs.store_file().starts_with(&dirs.data));
    }

    #[test]
    fn test_create_all_makes_log_dir() {
        let root = std::env::temp_dir().join("waymark_test_app_dirs");
        let _ = std::fs::remove_dir_all(&root);

        let dirs = AppDirs::local(&root);
        dirs.create_all().unwrap();
        assert!(dirs.logs_dir().is_dir());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_installed_dirs_are_app_specific() {
        if let Some(dirs) = AppDirs::installed() {
            assert!(dirs.data.ends_with(APP_DIR));
            assert!(dirs.config.ends_with(APP_DIR));
        }
    }
}
