//! Configuration and session storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::SessionStore;
use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::chat::ChatTiming;
use crate::models::User;

/// Timings of the simulated chat partner, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub typing_delay_ms: u64,
    pub reply_min_ms: u64,
    pub reply_jitter_ms: u64,
    pub read_delay_ms: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            typing_delay_ms: 500,
            reply_min_ms: 2000,
            reply_jitter_ms: 2000,
            read_delay_ms: 2000,
        }
    }
}

impl ChatSettings {
    pub fn timing(&self) -> ChatTiming {
        ChatTiming {
            typing_delay: Duration::from_millis(self.typing_delay_ms),
            reply_min: Duration::from_millis(self.reply_min_ms),
            reply_jitter: Duration::from_millis(self.reply_jitter_ms),
            read_delay: Duration::from_millis(self.read_delay_ms),
        }
    }
}

/// Application configuration
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Results per page for driver search
    pub page_size: usize,
    pub chat: ChatSettings,
    /// Signed-in user, kept across runs
    pub session: Option<User>,
    /// Where `save` writes; not part of the file itself
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            chat: ChatSettings::default(),
            session: None,
            path: None,
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "buscaja", "busca-ja")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the per-user config directory
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from `path`; a missing file yields defaults.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        if config.page_size == 0 {
            tracing::warn!("page_size of 0 in config, using {}", DEFAULT_PAGE_SIZE);
            config.page_size = DEFAULT_PAGE_SIZE;
        }
        config.path = Some(path);
        Ok(config)
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = match self.path {
            Some(ref p) => p.clone(),
            None => Self::config_path()?,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        // Contains the user's personal data
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }
}

impl SessionStore for Config {
    fn load_user(&self) -> Option<User> {
        self.session.clone()
    }

    fn save_user(&mut self, user: &User) -> Result<()> {
        self.session = Some(user.clone());
        self.save()
    }

    fn clear_user(&mut self) -> Result<()> {
        self.session = None;
        self.save()
    }
}
