use super::Config;
use crate::config::schema::is_valid_channel_name;
use crate::error::ConfigError;
use crate::links::truncate::PRIVMSG_OVERHEAD;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest reply payload worth sending once framing and target are paid for.
const MIN_PAYLOAD_BYTES: usize = 32;

impl Config {
    /// `~/.linkbot/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Ok(home.join(".linkbot").join("config.toml"))
    }

    /// Load the config at `path` (or the default location), writing a
    /// template first if none exists, then apply env overrides.
    ///
    /// Not validated: callers pick [`Config::validate`] or
    /// [`Config::validate_links`] depending on what they need.
    pub fn load_or_init(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| ConfigError::Load(e.to_string()))
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            config.config_path = config_path;
            config
        } else {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
            let config = Self {
                config_path,
                ..Self::default()
            };
            config.save()?;
            tracing::info!(
                path = %config.config_path.display(),
                "wrote default config; fill in [irc] server, nickname and autojoins"
            );
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |msg: String| -> std::result::Result<(), ConfigError> {
            Err(ConfigError::Validation(msg))
        };

        if self.irc.server.trim().is_empty() {
            return invalid("irc.server is empty".into());
        }
        if self.irc.nickname.trim().is_empty() {
            return invalid("irc.nickname is empty".into());
        }
        if let Some(bad) = self
            .irc
            .autojoins
            .iter()
            .find(|c| !is_valid_channel_name(c))
        {
            return invalid(format!("irc.autojoins: {bad:?} is not a channel name"));
        }
        self.validate_links()?;

        let longest_target = self.irc.autojoins.iter().map(String::len).max().unwrap_or(0);
        let needed = PRIVMSG_OVERHEAD + longest_target + MIN_PAYLOAD_BYTES;
        if self.links.max_line_bytes < needed {
            return invalid(format!(
                "links.max_line_bytes = {} leaves no room for replies (need >= {needed})",
                self.links.max_line_bytes
            ));
        }

        Ok(())
    }

    /// The `[links]` checks alone; enough for one-shot resolving.
    pub fn validate_links(&self) -> std::result::Result<(), ConfigError> {
        if self.links.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "links.request_timeout_secs must be > 0".into(),
            ));
        }
        if self.links.max_concurrent_messages == 0 {
            return Err(ConfigError::Validation(
                "links.max_concurrent_messages must be > 0".into(),
            ));
        }
        if self.links.max_line_bytes <= PRIVMSG_OVERHEAD {
            return Err(ConfigError::Validation(format!(
                "links.max_line_bytes must exceed {PRIVMSG_OVERHEAD}"
            )));
        }
        Ok(())
    }
}
