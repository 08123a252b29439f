use super::super::IrcConfig;
use crate::links::LinkConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - set by the loader, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Verbose logging: parsed URLs, HTTP headers, fetched body sizes
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub irc: IrcConfig,

    #[serde(default)]
    pub links: LinkConfig,
}

impl Config {
    /// Channels the bot watches for links (its autojoin list).
    pub fn allowed_channels(&self) -> Vec<String> {
        self.irc.autojoins.clone()
    }
}
