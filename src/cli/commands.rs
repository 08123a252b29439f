use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `linkbot` - announces the titles of links posted to IRC channels.
#[derive(Parser, Debug)]
#[command(name = "linkbot")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "Replies to links in IRC channels with the page title.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.linkbot/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log parsed URLs, response headers and body sizes
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Connect to IRC and answer links (the default)
    Run,

    /// Resolve URLs once and print the lines the bot would send
    Resolve {
        /// URLs or free text; every whitespace-separated token is tried
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Validate the config and probe the IRC server
    CheckConfig,
}
