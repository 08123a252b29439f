use serde::{Deserialize, Serialize};

fn default_irc_port() -> u16 {
    6697
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrcConfig {
    /// IRC server hostname
    #[serde(default)]
    pub server: String,
    /// IRC server port (default: 6697 for TLS)
    #[serde(default = "default_irc_port")]
    pub port: u16,
    /// Bot nickname
    #[serde(default)]
    pub nickname: String,
    /// Username (defaults to nickname if not set)
    pub username: Option<String>,
    /// Channels to join on connect. Links are only resolved here.
    #[serde(default)]
    pub autojoins: Vec<String>,
    /// Server password (for bouncers like ZNC)
    pub server_password: Option<String>,
    /// `NickServ` IDENTIFY password
    pub nickserv_password: Option<String>,
    /// SASL PLAIN password (`IRCv3`)
    pub sasl_password: Option<String>,
    /// Verify TLS certificate (default: true)
    pub verify_tls: Option<bool>,
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: default_irc_port(),
            nickname: String::new(),
            username: None,
            autojoins: Vec::new(),
            server_password: None,
            nickserv_password: None,
            sasl_password: None,
            verify_tls: None,
        }
    }
}

/// IRC channel names start with `#` or `&` and never contain spaces,
/// commas or control characters.
pub fn is_valid_channel_name(name: &str) -> bool {
    name.len() > 1
        && (name.starts_with('#') || name.starts_with('&'))
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c == ',' || c.is_control())
}
