use super::Config;

fn env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(debug) = std::env::var("LINKBOT_DEBUG")
            && let Some(flag) = env_flag(&debug)
        {
            self.debug = flag;
        }

        if let Ok(server) = std::env::var("LINKBOT_IRC_SERVER")
            && !server.is_empty()
        {
            self.irc.server = server;
        }

        if let Ok(port_str) = std::env::var("LINKBOT_IRC_PORT")
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.irc.port = port;
        }

        if let Ok(nickname) = std::env::var("LINKBOT_IRC_NICKNAME")
            && !nickname.is_empty()
        {
            self.irc.nickname = nickname;
        }
    }
}
