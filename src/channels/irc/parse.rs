/// A parsed IRC message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct IrcMessage {
    pub(super) prefix: Option<String>,
    pub(super) command: String,
    pub(super) params: Vec<String>,
}

const CTCP_DELIM: char = '\u{1}';

impl IrcMessage {
    /// Parse a raw IRC line into an `IrcMessage`.
    ///
    /// IRC format: `[@<tags>] [:<prefix>] <command> [<params>] [:<trailing>]`.
    /// IRCv3 message tags are accepted and discarded.
    pub(super) fn parse(line: &str) -> Option<Self> {
        let mut line = line.trim_end_matches(['\r', '\n']);
        if let Some(tagged) = line.strip_prefix('@') {
            line = tagged.split_once(' ')?.1.trim_start();
        }
        if line.is_empty() {
            return None;
        }

        let (prefix, rest) = if let Some(stripped) = line.strip_prefix(':') {
            let (prefix, rest) = stripped.split_once(' ')?;
            (Some(prefix.to_string()), rest)
        } else {
            (None, line)
        };

        // Trailing parameter starts at the first " :" after the command
        let (params_part, trailing) = match rest.split_once(" :") {
            Some((params, trailing)) => (params, Some(trailing)),
            None => (rest, None),
        };

        let mut parts = params_part.split_whitespace();
        let command = parts.next()?.to_uppercase();
        let mut params: Vec<String> = parts.map(String::from).collect();
        if let Some(t) = trailing {
            params.push(t.to_string());
        }

        Some(IrcMessage {
            prefix,
            command,
            params,
        })
    }

    /// Extract the nickname from the prefix (nick!user@host → nick).
    pub(super) fn nick(&self) -> Option<&str> {
        self.prefix.as_deref().and_then(|p| {
            let nick = p.split('!').next().unwrap_or(p);
            if nick.is_empty() { None } else { Some(nick) }
        })
    }
}

/// Text a human would read in a PRIVMSG body.
///
/// `/me` actions (`\x01ACTION text\x01`) yield their text; every other CTCP
/// request (VERSION, PING, ...) yields `None`.
pub(super) fn privmsg_text(body: &str) -> Option<&str> {
    let Some(ctcp) = body.strip_prefix(CTCP_DELIM) else {
        return Some(body);
    };
    let ctcp = ctcp.strip_suffix(CTCP_DELIM).unwrap_or(ctcp);
    ctcp.strip_prefix("ACTION ")
}
