use crate::error::ResolveError;
use url::Url;

/// Split a chat message into candidate URL tokens, in order of appearance.
///
/// No deduplication happens here: a link posted twice is resolved twice.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Parse a token and apply the scheme gate. Only `http` and `https` URLs
/// make it through; nothing here touches the network.
pub fn parse_http_url(token: &str) -> Result<Url, ResolveError> {
    let url = match Url::parse(token) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => return Err(ResolveError::MissingScheme),
        Err(e) => {
            return Err(ResolveError::InvalidUrl {
                url: token.to_string(),
                message: e.to_string(),
            });
        }
    };

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ResolveError::UnsupportedScheme(other.to_string())),
    }
}
