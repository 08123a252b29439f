use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

/// SASL PLAIN payload (`authzid \0 authcid \0 password`, empty authzid),
/// base64-encoded for `AUTHENTICATE`.
pub(super) fn encode_sasl_plain(nick: &str, password: &str) -> String {
    BASE64_STANDARD.encode(format!("\0{nick}\0{password}"))
}
