/// Fixed framing around every outbound line: `PRIVMSG <target> :<text>\n`
/// minus the target and the text.
pub const PRIVMSG_OVERHEAD: usize = "PRIVMSG  :\n".len();

/// Payload bytes left for the text of a `PRIVMSG` to `target` within a
/// `max_line_bytes` line.
///
/// Targets are validated at config load, so an oversized target is a logic
/// error; it saturates to zero rather than wrapping.
pub fn frame_budget(max_line_bytes: usize, target: &str) -> usize {
    max_line_bytes
        .saturating_sub(PRIVMSG_OVERHEAD)
        .saturating_sub(target.len())
}

/// Longest prefix of `text` that is at most `max_bytes` long and ends on a
/// UTF-8 code point boundary.
///
/// Walks back from the cut over continuation bytes (`0b10xx_xxxx`) until a
/// lead byte or the start of the string.
pub fn truncate_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut cut = max_bytes;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}
