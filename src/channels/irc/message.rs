/// Split a reply into lines safe for IRC transmission.
///
/// IRC is a line-based protocol, so a CR or LF inside a PRIVMSG payload would
/// end the command early and turn the remainder into a garbled command of
/// its own. Each CR/LF-separated piece becomes its own line, empty pieces are
/// dropped, and any piece longer than `max_bytes` is cut at UTF-8 boundaries.
pub(super) fn split_message(message: &str, max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();

    for line in message.split(['\r', '\n']) {
        if line.is_empty() {
            continue;
        }

        let mut remaining = line;
        while !remaining.is_empty() {
            if remaining.len() <= max_bytes {
                chunks.push(remaining.to_string());
                break;
            }

            let mut split_at = crate::links::truncate::truncate_utf8(remaining, max_bytes).len();
            if split_at == 0 {
                // Budget smaller than one code point: send it whole rather than loop
                split_at = remaining
                    .char_indices()
                    .nth(1)
                    .map_or(remaining.len(), |(i, _)| i);
            }

            chunks.push(remaining[..split_at].to_string());
            remaining = &remaining[split_at..];
        }
    }

    chunks
}
