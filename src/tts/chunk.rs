//! Splitting text into request-sized fragments.
//!
//! The Google TTS endpoint rejects long inputs, so text is sent in pieces of
//! at most `max_chars` characters (not bytes).  Splits prefer sentence ends,
//! then spaces, and only cut through a word that is itself too long.
//! Neighbouring sentences are packed together while they fit, keeping the
//! request count low.

/// Characters that end a sentence when followed by whitespace.
const TERMINATORS: &[char] = &['.', '!', '?', ';', ':', '…', '。', '！', '？'];

/// Collapse PDF line layout into plain running text.
///
/// Words hyphenated across a line break are re-joined, then every run of
/// whitespace (including newlines) becomes a single space.
///
/// ```
/// use pdf_audiobook::tts::chunk::normalize;
///
/// assert_eq!(normalize("uma pala-\nvra\n\n  solta "), "uma palavra solta");
/// ```
pub fn normalize(text: &str) -> String {
    let joined = text.replace("-\r\n", "").replace("-\n", "");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into fragments of at most `max_chars` characters.
///
/// Fragments without a single letter or digit are dropped, so text made only
/// of punctuation or whitespace yields no fragments at all.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let normalized = normalize(text);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in sentences(&normalized) {
        for piece in split_long(sentence, max) {
            let piece_len = piece.chars().count();
            let needed = if current.is_empty() {
                piece_len
            } else {
                current_len + 1 + piece_len
            };

            if needed <= max {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(piece);
                current_len = needed;
            } else {
                chunks.push(std::mem::take(&mut current));
                current.push_str(piece);
                current_len = piece_len;
            }
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks.retain(|c| c.chars().any(char::is_alphanumeric));
    chunks
}

/// Sentences of already-normalised text, terminator included.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if TERMINATORS.contains(&c) && at_boundary {
            let end = i + c.len_utf8();
            out.push(text[start..end].trim());
            start = end;
        }
    }
    out.push(text[start..].trim());
    out.retain(|s| !s.is_empty());
    out
}

/// Cut `s` into pieces of at most `max` characters, at spaces when possible.
fn split_long(mut s: &str, max: usize) -> Vec<&str> {
    let mut out = Vec::new();

    while s.chars().count() > max {
        // Byte offset of the first character that does not fit.
        let limit = s.char_indices().nth(max).map_or(s.len(), |(i, _)| i);
        let cut = if s[limit..].starts_with(char::is_whitespace) {
            limit
        } else {
            s[..limit]
                .rfind(char::is_whitespace)
                .filter(|&i| i > 0)
                .unwrap_or(limit)
        };
        out.push(s[..cut].trim_end());
        s = s[cut..].trim_start();
    }
    if !s.is_empty() {
        out.push(s);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
