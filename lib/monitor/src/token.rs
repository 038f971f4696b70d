//! Whitespace tokenizer.
//!
//! Tokens are borrowed slices of the input line; nothing is copied or
//! rewritten in place.

/// Returns the next whitespace-delimited token of `*cursor` and advances the
/// cursor past it and its trailing delimiter.
///
/// Runs of whitespace count as one delimiter. Once the input is exhausted
/// every call returns `""`, so callers may ask for more tokens than exist.
pub fn next_token<'a>(cursor: &mut &'a str) -> &'a str {
    let s = cursor.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => {
            let token = &s[..end];
            // whitespace characters may be wider than one byte
            let delim = s[end..].chars().next().map_or(0, char::len_utf8);
            *cursor = &s[end + delim..];
            token
        }
        None => {
            *cursor = &s[s.len()..];
            s
        }
    }
}
