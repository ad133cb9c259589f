use once_cell::sync::Lazy;
use regex::Regex;

static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace run"));

/// First `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Collapses internal whitespace runs to single spaces and trims the ends.
pub fn squash_ws(s: &str) -> String {
    WS_RUN_RE.replace_all(s.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte characters count as one.
        assert_eq!(truncate_chars("日本語です", 2), "日本");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn squash_collapses_runs() {
        assert_eq!(squash_ws("  a \t b\n\nc  "), "a b c");
        assert_eq!(squash_ws(""), "");
    }
}
