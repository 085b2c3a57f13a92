// src/utils/text.rs

//! Text shaping helpers for reply bodies.

use unicode_segmentation::UnicodeSegmentation;

const ELLIPSIS: &str = "...";

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` to at most `limit` characters without splitting words.
///
/// When words are dropped, `...` is appended, so the result may be up to
/// `limit + 3` characters long. If the first word alone is longer than
/// `limit`, it is hard-cut to exactly `limit` characters with no ellipsis.
/// Lengths are counted in grapheme clusters.
pub fn truncate(text: &str, limit: usize) -> String {
    let mut words = text.split_whitespace();

    let Some(first) = words.next() else {
        return String::new();
    };

    if first.graphemes(true).count() > limit {
        return first.graphemes(true).take(limit).collect();
    }

    let mut out = String::new();
    let mut out_len = 0;

    for word in std::iter::once(first).chain(words) {
        let word_len = word.graphemes(true).count();
        if out_len + word_len > limit {
            return format!("{}{ELLIPSIS}", out.trim_end());
        }
        out.push_str(word);
        out.push(' ');
        out_len += word_len + 1;
    }

    out.trim_end().to_string()
}
