//! Text utilities

/// Number of terminal columns `text` occupies (one per char).
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// First `width` columns of `text`, with `…` when something was cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Split `word` into chunks of at most `width` chars.
fn hard_split(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

/// Hard-wrap `text` at exactly `max_width` chars without touching whitespace.
#[must_use]
pub fn wrap_text_preserve(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    text.split('\n')
        .flat_map(|raw_line| {
            if raw_line.is_empty() {
                vec![String::new()]
            } else {
                hard_split(raw_line, max_width)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(wrap_text_preserve("ééé", 2), vec!["éé", "é"]);
        assert_eq!(truncate("résumé", 4), "rés…");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn preserve_keeps_spacing() {
        assert_eq!(wrap_text_preserve("  a  b", 3), vec!["  a", "  b"]);
        assert_eq!(wrap_text_preserve("", 3), vec![""]);
    }
}
