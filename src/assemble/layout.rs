//! Greedy word-wrapping against measured font widths.

use super::fonts::{text_width, Face};

/// Split text on whitespace and pack words greedily into lines no wider than
/// `max_width_pt` when measured at `size_pt` in `face`.
///
/// A single word wider than the line is emitted on its own line rather than
/// split mid-word. Returns no lines for whitespace-only input.
pub fn wrap_words(text: &str, max_width_pt: f32, size_pt: f32, face: Face) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, size_pt, face) > max_width_pt && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_no_lines() {
        assert!(wrap_words("", 100.0, 12.0, Face::Regular).is_empty());
        assert!(wrap_words("   \n\t ", 100.0, 12.0, Face::Regular).is_empty());
    }

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap_words("hello world", 500.0, 12.0, Face::Regular);
        assert_eq!(lines, vec!["hello world"]);
    }

    #[test]
    fn test_wrapping_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        let max = 80.0;
        let lines = wrap_words(text, max, 12.0, Face::Regular);
        assert!(lines.len() > 1);
        for line in &lines {
            // Each emitted line fits unless it is a single overlong word.
            if line.contains(' ') {
                assert!(text_width(line, 12.0, Face::Regular) <= max);
            }
        }
        // No words lost or reordered.
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_overlong_word_kept_whole() {
        let lines = wrap_words("a Pneumonoultramicroscopicsilicovolcanoconiosis b", 40.0, 12.0, Face::Regular);
        assert!(lines
            .iter()
            .any(|l| l == "Pneumonoultramicroscopicsilicovolcanoconiosis"));
    }

    #[test]
    fn test_collapses_internal_whitespace() {
        let lines = wrap_words("a   b\n\nc", 500.0, 12.0, Face::Regular);
        assert_eq!(lines, vec!["a b c"]);
    }
}
