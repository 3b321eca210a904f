//! Deterministic text measurement.
//!
//! A character-class weighted estimate, good enough to center labels and
//! size boxes without font assets. Cosmetic only; nothing structural depends
//! on it.

const LINE_HEIGHT: f64 = 1.2;

fn char_width_factor(c: char) -> f64 {
    match c {
        'i' | 'j' | 'l' | 't' | 'f' | 'r' | '.' | ',' | '\'' | '|' | '!' | ':' | ';' | '('
        | ')' | '[' | ']' | '{' | '}' => 0.35,
        'm' | 'w' | 'M' | 'W' | '@' | '%' | '…' => 0.95,
        ' ' => 0.4,
        c if c.is_ascii_uppercase() => 0.72,
        c if c.is_ascii_digit() => 0.6,
        _ => 0.55,
    }
}

/// Estimated rendered width of `text` at `font_size`, widest line winning.
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.lines()
        .map(|line| line.chars().map(char_width_factor).sum::<f64>())
        .fold(0.0, f64::max)
        * font_size
}

/// Estimated rendered height of a (possibly multi-line) block.
pub fn text_block_height(text: &str, font_size: f64) -> f64 {
    let lines = text.lines().count().max(1);
    lines as f64 * font_size * LINE_HEIGHT
}

/// Truncates an annotation for in-box display. Detail text can be arbitrarily
/// long (predicates, file lists); boxes only grow so far.
pub fn clip_detail(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_chars_measure_wider() {
        let narrow = estimate_text_width("iiii", 16.0);
        let wide = estimate_text_width("mmmm", 16.0);
        assert!(wide > narrow * 2.0);
    }

    #[test]
    fn widest_line_wins() {
        let w = estimate_text_width("ab\nabcdef", 16.0);
        assert_eq!(w, estimate_text_width("abcdef", 16.0));
    }

    #[test]
    fn block_height_counts_lines() {
        assert_eq!(text_block_height("a\nb\nc", 10.0), 36.0);
        assert_eq!(text_block_height("", 10.0), 12.0);
    }

    #[test]
    fn clipping_appends_an_ellipsis() {
        assert_eq!(clip_detail("short", 10), "short");
        let clipped = clip_detail("a very long predicate over many columns", 10);
        assert_eq!(clipped.chars().count(), 10);
        assert!(clipped.ends_with('…'));
    }
}
