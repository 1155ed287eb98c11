//! Text helpers for primitive values and column padding.

/// Width in runes, which is what the column padding counts.
pub(super) fn rune_len(s: &str) -> usize {
    s.chars().count()
}

/// Pad `s` with spaces until it is `width` runes wide.
pub(super) fn pad_right(s: &mut String, width: usize) {
    let len = rune_len(s);
    if len < width {
        s.push_str(&" ".repeat(width - len));
    }
}

/// Cut a string to `max_len` runes (marking the cut with `…`) and escape
/// the control characters that would break the layout.
pub(super) fn escape(s: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    for c in chars.by_ref().take(max_len) {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{1b}' => out.push_str("\\x1b"),
            c => out.push(c),
        }
    }
    if chars.next().is_some() {
        out.push('…');
    }
    out
}

/// Six fixed decimals, with the special values spelled out.
pub(super) fn float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_owned()
    } else if f.is_infinite() {
        if f > 0.0 { "+Inf" } else { "-Inf" }.to_owned()
    } else {
        format!("{f:.6}")
    }
}
