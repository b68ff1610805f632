/// Escape regex metacharacters so `text` matches itself literally. Also
/// escapes `,`, `#` and whitespace, so the result is safe under flag `x`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_special(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn is_special(c: char) -> bool {
    matches!(
        c,
        '-' | '[' | ']' | '{' | '}' | '(' | ')' | '*' | '+' | '?' | '.' | ',' | '\\' | '^' | '$'
            | '|' | '#'
    ) || c.is_whitespace()
        || c == '\u{FEFF}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_metacharacters() {
        assert_eq!(escape("[a-z] (x)?"), "\\[a\\-z\\]\\ \\(x\\)\\?");
        assert_eq!(escape("#,\t"), "\\#\\,\\\t");
        assert_eq!(escape("abc"), "abc");
    }
}
