// Native token lengths
// When no token rule applies, the compiler copies one whole native construct
// so a rule can never start matching in the middle of an escape or a
// quantifier.

use super::token_registry::Scope;

/// Byte length of the native construct starting at `pos`. Never 0 while
/// `pos < pattern.len()`.
pub fn token_len(pattern: &str, pos: usize, scope: Scope) -> usize {
    let bytes = &pattern.as_bytes()[pos..];
    let len = match scope {
        Scope::Default => default_token(bytes),
        Scope::Class => class_token(bytes),
    };
    if len > 0 {
        len
    } else {
        char_len(pattern, pos)
    }
}

fn default_token(b: &[u8]) -> usize {
    match b.first() {
        Some(b'\\') => default_escape(b),
        Some(b'(') => {
            if b.starts_with(b"(?<=") || b.starts_with(b"(?<!") {
                4
            } else if b.starts_with(b"(?:") || b.starts_with(b"(?=") || b.starts_with(b"(?!") {
                3
            } else {
                0
            }
        }
        Some(b'?' | b'*' | b'+') if b.get(1) == Some(&b'?') => 2,
        Some(b'{') => {
            let len = interval_len(b);
            if len > 0 && b.get(len) == Some(&b'?') {
                len + 1
            } else {
                len
            }
        }
        _ => 0,
    }
}

fn default_escape(b: &[u8]) -> usize {
    match b.get(1) {
        Some(b'0') => 2 + octal_len(&b[2..]),
        Some(b'1'..=b'9') => 1 + digits_len(&b[1..]),
        Some(_) => shared_escape(b),
        None => 0,
    }
}

fn class_token(b: &[u8]) -> usize {
    if b.first() != Some(&b'\\') {
        return 0;
    }
    match b.get(1) {
        Some(b'0'..=b'7') => 1 + octal_len(&b[1..]),
        Some(_) => shared_escape(b),
        None => 0,
    }
}

/// `\xHH`, `\uHHHH`, `\u{H+}`, `\cX`, or a backslash and one char.
fn shared_escape(b: &[u8]) -> usize {
    match b.get(1) {
        Some(b'x') if hex_len(&b[2..]) >= 2 => 4,
        Some(b'u') if hex_len(&b[2..]) >= 4 => 6,
        Some(b'u') if b.get(2) == Some(&b'{') => {
            let digits = hex_len(&b[3..]);
            if digits > 0 && b.get(3 + digits) == Some(&b'}') {
                4 + digits
            } else {
                0
            }
        }
        Some(b'c') if b.get(2).is_some_and(u8::is_ascii_alphabetic) => 3,
        Some(&lead) => 1 + utf8_width(lead),
        None => 0,
    }
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

/// Octal digits following a leading octal digit: `[0-3][0-7]{0,2}` or
/// `[4-7][0-7]?`. `b[0]` is the leading digit.
fn octal_len(b: &[u8]) -> usize {
    let max = match b.first() {
        Some(b'0'..=b'3') => 3,
        Some(b'4'..=b'7') => 2,
        _ => return 0,
    };
    b.iter()
        .take(max)
        .take_while(|c| matches!(c, b'0'..=b'7'))
        .count()
}

fn digits_len(b: &[u8]) -> usize {
    b.iter().take_while(|c| c.is_ascii_digit()).count()
}

fn hex_len(b: &[u8]) -> usize {
    b.iter().take_while(|c| c.is_ascii_hexdigit()).count()
}

/// `{n}`, `{n,}` or `{n,m}`; 0 otherwise.
pub(crate) fn interval_len(b: &[u8]) -> usize {
    if b.first() != Some(&b'{') {
        return 0;
    }
    let mut i = 1 + digits_len(&b[1..]);
    if i == 1 {
        return 0;
    }
    if b.get(i) == Some(&b',') {
        i += 1;
        i += digits_len(&b[i..]);
    }
    if b.get(i) == Some(&b'}') { i + 1 } else { 0 }
}

fn char_len(pattern: &str, pos: usize) -> usize {
    pattern[pos..].chars().next().map_or(1, char::len_utf8)
}
