// JS-flavor pattern text -> fancy-regex pattern text
//
// The compiler emits patterns in the JavaScript dialect. The native engine
// disagrees with that dialect in a handful of places, fixed up here:
//   1. `\d` `\w` `\s` and their negations use the JS (ASCII / JS whitespace) sets
//   2. `.` excludes JS line terminators unless flag `s`
//   3. `[]`, `[^]`, a bare `[` inside a class, lone `{` `}` `]`
//   4. `\cX`, `\xHH`, `\uHHHH` (surrogate pairs joined), `\u{...}`, legacy octal
//   5. backreferences to groups that have not matched (yet) match the empty
//      string instead of failing
//   6. `\b` `\B` use the JS word set; `^` `$` under flag `m` honor every
//      JS line terminator
// Anything the native engine cannot express is a SyntaxError here rather
// than a pattern that silently means something else.

use crate::engine::xre_limits::MAX_CODE_POINT;
use crate::engine::{XRegexError, XResult};

const JS_WHITESPACE: &str = "\\t\\n\\x{0B}\\x{0C}\\r\\x{20}\\x{A0}\\x{1680}\\x{2000}-\\x{200A}\\x{2028}\\x{2029}\\x{202F}\\x{205F}\\x{3000}\\x{FEFF}";
const NOT_SPACE_IN_CLASS: &str = "\\x{00}-\\x{08}\\x{0E}-\\x{1F}\\x{21}-\\x{9F}\\x{A1}-\\x{167F}\\x{1681}-\\x{1FFF}\\x{200B}-\\x{2027}\\x{202A}-\\x{202E}\\x{2030}-\\x{205E}\\x{2060}-\\x{2FFF}\\x{3001}-\\x{FEFE}\\x{FF00}-\\x{10FFFF}";
const NOT_DIGIT_IN_CLASS: &str = "\\x{00}-\\x{2F}\\x{3A}-\\x{10FFFF}";
const NOT_WORD_IN_CLASS: &str =
    "\\x{00}-\\x{2F}\\x{3A}-\\x{40}\\x{5B}-\\x{5E}\\x{60}\\x{7B}-\\x{10FFFF}";
const WORD_BOUNDARY: &str =
    "(?:(?<=[A-Za-z0-9_])(?![A-Za-z0-9_])|(?<![A-Za-z0-9_])(?=[A-Za-z0-9_]))";
const NOT_WORD_BOUNDARY: &str =
    "(?:(?<=[A-Za-z0-9_])(?=[A-Za-z0-9_])|(?<![A-Za-z0-9_])(?![A-Za-z0-9_]))";
const LINE_START: &str = "(?:^|(?<=[\\n\\r\\x{2028}\\x{2029}]))";
const LINE_END: &str = "(?:$|(?=[\\n\\r\\x{2028}\\x{2029}]))";

/// Translate `source` (JS flavor, already free of augmented syntax) into
/// a pattern for fancy-regex, honoring native flags `i`, `m`, `s`, `u`.
pub fn translate(source: &str, flags: &str) -> XResult<String> {
    let mut tr = Translator {
        chars: source.chars().collect(),
        pos: 0,
        out: String::with_capacity(source.len() + 8),
        dot_all: flags.contains('s'),
        multiline: flags.contains('m'),
        unicode: flags.contains('u'),
        group_names: Vec::new(),
        groups_seen: 0,
    };
    tr.group_names = scan_groups(&tr.chars);
    if flags.contains('i') {
        tr.out.push_str("(?i)");
    }
    tr.run()?;
    Ok(tr.out)
}

struct Translator {
    chars: Vec<char>,
    pos: usize,
    out: String,
    dot_all: bool,
    multiline: bool,
    unicode: bool,
    /// One entry per capturing group, in opening order
    group_names: Vec<Option<String>>,
    groups_seen: usize,
}

impl Translator {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn run(&mut self) -> XResult<()> {
        while let Some(c) = self.peek(0) {
            match c {
                '\\' => self.escape_outside()?,
                '.' => {
                    if self.dot_all {
                        self.out.push_str("(?s:.)");
                    } else {
                        self.out.push_str("[^\\n\\r\\x{2028}\\x{2029}]");
                    }
                    self.pos += 1;
                }
                '[' => self.class()?,
                '(' => self.group_open(),
                '^' if self.multiline => {
                    self.out.push_str(LINE_START);
                    self.pos += 1;
                }
                '$' if self.multiline => {
                    self.out.push_str(LINE_END);
                    self.pos += 1;
                }
                '{' => {
                    let len = quantifier_len(&self.chars, self.pos);
                    if len > 0 {
                        self.out.extend(&self.chars[self.pos..self.pos + len]);
                        self.pos += len;
                    } else {
                        self.out.push_str("\\{");
                        self.pos += 1;
                    }
                }
                '}' | ']' => {
                    self.out.push('\\');
                    self.out.push(c);
                    self.pos += 1;
                }
                _ => {
                    self.out.push(c);
                    self.pos += 1;
                }
            }
        }
        Ok(())
    }

    fn group_open(&mut self) {
        let named = self.peek(1) == Some('?')
            && match (self.peek(2), self.peek(3)) {
                (Some('<'), Some(n)) => n != '=' && n != '!',
                (Some('P'), Some('<')) => true,
                _ => false,
            };
        if self.peek(1) != Some('?') || named {
            self.groups_seen += 1;
        }
        self.out.push('(');
        self.pos += 1;
    }

    fn escape_outside(&mut self) -> XResult<()> {
        let Some(next) = self.peek(1) else {
            return Err(XRegexError::syntax("\\ at end of pattern"));
        };
        self.pos += 2;
        match next {
            'd' => self.out.push_str("[0-9]"),
            'D' => self.out.push_str("[^0-9]"),
            'w' => self.out.push_str("[A-Za-z0-9_]"),
            'W' => self.out.push_str("[^A-Za-z0-9_]"),
            's' => {
                self.out.push('[');
                self.out.push_str(JS_WHITESPACE);
                self.out.push(']');
            }
            'S' => {
                self.out.push_str("[^");
                self.out.push_str(JS_WHITESPACE);
                self.out.push(']');
            }
            'b' => self.out.push_str(WORD_BOUNDARY),
            'B' => self.out.push_str(NOT_WORD_BOUNDARY),
            'n' | 'r' | 't' => {
                self.out.push('\\');
                self.out.push(next);
            }
            'f' => self.out.push_str("\\x{C}"),
            'v' => self.out.push_str("\\x{B}"),
            '1'..='9' => self.backreference(next)?,
            'k' if self.peek(0) == Some('<') => self.copy_named_reference()?,
            'p' | 'P' if self.peek(0) == Some('{') => self.copy_property(next)?,
            _ => {
                let c = self.escaped_char(next)?;
                push_literal(&mut self.out, c);
            }
        }
        Ok(())
    }

    fn backreference(&mut self, first: char) -> XResult<()> {
        let start = self.pos - 1;
        let mut end = self.pos;
        while end < self.chars.len() && self.chars[end].is_ascii_digit() {
            end += 1;
        }
        let digits: String = self.chars[start..end].iter().collect();
        let n = digits.parse::<usize>().unwrap_or(usize::MAX);
        if n <= self.group_names.len() {
            self.pos = end;
            self.push_backreference(n);
            return Ok(());
        }
        if self.unicode {
            return Err(XRegexError::syntax(format!(
                "Backreference to undefined group \\{}",
                digits
            )));
        }
        let c = self.escaped_char(first)?;
        push_literal(&mut self.out, c);
        Ok(())
    }

    /// A group that has not been opened yet, or did not take part in the
    /// match, matches the empty string.
    fn push_backreference(&mut self, n: usize) {
        if n > self.groups_seen {
            self.out.push_str("(?:)");
        } else {
            self.out.push_str(&format!("(?({})\\{}|)", n, n));
        }
    }

    fn copy_named_reference(&mut self) -> XResult<()> {
        let Some(close) = self.chars[self.pos..].iter().position(|&c| c == '>') else {
            return Err(XRegexError::syntax("Invalid named reference"));
        };
        let name: String = self.chars[self.pos + 1..self.pos + close].iter().collect();
        let index = self
            .group_names
            .iter()
            .position(|n| n.as_deref() == Some(name.as_str()));
        let Some(index) = index else {
            return Err(XRegexError::syntax(format!(
                "Backreference to undefined group {}",
                name
            )));
        };
        self.pos += close + 1;
        self.push_backreference(index + 1);
        Ok(())
    }

    fn copy_property(&mut self, kind: char) -> XResult<()> {
        let Some(close) = self.chars[self.pos..].iter().position(|&c| c == '}') else {
            return Err(XRegexError::syntax(format!(
                "Unterminated property escape \\{}",
                kind
            )));
        };
        self.out.push('\\');
        self.out.push(kind);
        self.out.extend(&self.chars[self.pos..=self.pos + close]);
        self.pos += close + 1;
        Ok(())
    }

    /// Resolve an escape that denotes exactly one character. `self.pos`
    /// sits just after `\c` where `c` is `first`.
    fn escaped_char(&mut self, first: char) -> XResult<char> {
        match first {
            '0'..='7' => Ok(self.legacy_octal(first)),
            'c' => match self.peek(0) {
                Some(l) if l.is_ascii_alphabetic() => {
                    self.pos += 1;
                    Ok(char::from((l as u8) % 32))
                }
                // `\c` without a control letter is a literal backslash + c
                _ => {
                    self.pos -= 1;
                    Ok('\\')
                }
            },
            'x' => match self.hex_digits(2) {
                Some(v) => {
                    self.pos += 2;
                    Ok(code_point(v)?)
                }
                None => Ok('x'),
            },
            'u' => self.unicode_escape(),
            other => Ok(other),
        }
    }

    fn legacy_octal(&mut self, first: char) -> char {
        let max_len = if first <= '3' { 3 } else { 2 };
        let mut value = first.to_digit(8).unwrap_or(0);
        let mut len = 1;
        while len < max_len {
            match self.peek(0).and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    value = value * 8 + d;
                    self.pos += 1;
                    len += 1;
                }
                None => break,
            }
        }
        char::from_u32(value).unwrap_or('\0')
    }

    fn unicode_escape(&mut self) -> XResult<char> {
        if self.peek(0) == Some('{') {
            let close = self.chars[self.pos..].iter().position(|&c| c == '}');
            if let Some(close) = close {
                let hex: String = self.chars[self.pos + 1..self.pos + close].iter().collect();
                if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    let value = u32::from_str_radix(&hex, 16).unwrap_or(u32::MAX);
                    if value > MAX_CODE_POINT {
                        return Err(XRegexError::syntax(format!(
                            "Invalid Unicode code point \\u{{{}}}",
                            hex
                        )));
                    }
                    self.pos += close + 1;
                    return code_point(value);
                }
            }
            return Ok('u');
        }
        let Some(unit) = self.hex_digits(4) else {
            return Ok('u');
        };
        self.pos += 4;
        if (0xD800..0xDC00).contains(&unit)
            && self.peek(0) == Some('\\')
            && self.peek(1) == Some('u')
        {
            self.pos += 2;
            if let Some(low) = self.hex_digits(4).filter(|v| (0xDC00..0xE000).contains(v)) {
                self.pos += 4;
                return code_point(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00));
            }
            self.pos -= 2;
        }
        code_point(unit)
    }

    fn hex_digits(&self, count: usize) -> Option<u32> {
        let digits = self.chars.get(self.pos..self.pos + count)?;
        if !digits.iter().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let s: String = digits.iter().collect();
        u32::from_str_radix(&s, 16).ok()
    }

    fn class(&mut self) -> XResult<()> {
        match (self.peek(1), self.peek(2)) {
            (Some(']'), _) => {
                self.out.push_str("(?:\\b\\B)");
                self.pos += 2;
                return Ok(());
            }
            (Some('^'), Some(']')) => {
                self.out.push_str("(?s:.)");
                self.pos += 3;
                return Ok(());
            }
            _ => {}
        }
        self.pos += 1;
        self.out.push('[');
        if self.peek(0) == Some('^') {
            self.out.push('^');
            self.pos += 1;
        }
        // set escapes like \d cannot be range endpoints
        let mut prev_set = false;
        loop {
            let Some(c) = self.peek(0) else {
                return Err(XRegexError::syntax("Unterminated character class"));
            };
            let after_set = prev_set;
            prev_set = false;
            match c {
                ']' => {
                    self.out.push(']');
                    self.pos += 1;
                    return Ok(());
                }
                '\\' => prev_set = self.escape_in_class()?,
                '[' | '&' | '~' | '^' => {
                    self.out.push('\\');
                    self.out.push(c);
                    self.pos += 1;
                }
                '-' => {
                    let next_is_set = self.peek(1) == Some('\\')
                        && matches!(self.peek(2), Some('d' | 'D' | 'w' | 'W' | 's' | 'S'));
                    let literal = after_set
                        || next_is_set
                        || self.peek(1) == Some('-')
                        || (self.pos > 0 && self.chars[self.pos - 1] == '-');
                    self.out.push_str(if literal { "\\-" } else { "-" });
                    self.pos += 1;
                }
                _ => {
                    self.out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    /// Returns true when the escape stood for a set rather than one char.
    fn escape_in_class(&mut self) -> XResult<bool> {
        let Some(next) = self.peek(1) else {
            return Err(XRegexError::syntax("\\ at end of pattern"));
        };
        self.pos += 2;
        if matches!(next, 'd' | 'D' | 'w' | 'W' | 's' | 'S') {
            let set = match next {
                'd' => "0-9",
                'D' => NOT_DIGIT_IN_CLASS,
                'w' => "A-Za-z0-9_",
                'W' => NOT_WORD_IN_CLASS,
                's' => JS_WHITESPACE,
                _ => NOT_SPACE_IN_CLASS,
            };
            self.out.push_str(set);
            return Ok(true);
        }
        match next {
            'b' => self.out.push_str("\\x{08}"),
            'n' | 'r' | 't' => {
                self.out.push('\\');
                self.out.push(next);
            }
            'p' | 'P' if self.peek(0) == Some('{') => {
                self.copy_property(next)?;
                return Ok(true);
            }
            _ => {
                let c = self.escaped_char(next)?;
                push_hex(&mut self.out, c);
            }
        }
        Ok(false)
    }
}

/// `{n}`, `{n,}` or `{n,m}` starting at `pos`; 0 when it is not a quantifier.
pub(crate) fn quantifier_len(chars: &[char], pos: usize) -> usize {
    let mut i = pos + 1;
    let digits_start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return 0;
    }
    if i < chars.len() && chars[i] == ',' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && chars[i] == '}' {
        i + 1 - pos
    } else {
        0
    }
}

fn scan_groups(chars: &[char]) -> Vec<Option<String>> {
    let mut names = Vec::new();
    let mut in_class = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                if chars.get(i + 1) != Some(&'?') {
                    names.push(None);
                } else {
                    let name_start = match (chars.get(i + 2), chars.get(i + 3)) {
                        (Some('<'), Some(n)) if *n != '=' && *n != '!' => Some(i + 3),
                        (Some('P'), Some('<')) => Some(i + 4),
                        _ => None,
                    };
                    if let Some(start) = name_start {
                        let name: String =
                            chars[start..].iter().take_while(|&&c| c != '>').collect();
                        names.push(Some(name));
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    names
}

fn code_point(value: u32) -> XResult<char> {
    char::from_u32(value).ok_or_else(|| {
        XRegexError::syntax(format!(
            "Code point U+{:04X} cannot be matched by the native engine",
            value
        ))
    })
}

fn is_meta(c: char) -> bool {
    matches!(
        c,
        '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
    )
}

/// Emit `c` so it matches itself outside a class.
fn push_literal(out: &mut String, c: char) {
    if is_meta(c) {
        out.push('\\');
        out.push(c);
    } else if c.is_alphanumeric() || c == '_' {
        out.push(c);
    } else {
        push_hex(out, c);
    }
}

fn push_hex(out: &mut String, c: char) {
    out.push_str(&format!("\\x{{{:X}}}", c as u32));
}
