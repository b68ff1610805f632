// union: merge patterns and literal strings into one pattern
use smol_str::SmolStr;

use super::escape::escape;
use crate::engine::{Engine, XRegexError, XResult};
use crate::pattern::Pattern;

/// One element of a union.
#[derive(Debug, Clone)]
pub enum UnionPart<'a> {
    Pattern(&'a Pattern),
    /// Matched literally
    Text(String),
}

impl UnionPart<'_> {
    /// Literal element from any displayable value.
    pub fn display(value: impl std::fmt::Display) -> Self {
        UnionPart::Text(value.to_string())
    }
}

impl<'a> From<&'a Pattern> for UnionPart<'a> {
    fn from(pattern: &'a Pattern) -> Self {
        UnionPart::Pattern(pattern)
    }
}

impl From<&str> for UnionPart<'_> {
    fn from(text: &str) -> Self {
        UnionPart::Text(text.to_string())
    }
}

impl From<String> for UnionPart<'_> {
    fn from(text: String) -> Self {
        UnionPart::Text(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    /// Alternation, `a|b`
    #[default]
    Or,
    /// Concatenation, `ab`
    None,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnionOptions {
    pub conjunction: Conjunction,
}

impl Engine {
    /// Build one pattern out of `parts`. Backreferences inside each pattern
    /// are renumbered and group names are kept; only `flags` apply.
    pub fn union(&self, parts: &[UnionPart<'_>], flags: &str, options: UnionOptions) -> XResult<Pattern> {
        if parts.is_empty() {
            return Err(XRegexError::type_error(
                "Must provide a nonempty array of patterns to merge",
            ));
        }
        let mut elements = Vec::with_capacity(parts.len());
        let mut total_captures = 0;
        for part in parts {
            let element = match part {
                UnionPart::Text(text) => escape(text),
                UnionPart::Pattern(pattern) => {
                    let names = pattern.capture_names();
                    // recompiling without flags rejects octal escapes and
                    // forward references
                    let plain = self.compile_artifact(&pattern.source(), "")?;
                    renumber(&plain.native_source, &names, &mut total_captures)
                }
            };
            elements.push(format!("(?:{})", element));
        }
        let separator = match options.conjunction {
            Conjunction::Or => "|",
            Conjunction::None => "",
        };
        self.compile(&elements.join(separator), flags)
    }
}

/// Give capturing groups their names back and shift backreferences past the
/// `total` groups of earlier elements. `total` grows by this element's groups.
fn renumber(source: &str, names: &[Option<SmolStr>], total: &mut usize) -> String {
    let prior = *total;
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len() + 16);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '(' if chars.get(i + 1) != Some(&'?') => {
                match names.get(*total - prior).cloned().flatten() {
                    Some(name) => {
                        out.push_str("(?<");
                        out.push_str(&name);
                        out.push('>');
                    }
                    None => out.push('('),
                }
                *total += 1;
                i += 1;
            }
            '\\' if chars.get(i + 1).is_some_and(|c| ('1'..='9').contains(c)) => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end].is_ascii_digit() {
                    end += 1;
                }
                let digits: String = chars[start..end].iter().collect();
                let n = digits.parse::<usize>().unwrap_or(0);
                out.push('\\');
                out.push_str(itoa::Buffer::new().format(n + prior));
                i = end;
            }
            '\\' => {
                out.extend(chars.get(i..i + 2).unwrap_or(&chars[i..]));
                i += 2;
            }
            '[' => {
                let end = class_end(&chars, i);
                out.extend(&chars[i..end]);
                i = end;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Index just past the `]` closing the class that opens at `start`, or
/// `start + 1` when it never closes.
fn class_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            ']' => return i + 1,
            _ => i += 1,
        }
    }
    start + 1
}
