// Replacement templates
// Parsed once against the search pattern's groups, so a bad reference fails
// before anything is substituted.

use smol_str::SmolStr;

use crate::engine::xre_limits::MAX_BARE_BACKREF_DIGITS;
use crate::engine::{XRegexError, XResult};
use crate::pattern::MatchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TemplatePart {
    Literal(String),
    Whole,
    Before,
    After,
    Group(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplacementTemplate {
    parts: Vec<TemplatePart>,
}

impl ReplacementTemplate {
    /// Parse `template` for a search with the given group names (one entry
    /// per capturing group).
    pub(crate) fn parse(template: &str, names: &[Option<SmolStr>]) -> XResult<Self> {
        let count = names.len();
        let mut parser = Parser {
            parts: Vec::new(),
            literal: String::new(),
        };
        let mut rest = template;
        while let Some(dollar) = rest.find('$') {
            parser.literal.push_str(&rest[..dollar]);
            let token = &rest[dollar..];
            let after = &token[1..];
            let consumed = match after.chars().next() {
                None => {
                    parser.literal.push('$');
                    1
                }
                Some('$') => {
                    parser.literal.push('$');
                    2
                }
                Some('&') => parser.push(TemplatePart::Whole, 2),
                Some('`') => parser.push(TemplatePart::Before, 2),
                Some('\'') => parser.push(TemplatePart::After, 2),
                Some(open @ ('{' | '<')) => {
                    let close = if open == '{' { '}' } else { '>' };
                    let Some(end) = after[1..].find(close).filter(|&end| end > 0) else {
                        return Err(invalid_token(token));
                    };
                    let reference = &after[1..1 + end];
                    let part = bracketed(reference, names, &token[..end + 3])?;
                    parser.push(part, end + 3)
                }
                Some(d) if d.is_ascii_digit() => {
                    let digits: Vec<u32> = after
                        .chars()
                        .take(MAX_BARE_BACKREF_DIGITS)
                        .map_while(|c| c.to_digit(10))
                        .collect();
                    let len = 1 + digits.len();
                    bare(&digits, count, &token[..len], &mut parser)?;
                    len
                }
                Some(_) => return Err(invalid_token(token)),
            };
            rest = &token[consumed..];
        }
        parser.literal.push_str(rest);
        parser.flush();
        Ok(ReplacementTemplate {
            parts: parser.parts,
        })
    }

    pub(crate) fn expand(&self, m: &MatchResult, out: &mut String) {
        for part in &self.parts {
            match part {
                TemplatePart::Literal(s) => out.push_str(s),
                TemplatePart::Whole => out.push_str(m.as_str()),
                TemplatePart::Before => out.push_str(m.before()),
                TemplatePart::After => out.push_str(m.after()),
                TemplatePart::Group(n) => out.push_str(m.get(*n).unwrap_or("")),
            }
        }
    }
}

struct Parser {
    parts: Vec<TemplatePart>,
    literal: String,
}

impl Parser {
    fn flush(&mut self) {
        if !self.literal.is_empty() {
            self.parts.push(TemplatePart::Literal(std::mem::take(&mut self.literal)));
        }
    }

    /// Push `part` and report `consumed` bytes.
    fn push(&mut self, part: TemplatePart, consumed: usize) -> usize {
        self.flush();
        self.parts.push(part);
        consumed
    }
}

/// `${...}` or `$<...>`: a group number when it is one, otherwise a name.
fn bracketed(reference: &str, names: &[Option<SmolStr>], token: &str) -> XResult<TemplatePart> {
    if reference.bytes().all(|b| b.is_ascii_digit()) {
        let trimmed = reference.trim_start_matches('0');
        let n = if trimmed.is_empty() { Some(0) } else { trimmed.parse::<usize>().ok() };
        if let Some(n) = n.filter(|&n| n <= names.len()) {
            return Ok(group_part(n));
        }
    }
    match names.iter().position(|name| name.as_deref() == Some(reference)) {
        Some(i) => Ok(TemplatePart::Group(i + 1)),
        None => Err(undefined_group(token)),
    }
}

/// Bare `$N` or `$NN`.
fn bare(digits: &[u32], count: usize, token: &str, parser: &mut Parser) -> XResult<()> {
    let value = digits.iter().fold(0usize, |acc, &d| acc * 10 + d as usize);
    if value == 0 || value <= count {
        parser.push(group_part(value), 0);
        return Ok(());
    }
    if let [first, second] = digits
        && *first != 0
        && (*first as usize) <= count
    {
        parser.push(TemplatePart::Group(*first as usize), 0);
        parser.literal.push(char::from_digit(*second, 10).unwrap_or('0'));
        return Ok(());
    }
    Err(undefined_group(token))
}

fn group_part(n: usize) -> TemplatePart {
    if n == 0 { TemplatePart::Whole } else { TemplatePart::Group(n) }
}

fn undefined_group(token: &str) -> XRegexError {
    XRegexError::syntax(format!("Backreference to undefined group {}", token))
}

fn invalid_token(token: &str) -> XRegexError {
    let shown: String = token.chars().take(2).collect();
    XRegexError::syntax(format!("Invalid token {}", shown))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[Option<&str>]) -> Vec<Option<SmolStr>> {
        list.iter().map(|n| n.map(SmolStr::new)).collect()
    }

    fn parts(template: &str, count: usize) -> Vec<TemplatePart> {
        ReplacementTemplate::parse(template, &vec![None; count]).unwrap().parts
    }

    #[test]
    fn test_special_tokens() {
        use TemplatePart::*;
        assert_eq!(
            parts("[$$|$&|$`|$'|$0|$00]", 0),
            vec![
                Literal("[$|".into()),
                Whole,
                Literal("|".into()),
                Before,
                Literal("|".into()),
                After,
                Literal("|".into()),
                Whole,
                Literal("|".into()),
                Whole,
                Literal("]".into()),
            ]
        );
        assert_eq!(parts("a$", 0), vec![Literal("a$".into())]);
    }

    #[test]
    fn test_bare_two_digit_fallback() {
        use TemplatePart::*;
        assert_eq!(parts("$11", 11), vec![Group(11)]);
        assert_eq!(parts("$11", 1), vec![Group(1), Literal("1".into())]);
        assert_eq!(parts("$01", 1), vec![Group(1)]);
        assert!(ReplacementTemplate::parse("$01", &[]).is_err());
        assert!(ReplacementTemplate::parse("$2", &names(&[None])).is_err());
    }

    #[test]
    fn test_bracketed_numbers_and_names() {
        use TemplatePart::*;
        let named = names(&[Some("a"), Some("b")]);
        let parsed = ReplacementTemplate::parse("${b}$<a>${002}${0}", &named).unwrap();
        assert_eq!(parsed.parts, vec![Group(2), Group(1), Group(2), Whole]);
        assert!(ReplacementTemplate::parse("${3}", &named).unwrap_err().is_syntax());
        assert!(ReplacementTemplate::parse("${c}", &named).is_err());
        assert!(ReplacementTemplate::parse("${}", &named).is_err());
        assert!(ReplacementTemplate::parse("${a", &named).is_err());
    }

    #[test]
    fn test_unknown_dollar_token() {
        let err = ReplacementTemplate::parse("$x", &[]).unwrap_err();
        assert_eq!(err.message, "Invalid token $x");
    }
}
