// matchChain: each pattern searches the matches of the one before it
use smol_str::SmolStr;

use super::subject::IntoSubject;
use crate::engine::{Engine, XRegexError, XResult};
use crate::pattern::{MatchResult, Pattern};

/// Which part of a match a chain link hands to the next link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backref {
    /// Group number, 0 being the whole match
    Index(usize),
    Name(SmolStr),
}

impl Backref {
    /// Value of this backreference in `m`. A group that exists but did not
    /// participate yields `""`.
    fn resolve(&self, m: &MatchResult) -> XResult<String> {
        let index = match self {
            Backref::Index(i) if *i < m.len() => Some(*i),
            Backref::Index(_) => None,
            Backref::Name(name) => m.name_index(name),
        };
        match index {
            Some(i) => Ok(m.get(i).unwrap_or("").to_string()),
            None => Err(XRegexError::reference(format!(
                "Backreference to undefined group: {}",
                self
            ))),
        }
    }
}

impl std::fmt::Display for Backref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backref::Index(i) => write!(f, "{}", i),
            Backref::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChainLink<'a> {
    pub pattern: &'a Pattern,
    /// `None` forwards the whole match
    pub backref: Option<Backref>,
}

impl<'a> From<&'a Pattern> for ChainLink<'a> {
    fn from(pattern: &'a Pattern) -> Self {
        ChainLink {
            pattern,
            backref: None,
        }
    }
}

impl<'a> From<(&'a Pattern, usize)> for ChainLink<'a> {
    fn from((pattern, index): (&'a Pattern, usize)) -> Self {
        ChainLink {
            pattern,
            backref: Some(Backref::Index(index)),
        }
    }
}

impl<'a> From<(&'a Pattern, &str)> for ChainLink<'a> {
    fn from((pattern, name): (&'a Pattern, &str)) -> Self {
        ChainLink {
            pattern,
            backref: Some(Backref::Name(SmolStr::new(name))),
        }
    }
}

impl Engine {
    /// Run `links` in sequence: the first searches `subject`, each later one
    /// searches every value the previous link produced.
    pub fn match_chain(&self, subject: impl IntoSubject, links: &[ChainLink<'_>]) -> XResult<Vec<String>> {
        if links.is_empty() {
            return Err(XRegexError::type_error("Match chain must contain at least one pattern"));
        }
        let mut values = vec![subject.into_subject()?];
        for (level, link) in links.iter().enumerate() {
            let mut matches = Vec::new();
            let mut failure = None;
            for value in &values {
                self.for_each(value, link.pattern, |m, _, _, _| {
                    if failure.is_some() {
                        return;
                    }
                    match &link.backref {
                        None => matches.push(m.as_str().to_string()),
                        Some(backref) => match backref.resolve(m) {
                            Ok(v) => matches.push(v),
                            Err(e) => failure = Some(e),
                        },
                    }
                })?;
                if let Some(e) = failure.take() {
                    return Err(e);
                }
            }
            if matches.is_empty() || level == links.len() - 1 {
                return Ok(matches);
            }
            values = matches;
        }
        Ok(values)
    }
}
