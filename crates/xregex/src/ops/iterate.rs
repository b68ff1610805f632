// forEach iteration and match()
use std::rc::Rc;

use super::exec::AnchorMode;
use super::subject::IntoSubject;
use crate::engine::{Engine, XResult};
use crate::pattern::{CompiledArtifact, MatchResult, Pattern, next_char_boundary};

/// How many matches an operation consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    One,
    All,
}

impl MatchScope {
    /// Explicit scope, or `All` for `g` patterns and `One` otherwise.
    pub(crate) fn resolve(scope: Option<MatchScope>, global: bool) -> MatchScope {
        scope.unwrap_or(if global { MatchScope::All } else { MatchScope::One })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matched {
    One(Option<String>),
    All(Vec<String>),
}

impl Matched {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Matched::One(m) => m.into_iter().collect(),
            Matched::All(all) => all,
        }
    }
}

/// Offset to resume from after `m`: its end, or one character further for
/// an empty match.
pub(crate) fn resume_offset(input: &str, m: &MatchResult) -> usize {
    if m.is_empty() {
        next_char_boundary(input, m.index())
    } else {
        m.end()
    }
}

/// Every non-overlapping match of `artifact` in `input`. A sticky artifact
/// stops at the first gap.
pub(crate) fn all_matches(
    artifact: &CompiledArtifact,
    input: &Rc<str>,
    namespaced: bool,
) -> XResult<Vec<MatchResult>> {
    let anchored = artifact.has_flag('y');
    let mut matches = Vec::new();
    let mut pos = 0;
    while let Some(m) = artifact.exec_at(input, pos, anchored, namespaced)? {
        pos = resume_offset(input, &m);
        matches.push(m);
    }
    Ok(matches)
}

impl Engine {
    /// Call `callback(match, match_number, subject, pattern)` for each match,
    /// starting at offset 0 whatever the cursor says. Afterwards the cursor
    /// is 0 for `g` patterns and restored to its prior value otherwise.
    pub fn for_each<F>(&self, subject: impl IntoSubject, pattern: &Pattern, mut callback: F) -> XResult<()>
    where
        F: FnMut(&MatchResult, usize, &str, &Pattern),
    {
        let input: Rc<str> = Rc::from(subject.into_subject()?);
        let artifact = pattern.artifact();
        let global = artifact.has_flag('g');
        let anchored = artifact.has_flag('y');
        let namespaced = self.namespaced();
        let saved_cursor = pattern.last_index();

        let mut pos = 0;
        let mut count = 0;
        while let Some(m) = artifact.exec_at(&input, pos, anchored, namespaced)? {
            if global {
                pattern.set_last_index(m.end());
            }
            callback(&m, count, &input, pattern);
            count += 1;
            pos = resume_offset(&input, &m);
        }
        pattern.set_last_index(if global { 0 } else { saved_cursor });
        Ok(())
    }

    /// First match or all matches as strings, per `scope`.
    pub fn match_scope(
        &self,
        subject: impl IntoSubject,
        pattern: &Pattern,
        scope: Option<MatchScope>,
    ) -> XResult<Matched> {
        match MatchScope::resolve(scope, pattern.is_global()) {
            MatchScope::One => {
                let found = self.search_at(subject, pattern, 0, AnchorMode::Unset)?;
                Ok(Matched::One(found.map(|m| m.matched)))
            }
            MatchScope::All => {
                let input: Rc<str> = Rc::from(subject.into_subject()?);
                let matches = all_matches(&pattern.artifact(), &input, self.namespaced())?;
                if pattern.is_global() {
                    pattern.set_last_index(0);
                }
                Ok(Matched::All(matches.into_iter().map(|m| m.matched).collect()))
            }
        }
    }

    pub fn match_one(&self, subject: impl IntoSubject, pattern: &Pattern) -> XResult<Option<String>> {
        match self.match_scope(subject, pattern, Some(MatchScope::One))? {
            Matched::One(m) => Ok(m),
            Matched::All(all) => Ok(all.into_iter().next()),
        }
    }

    pub fn match_all(&self, subject: impl IntoSubject, pattern: &Pattern) -> XResult<Vec<String>> {
        Ok(self.match_scope(subject, pattern, Some(MatchScope::All))?.into_vec())
    }
}
