// Single-match search with uniform cursor handling
use std::rc::Rc;

use super::subject::IntoSubject;
use crate::engine::{Engine, XResult};
use crate::pattern::{MatchResult, Pattern};

/// Whether a search must match exactly at the start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorMode {
    /// Follow the pattern's `y` flag
    #[default]
    Unset,
    Anchored,
    Unanchored,
}

impl AnchorMode {
    pub(crate) fn resolve(self, pattern_sticky: bool) -> bool {
        match self {
            AnchorMode::Unset => pattern_sticky,
            AnchorMode::Anchored => true,
            AnchorMode::Unanchored => false,
        }
    }
}

impl Engine {
    /// First match in `subject`, searching from offset 0.
    pub fn search(
        &self,
        subject: impl IntoSubject,
        pattern: &Pattern,
    ) -> XResult<Option<MatchResult>> {
        self.search_at(subject, pattern, 0, AnchorMode::Unset)
    }

    /// Search from byte offset `start`. The pattern's cursor is never read;
    /// under flag `g` it is left at the match end, or 0 when nothing matched.
    pub fn search_at(
        &self,
        subject: impl IntoSubject,
        pattern: &Pattern,
        start: usize,
        anchor: AnchorMode,
    ) -> XResult<Option<MatchResult>> {
        let input: Rc<str> = Rc::from(subject.into_subject()?);
        self.exec_input(&input, pattern, start, anchor)
    }

    pub(crate) fn exec_input(
        &self,
        input: &Rc<str>,
        pattern: &Pattern,
        start: usize,
        anchor: AnchorMode,
    ) -> XResult<Option<MatchResult>> {
        let artifact = pattern.artifact();
        let anchored = anchor.resolve(artifact.has_flag('y'));
        let result = artifact.exec_at(input, start, anchored, self.namespaced())?;
        if artifact.has_flag('g') {
            pattern.set_last_index(result.as_ref().map_or(0, MatchResult::end));
        }
        Ok(result)
    }

    pub fn test(&self, subject: impl IntoSubject, pattern: &Pattern) -> XResult<bool> {
        self.test_at(subject, pattern, 0, AnchorMode::Unset)
    }

    pub fn test_at(
        &self,
        subject: impl IntoSubject,
        pattern: &Pattern,
        start: usize,
        anchor: AnchorMode,
    ) -> XResult<bool> {
        Ok(self.search_at(subject, pattern, start, anchor)?.is_some())
    }
}
