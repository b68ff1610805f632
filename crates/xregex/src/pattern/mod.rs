// Compiled patterns
//
// A `Pattern` is a shared handle: cloning it gives another reference to the
// same object, the way a regex object is shared in a scripting host. The
// handle owns two pieces of mutable state:
//   1. the compiled artifact, swapped out wholesale by an in-place recompile
//   2. the search cursor, only meaningful under flag `g`
// Everything inside the artifact is immutable once built.

mod match_result;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fancy_regex::{Captures, Regex, RegexBuilder};
use smol_str::SmolStr;

use crate::compiler::native_syntax;
use crate::engine::{EngineOption, XResult};

pub use match_result::{Groups, MatchResult};

/// Output of one compilation, shared through the artifact cache.
#[derive(Debug)]
pub struct CompiledArtifact {
    pub(crate) native_source: String,
    pub(crate) native_flags: String,
    pub(crate) regex: Rc<Regex>,
    pub(crate) group_names: Rc<[Option<SmolStr>]>,
    /// Augmented source before compilation; `None` for native-origin patterns
    pub(crate) source: Option<String>,
    /// Alphabetized augmented flags; `None` for native-origin patterns
    pub(crate) flags: Option<String>,
}

impl CompiledArtifact {
    /// Build the native regex for `native_source` and attach group metadata.
    ///
    /// `group_names` is `None` for native-origin patterns, whose names are
    /// read back from the native engine instead.
    pub(crate) fn build(
        native_source: String,
        native_flags: String,
        group_names: Option<Vec<Option<SmolStr>>>,
        source: Option<String>,
        flags: Option<String>,
        option: &EngineOption,
    ) -> XResult<CompiledArtifact> {
        let translated = native_syntax::translate(&native_source, &native_flags)?;
        let regex = RegexBuilder::new(&translated)
            .backtrack_limit(option.backtrack_limit)
            .delegate_size_limit(option.delegate_size_limit)
            .build()?;

        let native_count = regex.captures_len().saturating_sub(1);
        let mut names = match group_names {
            Some(names) => names,
            None => regex
                .capture_names()
                .skip(1)
                .map(|n| n.map(SmolStr::new))
                .collect(),
        };
        names.resize(native_count, None);

        Ok(CompiledArtifact {
            native_source,
            native_flags,
            regex: Rc::new(regex),
            group_names: Rc::from(names),
            source,
            flags,
        })
    }

    /// Same native regex, different flags. Used by copy and globalize.
    pub(crate) fn with_flags(
        &self,
        native_flags: String,
        flags: Option<String>,
    ) -> CompiledArtifact {
        CompiledArtifact {
            native_source: self.native_source.clone(),
            native_flags,
            regex: self.regex.clone(),
            group_names: self.group_names.clone(),
            source: self.source.clone(),
            flags,
        }
    }

    pub fn has_flag(&self, flag: char) -> bool {
        self.native_flags.contains(flag)
    }

    pub fn capture_count(&self) -> usize {
        self.group_names.len()
    }

    /// 1-based index of a named group.
    pub fn name_index(&self, name: &str) -> Option<usize> {
        self.group_names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .map(|i| i + 1)
    }

    /// Run the native engine from `pos`. With `anchored`, only a match that
    /// starts exactly at `pos` counts: the leftmost match is the only
    /// candidate that could start there.
    pub(crate) fn captures_at<'t>(
        &self,
        text: &'t str,
        pos: usize,
        anchored: bool,
    ) -> XResult<Option<Captures<'t>>> {
        if pos > text.len() {
            return Ok(None);
        }
        let pos = ceil_char_boundary(text, pos);
        let Some(caps) = self.regex.captures_from_pos(text, pos)? else {
            return Ok(None);
        };
        if anchored && caps.get(0).map(|m| m.start()) != Some(pos) {
            return Ok(None);
        }
        Ok(Some(caps))
    }

    pub(crate) fn exec_at(
        &self,
        input: &Rc<str>,
        pos: usize,
        anchored: bool,
        namespaced: bool,
    ) -> XResult<Option<MatchResult>> {
        let Some(caps) = self.captures_at(input, pos, anchored)? else {
            return Ok(None);
        };
        Ok(MatchResult::from_captures(
            &caps,
            input,
            &self.group_names,
            namespaced,
        ))
    }
}

struct PatternInner {
    artifact: RefCell<Rc<CompiledArtifact>>,
    last_index: Cell<usize>,
}

/// Handle to a compiled pattern.
#[derive(Clone)]
pub struct Pattern(Rc<PatternInner>);

impl Pattern {
    pub(crate) fn from_artifact(artifact: Rc<CompiledArtifact>) -> Pattern {
        Pattern(Rc::new(PatternInner {
            artifact: RefCell::new(artifact),
            last_index: Cell::new(0),
        }))
    }

    /// Snapshot of the current artifact. Holding it keeps a search stable
    /// even if the pattern is recompiled meanwhile.
    pub fn artifact(&self) -> Rc<CompiledArtifact> {
        self.0.artifact.borrow().clone()
    }

    pub(crate) fn replace_artifact(&self, artifact: Rc<CompiledArtifact>) {
        *self.0.artifact.borrow_mut() = artifact;
        self.0.last_index.set(0);
    }

    /// True when both handles point at the same pattern object.
    pub fn same(&self, other: &Pattern) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Native pattern text (JS flavor) after augmented syntax is rewritten.
    pub fn source(&self) -> String {
        self.0.artifact.borrow().native_source.clone()
    }

    /// Native flags, alphabetized.
    pub fn flags(&self) -> String {
        self.0.artifact.borrow().native_flags.clone()
    }

    /// Augmented source this pattern was compiled from.
    pub fn xsource(&self) -> Option<String> {
        self.0.artifact.borrow().source.clone()
    }

    /// Augmented flags this pattern was compiled with, alphabetized.
    pub fn xflags(&self) -> Option<String> {
        self.0.artifact.borrow().flags.clone()
    }

    pub fn has_flag(&self, flag: char) -> bool {
        self.0.artifact.borrow().has_flag(flag)
    }

    pub fn is_global(&self) -> bool {
        self.has_flag('g')
    }

    pub fn is_sticky(&self) -> bool {
        self.has_flag('y')
    }

    pub fn ignore_case(&self) -> bool {
        self.has_flag('i')
    }

    pub fn multiline(&self) -> bool {
        self.has_flag('m')
    }

    pub fn dot_all(&self) -> bool {
        self.has_flag('s')
    }

    pub fn unicode(&self) -> bool {
        self.has_flag('u')
    }

    pub fn capture_count(&self) -> usize {
        self.0.artifact.borrow().capture_count()
    }

    pub fn capture_names(&self) -> Vec<Option<SmolStr>> {
        self.0.artifact.borrow().group_names.to_vec()
    }

    pub fn last_index(&self) -> usize {
        self.0.last_index.get()
    }

    pub fn set_last_index(&self, index: usize) {
        self.0.last_index.set(index);
    }
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let artifact = self.0.artifact.borrow();
        write!(f, "/{}/{}", artifact.native_source, artifact.native_flags)
    }
}

/// Smallest char boundary at or after `pos`.
pub(crate) fn ceil_char_boundary(text: &str, mut pos: usize) -> usize {
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

/// Byte offset one character past `pos`.
pub(crate) fn next_char_boundary(text: &str, pos: usize) -> usize {
    match text[pos..].chars().next() {
        Some(c) => pos + c.len_utf8(),
        None => pos + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_boundaries() {
        let text = "aé b";
        assert_eq!(ceil_char_boundary(text, 2), 3);
        assert_eq!(ceil_char_boundary(text, 3), 3);
        assert_eq!(next_char_boundary(text, 1), 3);
        assert_eq!(next_char_boundary(text, text.len()), text.len() + 1);
    }

    #[test]
    fn test_anchored_capture_requires_start_at_pos() {
        let artifact = CompiledArtifact::build(
            "x".to_string(),
            String::new(),
            None,
            None,
            None,
            &EngineOption::default(),
        )
        .unwrap();
        assert!(artifact.captures_at("abcx", 0, true).unwrap().is_none());
        assert!(artifact.captures_at("abcx", 3, true).unwrap().is_some());
        assert!(artifact.captures_at("abcx", 9, false).unwrap().is_none());
    }
}
