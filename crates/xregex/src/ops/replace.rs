// replace and replaceEach
use std::rc::Rc;

use super::escape::escape;
use super::iterate::{MatchScope, all_matches};
use super::subject::IntoSubject;
use super::template::ReplacementTemplate;
use crate::engine::{Engine, XResult};
use crate::pattern::{CompiledArtifact, MatchResult, Pattern};

/// What to search for: a pattern, or a string matched literally.
#[derive(Debug, Clone)]
pub enum Search<'a> {
    Pattern(&'a Pattern),
    Literal(String),
}

impl<'a> From<&'a Pattern> for Search<'a> {
    fn from(pattern: &'a Pattern) -> Self {
        Search::Pattern(pattern)
    }
}

impl From<&str> for Search<'_> {
    fn from(text: &str) -> Self {
        Search::Literal(text.to_string())
    }
}

impl From<String> for Search<'_> {
    fn from(text: String) -> Self {
        Search::Literal(text)
    }
}

#[derive(Clone, Copy)]
pub enum Replacement<'a> {
    /// `$`-template, see `ReplacementTemplate`
    Template(&'a str),
    /// Called per match; the result is inserted verbatim
    Callback(&'a dyn Fn(&MatchResult) -> String),
}

impl<'a> From<&'a str> for Replacement<'a> {
    fn from(template: &'a str) -> Self {
        Replacement::Template(template)
    }
}

impl<'a> From<&'a String> for Replacement<'a> {
    fn from(template: &'a String) -> Self {
        Replacement::Template(template)
    }
}

impl std::fmt::Debug for Replacement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Replacement::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Replacement::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// One step of `replace_each`.
#[derive(Debug, Clone)]
pub struct ReplaceStep<'a> {
    pub search: Search<'a>,
    pub replacement: Replacement<'a>,
    pub scope: Option<MatchScope>,
}

impl<'a> ReplaceStep<'a> {
    pub fn new(search: impl Into<Search<'a>>, replacement: impl Into<Replacement<'a>>) -> Self {
        ReplaceStep {
            search: search.into(),
            replacement: replacement.into(),
            scope: None,
        }
    }

    pub fn scope(mut self, scope: MatchScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

impl Engine {
    /// Replace the first match, or every match when `scope` is `All` or unset
    /// with a `g` pattern. A `g` pattern's cursor is 0 afterwards.
    pub fn replace<'a>(
        &self,
        subject: impl IntoSubject,
        search: impl Into<Search<'a>>,
        replacement: impl Into<Replacement<'a>>,
        scope: Option<MatchScope>,
    ) -> XResult<String> {
        let input: Rc<str> = Rc::from(subject.into_subject()?);
        self.replace_input(&input, &search.into(), replacement.into(), scope)
    }

    /// Apply each step to the output of the one before.
    pub fn replace_each(&self, subject: impl IntoSubject, steps: &[ReplaceStep<'_>]) -> XResult<String> {
        let mut output = subject.into_subject()?;
        for step in steps {
            let input: Rc<str> = Rc::from(output);
            output = self.replace_input(&input, &step.search, step.replacement, step.scope)?;
        }
        Ok(output)
    }

    fn replace_input(
        &self,
        input: &Rc<str>,
        search: &Search<'_>,
        replacement: Replacement<'_>,
        scope: Option<MatchScope>,
    ) -> XResult<String> {
        let (artifact, pattern) = match search {
            Search::Pattern(pattern) => (pattern.artifact(), Some(*pattern)),
            Search::Literal(text) => (self.literal_artifact(text)?, None),
        };
        let global = pattern.is_some_and(Pattern::is_global);
        let template = match replacement {
            Replacement::Template(t) => Some(ReplacementTemplate::parse(t, &artifact.group_names)?),
            Replacement::Callback(_) => None,
        };

        let namespaced = self.namespaced();
        let matches = match MatchScope::resolve(scope, global) {
            MatchScope::All => all_matches(&artifact, input, namespaced)?,
            MatchScope::One => artifact
                .exec_at(input, 0, artifact.has_flag('y'), namespaced)?
                .into_iter()
                .collect(),
        };

        let mut output = String::with_capacity(input.len());
        let mut last = 0;
        for m in &matches {
            output.push_str(&input[last..m.index()]);
            match (&template, replacement) {
                (Some(template), _) => template.expand(m, &mut output),
                (None, Replacement::Callback(callback)) => output.push_str(&callback(m)),
                (None, Replacement::Template(_)) => {}
            }
            last = m.end();
        }
        output.push_str(&input[last..]);

        if global && let Some(pattern) = pattern {
            pattern.set_last_index(0);
        }
        Ok(output)
    }

    /// Native artifact matching `text` literally, with no groups.
    fn literal_artifact(&self, text: &str) -> XResult<Rc<CompiledArtifact>> {
        Ok(Rc::new(CompiledArtifact::build(
            escape(text),
            String::new(),
            None,
            None,
            None,
            self.option(),
        )?))
    }
}
