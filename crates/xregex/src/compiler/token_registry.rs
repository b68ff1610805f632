// Token registry
// Ordered list of rewrite rules for augmented syntax. Rules are appended on
// registration and tried newest first, so a later rule shadows an earlier one
// that matches the same fragment.

use std::rc::Rc;

use smol_str::SmolStr;

use super::flags::{COMPILER_FLAGS, NATIVE_FLAGS};
use crate::engine::{XRegexError, XResult};
use crate::pattern::{CompiledArtifact, MatchResult};

/// Where the scanner currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Outside any character class
    Default,
    /// Inside `[...]`
    Class,
}

/// Where a rule is allowed to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenScope {
    #[default]
    Default,
    Class,
    All,
}

impl TokenScope {
    pub fn admits(self, scope: Scope) -> bool {
        match self {
            TokenScope::All => true,
            TokenScope::Default => scope == Scope::Default,
            TokenScope::Class => scope == Scope::Class,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenOptions {
    pub scope: TokenScope,
    /// Single flag character that must be active for the rule to run.
    pub flag: Option<String>,
    /// Flag characters the rule accepts without requiring them.
    pub optional_flags: String,
    /// Splice the handler output back into the pattern and scan it again.
    pub reparse: bool,
    /// First character every fragment the rule matches starts with.
    pub lead_char: Option<char>,
}

impl TokenOptions {
    pub fn scope(mut self, scope: TokenScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn optional_flags(mut self, flags: impl Into<String>) -> Self {
        self.optional_flags = flags.into();
        self
    }

    pub fn reparse(mut self, reparse: bool) -> Self {
        self.reparse = reparse;
        self
    }

    pub fn lead_char(mut self, c: char) -> Self {
        self.lead_char = Some(c);
        self
    }
}

/// Compiler state a token handler may read and extend.
pub struct TokenContext<'a> {
    pub(crate) scope: Scope,
    pub(crate) flags: &'a str,
    pub(crate) capture_names: &'a mut Vec<Option<SmolStr>>,
}

impl TokenContext<'_> {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Active flags after mode-modifier merging.
    pub fn flags(&self) -> &str {
        self.flags
    }

    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }

    /// Capturing groups opened so far.
    pub fn capture_count(&self) -> usize {
        self.capture_names.len()
    }

    pub fn capture_names(&self) -> &[Option<SmolStr>] {
        self.capture_names
    }

    /// 1-based index of a named group opened so far.
    pub fn name_index(&self, name: &str) -> Option<usize> {
        self.capture_names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .map(|i| i + 1)
    }

    /// Record a new capturing group. Returns its 1-based index.
    pub fn add_capture(&mut self, name: Option<SmolStr>) -> XResult<usize> {
        if let Some(name) = &name {
            if self.name_index(name).is_some() {
                return Err(XRegexError::syntax(format!(
                    "Cannot use same name for multiple groups {}",
                    name
                )));
            }
        }
        self.capture_names.push(name);
        Ok(self.capture_names.len())
    }
}

pub type TokenHandler = Rc<dyn Fn(&MatchResult, &mut TokenContext<'_>) -> XResult<Option<String>>>;

pub struct TokenRule {
    pub(crate) matcher: Rc<CompiledArtifact>,
    pub(crate) handler: TokenHandler,
    pub(crate) scope: TokenScope,
    pub(crate) trigger_flag: Option<char>,
    pub(crate) reparse: bool,
    pub(crate) lead_char: Option<char>,
}

impl TokenRule {
    /// Scope, flag and lead-char checks, all cheap enough to run before the matcher.
    pub(crate) fn may_apply(&self, scope: Scope, flags: &str, next: Option<char>) -> bool {
        self.scope.admits(scope)
            && self.trigger_flag.is_none_or(|f| flags.contains(f))
            && self.lead_char.is_none_or(|c| next == Some(c))
    }
}

impl std::fmt::Debug for TokenRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRule")
            .field("matcher", &self.matcher.native_source)
            .field("scope", &self.scope)
            .field("trigger_flag", &self.trigger_flag)
            .field("reparse", &self.reparse)
            .field("lead_char", &self.lead_char)
            .finish()
    }
}

#[derive(Debug)]
pub struct TokenRegistry {
    rules: Vec<Rc<TokenRule>>,
    known_flags: String,
}

impl TokenRegistry {
    pub fn new() -> Self {
        TokenRegistry {
            rules: Vec::new(),
            known_flags: format!("{}{}", NATIVE_FLAGS, COMPILER_FLAGS),
        }
    }

    /// Validate `options` and append a rule built from them.
    pub fn register(
        &mut self,
        matcher: Rc<CompiledArtifact>,
        handler: TokenHandler,
        options: TokenOptions,
    ) -> XResult<()> {
        let trigger_flag = match options.flag.as_deref() {
            None => None,
            Some(flag) => {
                let mut chars = flag.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if is_flag_char(c) => Some(c),
                    _ => {
                        return Err(XRegexError::value(format!(
                            "Flag can only be a single character in [A-Za-z0-9_$]: {:?}",
                            flag
                        )));
                    }
                }
            }
        };
        if let Some(bad) = options.optional_flags.chars().find(|&c| !is_flag_char(c)) {
            return Err(XRegexError::value(format!("Invalid flag {:?}", bad)));
        }

        for c in trigger_flag.into_iter().chain(options.optional_flags.chars()) {
            if !self.known_flags.contains(c) {
                self.known_flags.push(c);
            }
        }

        self.rules.push(Rc::new(TokenRule {
            matcher,
            handler,
            scope: options.scope,
            trigger_flag,
            reparse: options.reparse,
            lead_char: options.lead_char,
        }));
        Ok(())
    }

    /// Rules in the order they are tried: newest first.
    pub fn snapshot(&self) -> Vec<Rc<TokenRule>> {
        self.rules.iter().rev().cloned().collect()
    }

    pub fn known_flags(&self) -> &str {
        &self.known_flags
    }

    pub fn is_known_flag(&self, flag: char) -> bool {
        self.known_flags.contains(flag)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn is_flag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
