// Extensible regex engine
// Augmented pattern syntax compiled onto fancy-regex, with uniform search,
// replace, split and union semantics

#[cfg(test)]
mod test;

pub mod compiler;
pub mod engine;
pub mod ops;
pub mod pattern;

#[cfg(feature = "serde")]
pub mod serde;

pub use compiler::token_registry::{Scope, TokenContext, TokenOptions, TokenScope};
pub use engine::{Engine, EngineOption, ErrorKind, Feature, XRegexError, XResult};
pub use ops::{
    AnchorMode, Backref, ChainLink, Conjunction, IntoSubject, MatchScope, Matched, ReplaceStep,
    Replacement, Search, SplitLimit, UnionOptions, UnionPart, escape,
};
pub use pattern::{CompiledArtifact, Groups, MatchResult, Pattern};
