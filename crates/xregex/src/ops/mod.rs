// Operations on compiled patterns
// Each submodule adds one family of methods to `Engine`.
mod chain;
mod escape;
mod exec;
mod iterate;
mod replace;
mod split;
mod subject;
mod template;
mod union;

pub use chain::{Backref, ChainLink};
pub use escape::escape;
pub use exec::AnchorMode;
pub use iterate::{MatchScope, Matched};
pub use replace::{ReplaceStep, Replacement, Search};
pub use split::SplitLimit;
pub use subject::IntoSubject;
pub use union::{Conjunction, UnionOptions, UnionPart};
