//! Engine limits and tuning constants.
//!
//! Every number that bounds compile or match work lives here so the
//! defaults in `EngineOption` have one place to change.

// ===== Compiler =====

/// Maximum number of consecutive reparses at one pattern position.
/// A token whose output keeps expanding into more reparse tokens fails
/// with a SyntaxError after this many rounds.
pub const MAX_REPARSE_DEPTH: usize = 200;

/// Highest code point accepted by `\u{...}`.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Initial capacity of the artifact and pattern caches.
pub const CACHE_INITIAL_CAPACITY: usize = 64;

// ===== Native engine =====

/// Default backtrack budget handed to fancy-regex for patterns that need
/// its backtracking VM (backreferences, look-around).
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// Default size limit for the delegated `regex` automaton, in bytes.
pub const DEFAULT_DELEGATE_SIZE_LIMIT: usize = 10 * (1 << 20);

// ===== Templates =====

/// Bare `$N` references never read more than this many digits.
pub const MAX_BARE_BACKREF_DIGITS: usize = 2;
