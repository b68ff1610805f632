// Flag handling
// Validation, the leading `(?flags)` mode modifier, canonical ordering and
// the subset of flags passed on to the native engine.

use crate::engine::{XRegexError, XResult};

/// Flags the native engine understands directly.
pub const NATIVE_FLAGS: &str = "gimsuy";

/// Flags handled by the compiler itself.
pub const COMPILER_FLAGS: &str = "nx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PreparedFlags {
    /// Pattern with any leading mode modifier removed
    pub pattern: String,
    /// Caller flags merged with the mode modifier, duplicates dropped
    pub flags: String,
}

/// Validate `flags` and fold a leading `(?flags)` mode modifier into them.
pub(crate) fn prepare_flags(
    pattern: &str,
    flags: &str,
    is_known: impl Fn(char) -> bool,
) -> XResult<PreparedFlags> {
    if clip_duplicates(flags).len() != flags.len() {
        return Err(XRegexError::syntax(format!(
            "Invalid duplicate regex flag {}",
            flags
        )));
    }

    let mut flags = flags.to_string();
    let mut pattern = pattern;
    if let Some(modifier) = mode_modifier(pattern) {
        if modifier.contains(['g', 'y']) {
            return Err(XRegexError::syntax_at(
                format!("Cannot use flags \"gy\" in mode modifier (?{})", modifier),
                0,
            ));
        }
        flags.push_str(modifier);
        flags = clip_duplicates(&flags);
        pattern = &pattern[modifier.len() + 3..];
    }

    if let Some(unknown) = flags.chars().find(|&c| !is_known(c)) {
        return Err(XRegexError::syntax(format!("Unknown regex flag {}", unknown)));
    }

    Ok(PreparedFlags {
        pattern: pattern.to_string(),
        flags,
    })
}

/// Flag characters of a leading `(?flags)`, where flags match `[\w$]+`.
fn mode_modifier(pattern: &str) -> Option<&str> {
    let rest = pattern.strip_prefix("(?")?;
    let len = rest
        .bytes()
        .take_while(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        .count();
    if len == 0 || rest.as_bytes().get(len) != Some(&b')') {
        return None;
    }
    Some(&rest[..len])
}

fn clip_duplicates(flags: &str) -> String {
    let mut out = String::with_capacity(flags.len());
    for c in flags.chars() {
        if !out.contains(c) {
            out.push(c);
        }
    }
    out
}

/// Flags sorted by code point: `xgiA` becomes `Agix`.
pub(crate) fn sorted_flags(flags: &str) -> String {
    let mut chars: Vec<char> = flags.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

/// The native subset of `flags`, sorted.
pub(crate) fn native_flags(flags: &str) -> String {
    sorted_flags(&flags.chars().filter(|&c| NATIVE_FLAGS.contains(c)).collect::<String>())
}
