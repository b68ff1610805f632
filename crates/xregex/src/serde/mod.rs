/// JSON export for matches and patterns
///
/// Values are converted to `serde_json::Value` through plain record structs
/// rather than implementing `Serialize` on the engine types, which hold
/// shared interior state.

#[cfg(feature = "serde")]
mod serializer;

#[cfg(feature = "serde")]
pub use serializer::{match_to_value, pattern_to_value, to_string as to_json_string};

#[cfg(feature = "serde")]
use crate::pattern::{MatchResult, Pattern};

/// Convert a match to a serde_json::Value
#[cfg(feature = "serde")]
pub fn match_to_json(m: &MatchResult) -> Result<serde_json::Value, String> {
    match_to_value(m)
}

/// Convert a pattern's source, flags and groups to a serde_json::Value
#[cfg(feature = "serde")]
pub fn pattern_to_json(pattern: &Pattern) -> Result<serde_json::Value, String> {
    pattern_to_value(pattern)
}
