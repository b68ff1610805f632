/// Record types mirrored into JSON
///
/// - match: whole match, index, captures (null for nonparticipating groups),
///   and named groups when the pattern has any
/// - pattern: native and augmented source/flags, group names, cursor
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::pattern::{MatchResult, Pattern};

#[derive(Serialize)]
struct MatchRecord<'a> {
    matched: &'a str,
    index: usize,
    captures: Vec<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<JsonValue>,
}

#[derive(Serialize)]
struct PatternRecord {
    source: String,
    flags: String,
    xsource: Option<String>,
    xflags: Option<String>,
    capture_names: Vec<Option<String>>,
    last_index: usize,
}

pub fn match_to_value(m: &MatchResult) -> Result<JsonValue, String> {
    let groups = m.has_names().then(|| {
        let mut map = Map::new();
        for (i, name) in m.group_names().iter().enumerate() {
            if let Some(name) = name {
                let value = m.get(i + 1).map_or(JsonValue::Null, |v| JsonValue::String(v.to_string()));
                map.insert(name.to_string(), value);
            }
        }
        JsonValue::Object(map)
    });
    let record = MatchRecord {
        matched: m.as_str(),
        index: m.index(),
        captures: m.captures().iter().map(|c| c.as_deref()).collect(),
        groups,
    };
    serde_json::to_value(record).map_err(|e| format!("Failed to serialize match: {}", e))
}

pub fn pattern_to_value(pattern: &Pattern) -> Result<JsonValue, String> {
    let record = PatternRecord {
        source: pattern.source(),
        flags: pattern.flags(),
        xsource: pattern.xsource(),
        xflags: pattern.xflags(),
        capture_names: pattern
            .capture_names()
            .into_iter()
            .map(|n| n.map(|n| n.to_string()))
            .collect(),
        last_index: pattern.last_index(),
    };
    serde_json::to_value(record).map_err(|e| format!("Failed to serialize pattern: {}", e))
}

/// Render a JSON value as a string
pub fn to_string(value: &JsonValue, pretty: bool) -> Result<String, String> {
    if pretty {
        serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize to JSON: {}", e))
    } else {
        serde_json::to_string(value).map_err(|e| format!("Failed to serialize to JSON: {}", e))
    }
}
