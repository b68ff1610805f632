use std::rc::Rc;

use smol_str::SmolStr;

/// One successful search.
///
/// `captures[i]` is group `i + 1`; `None` marks a group that did not take
/// part in the match, `Some("")` one that matched the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub(crate) matched: String,
    pub(crate) captures: Vec<Option<String>>,
    pub(crate) index: usize,
    pub(crate) input: Rc<str>,
    pub(crate) names: Rc<[Option<SmolStr>]>,
    pub(crate) namespaced: bool,
}

impl MatchResult {
    pub(crate) fn from_captures(
        caps: &fancy_regex::Captures<'_>,
        input: &Rc<str>,
        names: &Rc<[Option<SmolStr>]>,
        namespaced: bool,
    ) -> Option<MatchResult> {
        let whole = caps.get(0)?;
        let captures = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect();
        Some(MatchResult {
            matched: whole.as_str().to_string(),
            captures,
            index: whole.start(),
            input: input.clone(),
            names: names.clone(),
            namespaced,
        })
    }

    /// The whole match.
    pub fn as_str(&self) -> &str {
        &self.matched
    }

    /// Group `i`, with 0 meaning the whole match.
    pub fn get(&self, i: usize) -> Option<&str> {
        if i == 0 {
            return Some(&self.matched);
        }
        self.captures.get(i - 1).and_then(|c| c.as_deref())
    }

    /// Number of entries including the whole match, like a JS match array.
    pub fn len(&self) -> usize {
        self.captures.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn captures(&self) -> &[Option<String>] {
        &self.captures
    }

    /// Byte offset where the match starts.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset just past the match.
    pub fn end(&self) -> usize {
        self.index + self.matched.len()
    }

    /// The subject that was searched.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn before(&self) -> &str {
        &self.input[..self.index]
    }

    pub fn after(&self) -> &str {
        &self.input[self.end()..]
    }

    /// 1-based index of the group carrying `name`.
    pub fn name_index(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .map(|i| i + 1)
    }

    /// Flat named-capture lookup. Only available while namespacing is
    /// not installed; with namespacing, names live under `groups()`.
    pub fn name(&self, name: &str) -> Option<&str> {
        if self.namespaced {
            return None;
        }
        self.get(self.name_index(name)?)
    }

    /// Nested named captures, present only when namespacing is installed
    /// and the pattern has at least one named group.
    pub fn groups(&self) -> Option<Groups<'_>> {
        if !self.namespaced || self.names.iter().all(Option::is_none) {
            return None;
        }
        Some(Groups { result: self })
    }

    pub(crate) fn has_names(&self) -> bool {
        self.names.iter().any(Option::is_some)
    }

    pub(crate) fn group_names(&self) -> &[Option<SmolStr>] {
        &self.names
    }
}

/// View over the named groups of one match.
#[derive(Debug, Clone, Copy)]
pub struct Groups<'a> {
    result: &'a MatchResult,
}

impl<'a> Groups<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let result = self.result;
        result.get(result.name_index(name)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.result.name_index(name).is_some()
    }

    /// `(name, value)` pairs in group order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        let result = self.result;
        result
            .names
            .iter()
            .enumerate()
            .filter_map(move |(i, n)| n.as_deref().map(|n| (n, result.get(i + 1))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(namespaced: bool) -> MatchResult {
        MatchResult {
            matched: "ab".to_string(),
            captures: vec![Some("a".to_string()), None],
            index: 1,
            input: Rc::from("xab!"),
            names: Rc::from(vec![Some(SmolStr::new("first")), Some(SmolStr::new("second"))]),
            namespaced,
        }
    }

    #[test]
    fn test_positions_and_slices() {
        let m = sample(false);
        assert_eq!(m.len(), 3);
        assert_eq!(m.end(), 3);
        assert_eq!(m.before(), "x");
        assert_eq!(m.after(), "!");
        assert_eq!(m.get(2), None);
    }

    #[test]
    fn test_flat_names_without_namespacing() {
        let m = sample(false);
        assert_eq!(m.name("first"), Some("a"));
        assert!(m.groups().is_none());
    }

    #[test]
    fn test_nested_names_with_namespacing() {
        let m = sample(true);
        assert_eq!(m.name("first"), None);
        let groups = m.groups().unwrap();
        assert_eq!(groups.get("first"), Some("a"));
        assert_eq!(groups.get("second"), None);
        assert!(groups.contains("second"));
        assert_eq!(groups.iter().count(), 2);
    }
}
