// Optional features that change the shape of results

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Named captures move from flat `MatchResult::name` lookups into `MatchResult::groups`
    Namespacing,
    /// Code-point iteration for astral planes
    Astral,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::Namespacing, Feature::Astral];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Namespacing => "namespacing",
            Feature::Astral => "astral",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.name() == name)
    }

    fn bit(self) -> u8 {
        match self {
            Feature::Namespacing => 1,
            Feature::Astral => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSet(u8);

impl FeatureSet {
    pub fn contains(self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    pub fn insert(&mut self, feature: Feature) {
        self.0 |= feature.bit();
    }

    pub fn remove(&mut self, feature: Feature) {
        self.0 &= !feature.bit();
    }

    /// Split "a b", "a,b" or "a, b" into known features. Unknown names drop out.
    pub fn parse_list(names: &str) -> impl Iterator<Item = Feature> + '_ {
        names
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(Feature::from_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_separators() {
        for list in ["namespacing astral", "namespacing,astral", "namespacing, astral"] {
            let parsed: Vec<_> = FeatureSet::parse_list(list).collect();
            assert_eq!(parsed, vec![Feature::Namespacing, Feature::Astral]);
        }
        assert_eq!(FeatureSet::parse_list("Astral bogus").count(), 0);
    }

    #[test]
    fn test_insert_remove() {
        let mut set = FeatureSet::default();
        set.insert(Feature::Astral);
        set.insert(Feature::Astral);
        assert!(set.contains(Feature::Astral));
        set.remove(Feature::Astral);
        assert!(!set.contains(Feature::Astral));
    }
}
