// split with consistent capture interleaving
use std::rc::Rc;

use super::replace::Search;
use super::subject::IntoSubject;
use crate::engine::{Engine, XResult};
use crate::pattern::next_char_boundary;

/// Maximum number of pieces `split` returns, with ToUint32 conversions from
/// loosely typed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitLimit {
    #[default]
    Unlimited,
    Count(u32),
}

impl SplitLimit {
    fn max_len(self) -> usize {
        match self {
            SplitLimit::Unlimited => u32::MAX as usize,
            SplitLimit::Count(n) => n as usize,
        }
    }
}

impl From<u32> for SplitLimit {
    fn from(n: u32) -> Self {
        SplitLimit::Count(n)
    }
}

impl From<usize> for SplitLimit {
    fn from(n: usize) -> Self {
        SplitLimit::Count((n as u64 % (1 << 32)) as u32)
    }
}

impl From<i64> for SplitLimit {
    fn from(n: i64) -> Self {
        SplitLimit::Count(n.rem_euclid(1 << 32) as u32)
    }
}

impl From<i32> for SplitLimit {
    fn from(n: i32) -> Self {
        SplitLimit::from(n as i64)
    }
}

impl From<f64> for SplitLimit {
    /// NaN and the infinities become 0; other values truncate and wrap.
    fn from(n: f64) -> Self {
        if !n.is_finite() {
            return SplitLimit::Count(0);
        }
        SplitLimit::Count(n.trunc().rem_euclid(4_294_967_296.0) as u32)
    }
}

impl From<bool> for SplitLimit {
    fn from(b: bool) -> Self {
        SplitLimit::Count(b as u32)
    }
}

impl From<&str> for SplitLimit {
    /// Numeric text converts like a number; anything else counts as NaN.
    fn from(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SplitLimit::Count(0);
        }
        SplitLimit::from(trimmed.parse::<f64>().unwrap_or(f64::NAN))
    }
}

impl<T: Into<SplitLimit>> From<Option<T>> for SplitLimit {
    fn from(limit: Option<T>) -> Self {
        limit.map_or(SplitLimit::Unlimited, Into::into)
    }
}

impl Engine {
    /// Split `subject` on `separator`. Captures of a pattern separator are
    /// spliced into the output, `None` for groups that did not participate.
    pub fn split<'a>(
        &self,
        subject: impl IntoSubject,
        separator: impl Into<Search<'a>>,
        limit: impl Into<SplitLimit>,
    ) -> XResult<Vec<Option<String>>> {
        let input: Rc<str> = Rc::from(subject.into_subject()?);
        let max_len = limit.into().max_len();
        let mut output = match separator.into() {
            Search::Literal(sep) => split_literal(&input, &sep),
            Search::Pattern(pattern) => {
                let artifact = pattern.artifact();
                let anchored = artifact.has_flag('y');
                let namespaced = self.namespaced();
                let mut output = Vec::new();
                let mut last_end = 0;
                let mut last_len = 0;
                let mut pos = 0;
                while let Some(m) = artifact.exec_at(&input, pos, anchored, namespaced)? {
                    if m.end() > last_end {
                        output.push(Some(input[last_end..m.index()].to_string()));
                        if m.index() < input.len() {
                            output.extend(m.captures().iter().cloned());
                        }
                        last_len = m.as_str().len();
                        last_end = m.end();
                    }
                    pos = if m.is_empty() {
                        next_char_boundary(&input, m.index())
                    } else {
                        m.end()
                    };
                }
                if last_end == input.len() {
                    if artifact.captures_at("", 0, anchored)?.is_none() || last_len > 0 {
                        output.push(Some(String::new()));
                    }
                } else {
                    output.push(Some(input[last_end..].to_string()));
                }
                output
            }
        };
        output.truncate(max_len);
        Ok(output)
    }
}

fn split_literal(input: &str, separator: &str) -> Vec<Option<String>> {
    if separator.is_empty() {
        return input.chars().map(|c| Some(c.to_string())).collect();
    }
    input.split(separator).map(|s| Some(s.to_string())).collect()
}
