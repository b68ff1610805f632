use super::xre_limits::{DEFAULT_BACKTRACK_LIMIT, DEFAULT_DELEGATE_SIZE_LIMIT, MAX_REPARSE_DEPTH};

#[derive(Debug, Clone)]
pub struct EngineOption {
    /// Backtrack budget per search for patterns run on the backtracking VM.
    /// Exceeding it surfaces as a `Native` error from the search call.
    pub backtrack_limit: usize,
    pub delegate_size_limit: usize,
    /// Bound on consecutive token reparses at one position.
    pub max_reparse_depth: usize,
}

impl Default for EngineOption {
    fn default() -> Self {
        Self {
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            delegate_size_limit: DEFAULT_DELEGATE_SIZE_LIMIT,
            max_reparse_depth: MAX_REPARSE_DEPTH,
        }
    }
}
