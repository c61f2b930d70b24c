//! Configuration for the dependency-graph core.
//!
//! A small `Copy` struct of the handful of knobs the core actually needs,
//! constructed once by the caller and threaded through every pass.

#[derive(Clone, Copy, Debug)]
pub struct GraphOptions {
    /// Leading path segment recognized as the root-namespace escape hatch
    /// (e.g. `$Root.x` resolves `x` starting at the root namespace,
    /// bypassing current-namespace qualification).
    pub root_escape_sigil: &'static str,
    /// Defensive bound on AST recursion depth (nested blocks/function
    /// literals) during the dependency visit and usage-classification
    /// passes, guarding against pathologically deep input.
    pub max_recursion_depth: usize,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            root_escape_sigil: "$Root",
            max_recursion_depth: 10_000,
        }
    }
}
