/// Most tokens a single source may produce, EOF included.
pub const DEFAULT_MAX_TOKENS: usize = 1024;

/// Knobs for one run of [`crate::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub max_tokens: usize,
    /// Run constant folding and propagation after lowering.
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            optimize: true,
        }
    }
}
