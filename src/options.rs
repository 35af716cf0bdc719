//! User-facing knobs for parsing, include resolution, and substitution.

/// Shared across `parse_*`, the include loader, and `resolve`: there is
/// exactly one knob set per document, not one per phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOptions {
    /// When true, an otherwise-unresolved substitution falls back to the
    /// process environment, keyed by the substitution's dotted path.
    pub use_system_environment: bool,
    /// Ordered base directories consulted for `include classpath(...)`.
    pub classpath: Vec<std::path::PathBuf>,
    /// Structural nesting bound: increments on every `{` or `[`.
    pub max_depth: usize,
    /// Bounds the include chain length; guards against include cycles
    /// that slip past the cycle check (defense in depth).
    pub max_include_depth: usize,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        ConfigOptions {
            use_system_environment: false,
            classpath: Vec::new(),
            max_depth: 64,
            max_include_depth: 64,
        }
    }
}
