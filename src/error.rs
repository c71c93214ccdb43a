//! Error taxonomy for layer construction, coloring, and merge operations.
//!
//! Every variant is a local precondition violation: callers decide whether to
//! skip, abort a batch, or prompt for correction. Nothing here is retried or
//! recovered internally.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayerError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayerError {
    /// Malformed document value: bad gradient bounds, unknown domain,
    /// out-of-range sorting or layout value.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An operation that requires at least one technique id or layer was
    /// called with none.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// A binary or n-ary operation was given layers from different matrices.
    #[error("domain mismatch: {left} vs {right}")]
    DomainMismatch { left: String, right: String },

    /// A color token matched neither the hex pattern nor any named-color
    /// table.
    #[error("unrecognized color: {0}")]
    UnrecognizedColor(String),

    /// `replace_color` was asked to replace a color that no technique
    /// carries.
    #[error("color not found: {0}")]
    ColorNotFound(String),

    /// A diff color scheme was applied to a layer with a score outside
    /// {-1, 0, 1}.
    #[error("diff scores must be -1, 0, or 1 - got {0}")]
    InvalidScoreDomain(i32),
}
