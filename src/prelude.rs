use thiserror::Error;

/// Error type for RustMLP
#[derive(Debug, Error)]
pub enum Error {
    /// Operand dimensions are incompatible for a Matrix operation.
    #[error("shape mismatch in {op}: {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    /// Serialized text ended early or held a token that could not be parsed.
    #[error("malformed stream: {0}")]
    MalformedStream(String),
    /// A network or training setup that cannot be built.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Numeric type used by the network.
pub type Val = f64;
