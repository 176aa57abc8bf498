use thiserror::Error;

/// Errors returned by tree construction, queries and the vertex loader.
#[derive(Debug, Error)]
pub enum Error {
    /// A build or query argument was outside the accepted domain,
    /// e.g. zero requested neighbours or a NaN coordinate.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A field map needs at least one sample vertex.
    #[error("cannot build a field map from an empty vertex list")]
    EmptyInput,

    /// An interpolation query was issued against a tree with no vertices.
    #[error("cannot interpolate against an empty tree")]
    EmptyTree,

    /// A vertex file line could not be parsed.
    #[error("malformed vertex data at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// Underlying I/O failure while reading a vertex file.
    #[error("failed to read vertex file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
