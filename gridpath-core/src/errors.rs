use thiserror::Error;

/// Error codes shared across the path-finding and simulation crates.
///
/// Infeasibility (no route between two passable tiles) is deliberately not
/// represented here; planners report it as a `(None, +inf)` result instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("unimplemented: {0}")]
    Unimplemented(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
