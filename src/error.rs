use thiserror::Error;

/// Top-level error type for the trace mapper.
#[derive(Debug, Error)]
pub enum TraceMapError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// An operation was declined because one of its preconditions failed.
///
/// Refusals never mutate state. Callers log them and carry on.
#[derive(Debug, Error, PartialEq)]
pub enum GuardError {
    #[error("polyline needs at least {min} points, got {len}")]
    TooFewPoints { len: usize, min: usize },

    #[error("polyline must retain at least 2 points (has {len})")]
    RetainedLength { len: usize },

    #[error("no polyline selected")]
    NoSelection,

    #[error("no polylines exist")]
    EmptyStore,

    #[error("no control point within {threshold} (nearest at {distance})")]
    NoControlPointNearby { distance: f64, threshold: f64 },

    #[error("no endpoint selected")]
    EndpointNotSelected,

    #[error("no current polyline to cancel")]
    NoPointsToCancel,

    #[error("a polyline cannot be joined to itself")]
    SelfJoin,

    #[error("operation not available in {mode} mode")]
    WrongMode { mode: &'static str },
}

/// Errors raised by the polyline store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("polyline not found")]
    PolylineNotFound,
}

/// Errors raised while writing or reading persisted polylines.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed summary: {0}")]
    Malformed(String),
}

/// Errors raised when validating a [`MapperConfig`](crate::config::MapperConfig).
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Convenience type alias for results using [`TraceMapError`].
pub type Result<T> = std::result::Result<T, TraceMapError>;
