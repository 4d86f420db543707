use thiserror::Error;

/// Reasons a completed training is refused before it is persisted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("route has {count} fixes, more than {min} required")]
    TooFewFixes { count: usize, min: usize },
    #[error("duration {secs}s does not exceed {min}s")]
    TooShort { secs: u64, min: u64 },
    #[error("distance {meters:.1}m does not exceed {min}m")]
    TooClose { meters: f64, min: f64 },
    #[error("statistics field `{field}` is not a valid number")]
    InvalidStatistics { field: &'static str },
    #[error("malformed duration `{0}`")]
    MalformedDuration(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse at {path}: {message}")]
    Json { path: String, message: String },
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("training {counter} not found for user {user}")]
    NotFound { user: String, counter: u64 },
    #[error("invalid user id `{0}`")]
    InvalidUser(String),
    #[error("not enough coordinates: {0} (at least 2 required)")]
    NotEnoughCoordinates(usize),
    #[error("race session lock poisoned")]
    SessionPoisoned,
    #[error("telemetry: {0}")]
    Telemetry(#[from] prometheus::Error),
}

impl CoreError {
    pub(crate) fn json<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> Self {
        CoreError::Json { path: err.path().to_string(), message: err.inner().to_string() }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Json { path: ".".to_string(), message: e.to_string() }
    }
}
