//! Ghostrun core: statistics for GPS-recorded trainings and the ghost-race
//! engine that replays a prior session as a virtual opponent.

pub mod analyze_session;
pub mod announce;
pub mod cli;
pub mod config;
pub mod error;
pub mod geo;
pub mod ghost;
pub mod goals;
pub mod metrics;
pub mod models;
pub mod race;
pub mod storage;
pub mod telemetry;
pub mod types;
pub mod validation;

pub use analyze_session::TrainingAnalyzer;
pub use announce::Announcement;
pub use config::{load_config, save_config, TrackerConfig};
pub use error::{CoreError, ValidationError};
pub use geo::{degrees_to_radians, distance_km, distance_meters};
pub use metrics::{calculate_calories, compute_statistics, format_pace, kilometer_splits, RoundTo};
pub use models::{Fix, Ghost, TrainingType};
pub use race::{beat_ghost, RaceEvent, RaceSession, SessionStatus, SharedRaceSession};
pub use storage::{InMemoryRepository, JsonFileRepository, TrainingRepository};
pub use telemetry::CoreMetrics;
pub use types::{TrainingRecord, TrainingStatistics};
