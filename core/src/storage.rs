use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::SaveRules;
use crate::error::{CoreError, ValidationError};
use crate::metrics::{kilometer_splits, parse_duration};
use crate::models::{strip_pause_markers, Fix, Ghost};
use crate::types::{NewTraining, TrainingRecord};
use crate::validation::validate_for_save;

/// Persistence collaborator for completed trainings, keyed by user and a
/// per-user counter starting at 1.
pub trait TrainingRepository {
    /// Validates, strips pause markers and stores the training.
    fn save(&mut self, user: &str, training: NewTraining) -> Result<TrainingRecord, CoreError>;
    fn get(&self, user: &str, counter: u64) -> Result<Option<TrainingRecord>, CoreError>;
    /// All trainings of a user, oldest counter first.
    fn list(&self, user: &str) -> Result<Vec<TrainingRecord>, CoreError>;

    /// A stored training reused as a ghost.
    fn ghost(&self, user: &str, counter: u64) -> Result<Ghost, CoreError> {
        let record = self
            .get(user, counter)?
            .ok_or_else(|| CoreError::NotFound { user: user.to_string(), counter })?;
        ghost_from_record(&record)
    }
}

pub fn ghost_from_record(record: &TrainingRecord) -> Result<Ghost, CoreError> {
    let duration = parse_duration(&record.statistics.duration)
        .ok_or_else(|| ValidationError::MalformedDuration(record.statistics.duration.clone()))?;
    Ok(Ghost::new(record.route.clone(), record.statistics.distance_km, duration as f64))
}

fn build_record(
    user: &str,
    counter: u64,
    training: NewTraining,
    rules: &SaveRules,
) -> Result<TrainingRecord, CoreError> {
    let route = strip_pause_markers(&training.route);
    validate_for_save(&training.statistics, &route, rules)?;
    Ok(TrainingRecord {
        user: user.to_string(),
        counter,
        name: training.name,
        image: training.image,
        training_type: training.training_type,
        is_ghost: training.is_ghost,
        created_at: training.created_at,
        statistics: training.statistics,
        splits: kilometer_splits(&route),
        route,
    })
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    rules: SaveRules,
    trainings: HashMap<String, Vec<TrainingRecord>>,
}

impl InMemoryRepository {
    pub fn new(rules: SaveRules) -> Self {
        Self { rules, trainings: HashMap::new() }
    }
}

impl TrainingRepository for InMemoryRepository {
    fn save(&mut self, user: &str, training: NewTraining) -> Result<TrainingRecord, CoreError> {
        let list = self.trainings.entry(user.to_string()).or_default();
        let counter = list.last().map_or(1, |r| r.counter + 1);
        let record = build_record(user, counter, training, &self.rules)?;
        list.push(record.clone());
        Ok(record)
    }

    fn get(&self, user: &str, counter: u64) -> Result<Option<TrainingRecord>, CoreError> {
        Ok(self
            .trainings
            .get(user)
            .and_then(|l| l.iter().find(|r| r.counter == counter))
            .cloned())
    }

    fn list(&self, user: &str) -> Result<Vec<TrainingRecord>, CoreError> {
        Ok(self.trainings.get(user).cloned().unwrap_or_default())
    }
}

/// One JSON file per training: `<root>/<user>/<counter>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    root: PathBuf,
    rules: SaveRules,
}

impl JsonFileRepository {
    pub fn new(root: impl Into<PathBuf>, rules: SaveRules) -> Self {
        Self { root: root.into(), rules }
    }

    fn user_dir(&self, user: &str) -> Result<PathBuf, CoreError> {
        Ok(self.root.join(user_dir_name(user)?))
    }

    fn counters(&self, user: &str) -> Result<Vec<u64>, CoreError> {
        let dir = self.user_dir(user)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut counters = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(c) = path.file_stem().and_then(|s| s.to_str()).and_then(|s| s.parse().ok()) {
                counters.push(c);
            }
        }
        counters.sort_unstable();
        Ok(counters)
    }
}

impl TrainingRepository for JsonFileRepository {
    fn save(&mut self, user: &str, training: NewTraining) -> Result<TrainingRecord, CoreError> {
        let counter = self.counters(user)?.last().map_or(1, |c| c + 1);
        let record = build_record(user, counter, training, &self.rules)?;
        let dir = self.user_dir(user)?;
        std::fs::create_dir_all(&dir)?;
        write_json(&dir.join(format!("{counter}.json")), &record)?;
        log::info!("training {} saved for {} ({} km)", counter, user, record.statistics.distance_km);
        Ok(record)
    }

    fn get(&self, user: &str, counter: u64) -> Result<Option<TrainingRecord>, CoreError> {
        let path = self.user_dir(user)?.join(format!("{counter}.json"));
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    fn list(&self, user: &str) -> Result<Vec<TrainingRecord>, CoreError> {
        let dir = self.user_dir(user)?;
        self.counters(user)?
            .into_iter()
            .map(|c| read_json(&dir.join(format!("{c}.json"))))
            .collect()
    }
}

/// Directory name for a user id. Characters outside `[A-Za-z0-9@._-]` are
/// percent-encoded byte by byte, so distinct ids never share a directory.
/// Empty, `.` and `..` ids are refused.
pub fn user_dir_name(user: &str) -> Result<String, CoreError> {
    if user.is_empty() || user == "." || user == ".." {
        return Err(CoreError::InvalidUser(user.to_string()));
    }
    let mut name = String::with_capacity(user.len());
    for b in user.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'@' | b'.' | b'_' | b'-') {
            name.push(b as char);
        } else {
            name.push_str(&format!("%{b:02X}"));
        }
    }
    Ok(name)
}

/// Reads any JSON document, reporting the failing field path.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let contents = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    serde_path_to_error::deserialize(de).map_err(CoreError::json)
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// A route file: either a bare array of fixes or `{ "coordinates": [...] }`.
pub fn load_route(path: &Path) -> Result<Vec<Fix>, CoreError> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RouteFile {
        Bare(Vec<Fix>),
        Wrapped { coordinates: Vec<Fix> },
    }
    let route = match read_json::<RouteFile>(path)? {
        RouteFile::Bare(r) => r,
        RouteFile::Wrapped { coordinates } => coordinates,
    };
    log::debug!("loaded {} fixes from {}", route.len(), path.display());
    Ok(route)
}

pub fn load_ghost(path: &Path) -> Result<Ghost, CoreError> {
    read_json(path)
}
