use crate::config::SaveRules;
use crate::error::ValidationError;
use crate::metrics::parse_duration;
use crate::models::{strip_pause_markers, Fix};
use crate::types::TrainingStatistics;

/// Checks the host performs before a training is persisted: more than
/// `min_fixes` fixes (pause markers not counted), duration above
/// `min_duration_secs`, distance above `min_distance_m`, and no NaN/negative
/// statistic.
pub fn validate_for_save(
    stats: &TrainingStatistics,
    route: &[Fix],
    rules: &SaveRules,
) -> Result<(), ValidationError> {
    let count = strip_pause_markers(route).len();
    if count <= rules.min_fixes {
        return Err(ValidationError::TooFewFixes { count, min: rules.min_fixes });
    }

    if let Some(field) = stats.invalid_field() {
        return Err(ValidationError::InvalidStatistics { field });
    }

    let secs = parse_duration(&stats.duration)
        .ok_or_else(|| ValidationError::MalformedDuration(stats.duration.clone()))?;
    if secs <= rules.min_duration_secs {
        return Err(ValidationError::TooShort { secs, min: rules.min_duration_secs });
    }

    let meters = stats.distance_km * 1000.0;
    if meters <= rules.min_distance_m {
        return Err(ValidationError::TooClose { meters, min: rules.min_distance_m });
    }

    Ok(())
}
