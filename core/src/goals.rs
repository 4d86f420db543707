use chrono::Duration;

use crate::types::{GoalProgress, TrainingRecord, WeeklyGoal};

/// Progress on a weekly goal from the trainings created in
/// `[start_date, start_date + 7 days)`. Ghost recordings count like any
/// other training.
pub fn weekly_progress(goal: &WeeklyGoal, records: &[TrainingRecord]) -> GoalProgress {
    let end = goal.start_date + Duration::days(7);
    let in_week = records.iter().filter(|r| {
        let day = r.created_at.date_naive();
        day >= goal.start_date && day < end
    });

    let (trainings, distance_km) = in_week.fold((0u32, 0.0f64), |(n, d), r| {
        let km = if r.statistics.distance_km.is_finite() { r.statistics.distance_km } else { 0.0 };
        (n + 1, d + km)
    });

    GoalProgress {
        trainings,
        distance_km,
        completed: trainings >= goal.training_quantity && distance_km >= goal.distance_km,
    }
}
