use crate::core::geo;
use crate::domain::model::{Position, UpdateStatus};
use chrono::{DateTime, Duration, Utc};

/// Decide whether a candidate fix is far enough in space and time from the
/// previously accepted one to be worth reporting as a real update.
///
/// Thresholds of 0 disable the corresponding check. The distance check runs
/// first; the time check applies regardless of distance.
pub fn evaluate(
    cached: Option<&Position>,
    last_update_at: Option<DateTime<Utc>>,
    candidate: &Position,
    distance_threshold_m: f64,
    time_threshold_secs: u64,
    now: DateTime<Utc>,
) -> UpdateStatus {
    if distance_threshold_m > 0.0 {
        if let Some(previous) = cached {
            let delta_m = geo::great_circle_distance_m(
                previous.latitude,
                previous.longitude,
                candidate.latitude,
                candidate.longitude,
            );
            if delta_m <= distance_threshold_m {
                return UpdateStatus::DistanceTooSmall;
            }
        }
    }

    if time_threshold_secs > 0 {
        if let Some(last) = last_update_at {
            let delta = now.signed_duration_since(last);
            if delta <= Duration::seconds(time_threshold_secs as i64) {
                return UpdateStatus::TimeTooSmall;
            }
        }
    }

    UpdateStatus::Ok
}
