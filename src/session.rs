//! Finished walk records and live metrics snapshots.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calories::estimate_calories;
use crate::engine::TrackingState;
use crate::GpsPoint;

/// An immutable, finished walk session.
///
/// Created exactly once, when the engine ends a walk; owned by the caller
/// thereafter (handed to the uploader and to the UI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkSession {
    pub id: Uuid,
    /// Derived as `end_time - duration`. Because paused time is not part of
    /// the duration, this intentionally excludes paused wall-clock time and
    /// is *not* the wall-clock moment the walk began.
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Active walking time in seconds (pauses excluded).
    pub duration_seconds: f64,
    pub distance_km: f64,
    pub calories: f64,
    /// Ordered coordinates of every accepted fix, frozen at end.
    pub path: Vec<GpsPoint>,
    pub average_speed_kmh: f64,
}

impl WalkSession {
    /// Assemble the final record from the engine's frozen accumulators.
    pub(crate) fn assemble(
        end_time: DateTime<Utc>,
        duration_seconds: f64,
        distance_km: f64,
        path: Vec<GpsPoint>,
    ) -> Self {
        let average_speed_kmh = if duration_seconds > 0.0 {
            distance_km / (duration_seconds / 3600.0)
        } else {
            0.0
        };

        let start_time = end_time
            - Duration::milliseconds((duration_seconds * 1000.0).round() as i64);

        Self {
            id: Uuid::new_v4(),
            start_time,
            end_time,
            duration_seconds,
            distance_km,
            calories: estimate_calories(duration_seconds),
            path,
            average_speed_kmh,
        }
    }

    /// Serialize the session as JSON for the host UI.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Live snapshot of an in-progress walk, recomputed on every clock tick and
/// fix. This is what the UI observes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkMetrics {
    pub state: TrackingState,
    pub distance_km: f64,
    pub duration_seconds: f64,
    pub calories: f64,
    /// `None` on a free walk with no planned route.
    pub completion_percent: Option<f64>,
}

impl WalkMetrics {
    /// Distance as a 2-decimal kilometer string, e.g. `"3.42 km"`.
    pub fn formatted_distance(&self) -> String {
        format!("{:.2} km", self.distance_km)
    }

    /// Duration as `mm:ss`, or `h:mm:ss` once a full hour has elapsed.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_seconds)
    }

    /// Calories as an integer kcal string, e.g. `"187 kcal"`.
    pub fn formatted_calories(&self) -> String {
        format!("{} kcal", self.calories.round() as i64)
    }

    /// Route completion as `"N%"`, or an empty string on a free walk.
    pub fn formatted_progress(&self) -> String {
        match self.completion_percent {
            Some(percent) => format!("{}%", percent.round() as i64),
            None => String::new(),
        }
    }
}

/// Format elapsed seconds as `mm:ss` or `h:mm:ss`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn end_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_assemble_derives_fields() {
        let path = vec![GpsPoint::new(51.5, -0.1), GpsPoint::new(51.51, -0.1)];
        let session = WalkSession::assemble(end_time(), 1800.0, 2.5, path.clone());

        assert_eq!(session.duration_seconds, 1800.0);
        assert_eq!(session.distance_km, 2.5);
        assert_eq!(session.average_speed_kmh, 5.0);
        assert_eq!(session.calories, estimate_calories(1800.0));
        assert_eq!(session.path, path);
        assert_eq!(session.end_time, end_time());
        // start_time excludes paused wall-clock time
        assert_eq!(session.end_time - session.start_time, Duration::seconds(1800));
    }

    #[test]
    fn test_assemble_zero_duration() {
        let session = WalkSession::assemble(end_time(), 0.0, 0.0, vec![]);
        assert_eq!(session.average_speed_kmh, 0.0);
        assert_eq!(session.calories, 0.0);
        assert_eq!(session.start_time, session.end_time);
    }

    #[test]
    fn test_to_json_contains_fields() {
        let session = WalkSession::assemble(end_time(), 60.0, 0.1, vec![]);
        let json = session.to_json();
        assert!(json.contains("\"distance_km\":0.1"));
        assert!(json.contains("\"duration_seconds\":60.0"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(59.9), "00:59");
        assert_eq!(format_duration(90.0), "01:30");
        assert_eq!(format_duration(3599.0), "59:59");
        assert_eq!(format_duration(3600.0), "1:00:00");
        assert_eq!(format_duration(3723.0), "1:02:03");
        assert_eq!(format_duration(-5.0), "00:00");
    }

    #[test]
    fn test_metrics_formatting() {
        let metrics = WalkMetrics {
            state: TrackingState::Active,
            distance_km: 3.4567,
            duration_seconds: 754.0,
            calories: 186.6,
            completion_percent: Some(40.0),
        };
        assert_eq!(metrics.formatted_distance(), "3.46 km");
        assert_eq!(metrics.formatted_duration(), "12:34");
        assert_eq!(metrics.formatted_calories(), "187 kcal");
        assert_eq!(metrics.formatted_progress(), "40%");

        let free_walk = WalkMetrics {
            completion_percent: None,
            ..metrics
        };
        assert_eq!(free_walk.formatted_progress(), "");
    }
}
