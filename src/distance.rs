//! Distance accumulation over the stream of accepted fixes.

use log::warn;

use crate::geo_utils::haversine_distance;
use crate::{GpsPoint, PositionFix};

/// Folds consecutive accepted fixes into a total walked distance and the
/// ordered session path.
///
/// The upstream location source applies its own minimum-movement filter, so
/// no additional de-noising happens here; the only guard is coordinate
/// validity. Batching fixes into any number of calls yields the same total
/// as delivering them one by one.
#[derive(Debug, Default)]
pub struct DistanceAccumulator {
    total_km: f64,
    last_fix: Option<PositionFix>,
    path: Vec<GpsPoint>,
}

impl DistanceAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one fix into the accumulator.
    ///
    /// Adds the great-circle displacement from the previous accepted fix (no
    /// distance is added for the very first fix), appends the coordinate to
    /// the path, and remembers the fix for the next displacement.
    pub fn record(&mut self, fix: PositionFix) {
        if !fix.is_valid() {
            warn!(
                "[DistanceAccumulator] Dropping fix with invalid coordinates ({}, {})",
                fix.latitude, fix.longitude
            );
            return;
        }

        if let Some(previous) = &self.last_fix {
            let meters = haversine_distance(&previous.point(), &fix.point());
            self.total_km += meters / 1000.0;
        }

        self.path.push(fix.point());
        self.last_fix = Some(fix);
    }

    /// Total accumulated distance in kilometers.
    pub fn total_km(&self) -> f64 {
        self.total_km
    }

    /// The ordered coordinates of every accepted fix.
    pub fn path(&self) -> &[GpsPoint] {
        &self.path
    }

    /// The most recently accepted fix.
    pub fn last_fix(&self) -> Option<&PositionFix> {
        self.last_fix.as_ref()
    }

    /// Consume the accumulator, yielding the frozen path.
    pub fn into_path(self) -> Vec<GpsPoint> {
        self.path
    }

    /// Reset to the empty state for a new session.
    pub fn reset(&mut self) {
        self.total_km = 0.0;
        self.last_fix = None;
        self.path.clear();
    }
}
