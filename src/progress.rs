//! Progress tracking against a planned route.
//!
//! The tracker keeps a monotonic "next checkpoint" cursor: on each fix it
//! looks for the closest remaining checkpoint, and advances the cursor when
//! the walker comes within the proximity radius of a later one. The cursor
//! never regresses, even if the walker backtracks geographically.

use log::debug;

use crate::geo_utils::haversine_distance;
use crate::GpsPoint;

/// Monotonic route-progress cursor over an ordered checkpoint list.
///
/// With no checkpoints the tracker is inert: fixes are ignored and
/// [`completion_percent`](Self::completion_percent) is `None` (free walk).
#[derive(Debug, Clone, Default)]
pub struct RouteProgressTracker {
    checkpoints: Vec<GpsPoint>,
    next_index: usize,
    proximity_m: f64,
}

impl RouteProgressTracker {
    /// Create a tracker over ordered checkpoints with the given proximity
    /// radius in meters.
    pub fn new(checkpoints: Vec<GpsPoint>, proximity_m: f64) -> Self {
        Self {
            checkpoints,
            next_index: 0,
            proximity_m,
        }
    }

    /// Create an inert tracker (free walk, no planned route).
    pub fn inert() -> Self {
        Self::default()
    }

    /// Whether a planned route is being tracked.
    pub fn is_tracking(&self) -> bool {
        !self.checkpoints.is_empty()
    }

    /// Fold one position into the cursor. Returns `true` if the cursor
    /// advanced.
    ///
    /// Scans the remaining checkpoints (`next_index..`) for the one closest
    /// to `position`; the cursor advances only when that minimum distance is
    /// within the proximity radius *and* the checkpoint is strictly past the
    /// current cursor.
    pub fn observe(&mut self, position: &GpsPoint) -> bool {
        if self.checkpoints.is_empty() || self.next_index >= self.checkpoints.len() {
            return false;
        }

        let mut best_index = self.next_index;
        let mut best_distance = f64::INFINITY;
        for (offset, checkpoint) in self.checkpoints[self.next_index..].iter().enumerate() {
            let dist = haversine_distance(position, checkpoint);
            if dist < best_distance {
                best_distance = dist;
                best_index = self.next_index + offset;
            }
        }

        if best_distance < self.proximity_m && best_index > self.next_index {
            debug!(
                "[RouteProgress] Reached checkpoint {} ({:.1} m away)",
                best_index, best_distance
            );
            self.next_index = best_index;
            return true;
        }

        false
    }

    /// Index of the next checkpoint to reach. Monotonically non-decreasing
    /// over the life of one session.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Completion percentage in `[0, 100]`, or `None` when inert.
    pub fn completion_percent(&self) -> Option<f64> {
        if self.checkpoints.is_empty() {
            return None;
        }
        let percent = 100.0 * self.next_index as f64 / self.checkpoints.len() as f64;
        Some(percent.min(100.0))
    }

    /// Reset the cursor for a new session over the same checkpoints.
    pub fn reset(&mut self) {
        self.next_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ~0.01 degrees of latitude apart, i.e. ~1.1 km between checkpoints
    fn five_checkpoints() -> Vec<GpsPoint> {
        (0..5)
            .map(|i| GpsPoint::new(51.50 + i as f64 * 0.01, -0.1278))
            .collect()
    }

    /// Latitude offset in degrees corresponding to `meters` of northing.
    fn lat_offset(meters: f64) -> f64 {
        meters / 111_194.9
    }

    #[test]
    fn test_inert_without_route() {
        let mut tracker = RouteProgressTracker::inert();
        assert!(!tracker.is_tracking());
        assert!(!tracker.observe(&GpsPoint::new(51.5, -0.1278)));
        assert_eq!(tracker.completion_percent(), None);
    }

    #[test]
    fn test_advances_within_proximity() {
        let checkpoints = five_checkpoints();
        let mut tracker = RouteProgressTracker::new(checkpoints.clone(), 20.0);

        // 19 m short of checkpoint 1
        let near = GpsPoint::new(checkpoints[1].latitude - lat_offset(19.0), -0.1278);
        assert!(tracker.observe(&near));
        assert_eq!(tracker.next_index(), 1);
        assert_eq!(tracker.completion_percent(), Some(20.0));
    }

    #[test]
    fn test_proximity_threshold_boundary() {
        let checkpoints = five_checkpoints();
        let mut tracker = RouteProgressTracker::new(checkpoints.clone(), 20.0);

        // Put the cursor at 1 first
        let near_1 = GpsPoint::new(checkpoints[1].latitude - lat_offset(5.0), -0.1278);
        assert!(tracker.observe(&near_1));
        assert_eq!(tracker.next_index(), 1);

        // 21 m away from checkpoint 2: outside the radius, no advance
        let outside = GpsPoint::new(checkpoints[2].latitude - lat_offset(21.0), -0.1278);
        assert!(!tracker.observe(&outside));
        assert_eq!(tracker.next_index(), 1);

        // 19 m away: inside the radius, advances to 2 -> 40% of 5 checkpoints
        let inside = GpsPoint::new(checkpoints[2].latitude - lat_offset(19.0), -0.1278);
        assert!(tracker.observe(&inside));
        assert_eq!(tracker.next_index(), 2);
        assert_eq!(tracker.completion_percent(), Some(40.0));
    }

    #[test]
    fn test_cursor_never_regresses() {
        let checkpoints = five_checkpoints();
        let mut tracker = RouteProgressTracker::new(checkpoints.clone(), 20.0);

        // Walk straight to checkpoint 3
        let near_3 = GpsPoint::new(checkpoints[3].latitude - lat_offset(5.0), -0.1278);
        assert!(tracker.observe(&near_3));
        assert_eq!(tracker.next_index(), 3);

        // Drift back to checkpoint 1: it is behind the cursor, so no change
        let near_1 = GpsPoint::new(checkpoints[1].latitude - lat_offset(5.0), -0.1278);
        assert!(!tracker.observe(&near_1));
        assert_eq!(tracker.next_index(), 3);
    }

    #[test]
    fn test_completion_caps_at_100() {
        let checkpoints = five_checkpoints();
        let mut tracker = RouteProgressTracker::new(checkpoints.clone(), 20.0);

        let near_last = GpsPoint::new(checkpoints[4].latitude - lat_offset(5.0), -0.1278);
        assert!(tracker.observe(&near_last));
        assert_eq!(tracker.next_index(), 4);
        assert_eq!(tracker.completion_percent(), Some(80.0));

        // Cursor at the last checkpoint: nothing past it to advance to
        assert!(!tracker.observe(&checkpoints[4]));
        assert_eq!(tracker.next_index(), 4);
    }

    #[test]
    fn test_reset() {
        let checkpoints = five_checkpoints();
        let mut tracker = RouteProgressTracker::new(checkpoints.clone(), 20.0);
        let near_2 = GpsPoint::new(checkpoints[2].latitude - lat_offset(5.0), -0.1278);
        assert!(tracker.observe(&near_2));
        tracker.reset();
        assert_eq!(tracker.next_index(), 0);
        assert_eq!(tracker.completion_percent(), Some(0.0));
    }
}
