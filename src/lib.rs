//! # Walk Tracker
//!
//! Walk session tracking engine for the dog-walking companion app.
//!
//! This library turns the raw stream of GPS fixes delivered by the host
//! platform into a consistent, resumable walk measurement:
//! - Session lifecycle state machine (start / pause / resume / end)
//! - Haversine distance accumulation over accepted fixes
//! - Calorie estimation from active walking time
//! - Monotonic progress tracking against a planned route
//!
//! ## Features
//!
//! - **`http`** - Enable the reqwest/tokio client for session upload
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use walk_tracker::{
//!     AuthorizationStatus, LocationSource, PositionFix, TrackerConfig, WalkSessionEngine,
//! };
//!
//! struct AlwaysGranted;
//!
//! impl LocationSource for AlwaysGranted {
//!     fn authorization(&self) -> AuthorizationStatus {
//!         AuthorizationStatus::Granted
//!     }
//!     fn start_updating(&mut self) {}
//!     fn stop_updating(&mut self) {}
//! }
//!
//! let mut engine = WalkSessionEngine::new(Box::new(AlwaysGranted), TrackerConfig::default());
//!
//! let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
//! engine.start_at(t0).unwrap();
//! engine.handle_fix(PositionFix::new(51.5074, -0.1278, 5.0, t0));
//! engine.handle_fix(PositionFix::new(51.5080, -0.1290, 5.0, t0 + Duration::seconds(30)));
//!
//! let session = engine.end_at(t0 + Duration::seconds(600)).unwrap();
//! assert_eq!(session.duration_seconds, 600.0);
//! assert!(session.distance_km > 0.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, WalkTrackError};

// Geographic utilities (haversine distance, path length)
pub mod geo_utils;

// Platform location facility abstraction
pub mod location;
pub use location::{AuthorizationStatus, LocationSource};

// Distance accumulation over accepted fixes
pub mod distance;
pub use distance::DistanceAccumulator;

// Calorie estimation from active time
pub mod calories;
pub use calories::estimate_calories;

// Route progress tracking (monotonic waypoint cursor)
pub mod progress;
pub use progress::RouteProgressTracker;

// Finished session record and live metrics snapshot
pub mod session;
pub use session::{WalkMetrics, WalkSession};

// Stateful session engine (singleton with all walk state)
pub mod engine;
pub use engine::{with_engine, TrackingState, WalkSessionEngine, ENGINE};

// Session upload (payload always available, client behind "http")
pub mod upload;
pub use upload::SessionPayload;
#[cfg(feature = "http")]
pub use upload::SessionUploader;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use walk_tracker::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One timestamped GPS sample as delivered by the platform location facility.
///
/// Fixes are transient: they are folded into the accumulators and the session
/// path but never persisted individually.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters, as reported by the source.
    /// Carried for the host's benefit; the engine does not filter on it.
    pub horizontal_accuracy_m: f64,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    /// Create a new position fix.
    pub fn new(
        latitude: f64,
        longitude: f64,
        horizontal_accuracy_m: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            horizontal_accuracy_m,
            timestamp,
        }
    }

    /// The fix's coordinate.
    pub fn point(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }

    /// Check if the fix carries valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.point().is_valid()
    }
}

/// A pre-computed planned route, supplied by the route recommendation layer.
///
/// Read-only for the engine. `coordinates` is the dense path the map displays;
/// `waypoints` is the ordered checkpoint list progress is measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    /// Ordered progress checkpoints.
    pub waypoints: Vec<GpsPoint>,
    /// Dense display path.
    pub coordinates: Vec<GpsPoint>,
}

impl PlannedRoute {
    /// Create a planned route from waypoints and a dense display path.
    pub fn new(waypoints: Vec<GpsPoint>, coordinates: Vec<GpsPoint>) -> Self {
        Self {
            waypoints,
            coordinates,
        }
    }

    /// The points progress is tracked against: the waypoint list when one is
    /// supplied, otherwise the dense path (free walk along the drawn route).
    pub fn progress_points(&self) -> &[GpsPoint] {
        if self.waypoints.is_empty() {
            &self.coordinates
        } else {
            &self.waypoints
        }
    }

    /// Total length of the dense display path in meters, for the route
    /// summary shown before the walk starts.
    pub fn total_distance_m(&self) -> f64 {
        geo_utils::path_distance(&self.coordinates)
    }
}

/// Configuration for walk session tracking.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Radius within which a fix counts as having reached a waypoint.
    /// Default: 20.0 meters
    pub waypoint_proximity_m: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            waypoint_proximity_m: 20.0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
