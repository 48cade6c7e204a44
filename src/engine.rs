//! # Walk Session Engine
//!
//! The stateful orchestrator for one walk at a time. It owns the session
//! lifecycle state machine and wires the host's fix stream and 1 Hz clock
//! ticks into the distance, calorie, and route-progress accumulators.
//!
//! ## Architecture
//!
//! - The host pushes GPS fixes into [`WalkSessionEngine::handle_fix`] and
//!   drives [`WalkSessionEngine::tick`] once per second while a walk is
//!   active, so the displayed duration updates smoothly between fixes.
//! - Lifecycle calls (`start`/`pause`/`resume`/`end`) are idempotent:
//!   invalid transitions are absorbed as no-ops, never errors. The single
//!   exception is `start()` without location permission, which fails with
//!   [`WalkTrackError::PermissionDenied`] and leaves the state unchanged.
//! - Paused time is never counted: each Active interval is banked into the
//!   running total on `pause()`/`end()`, and `end()` always banks the last
//!   interval before assembling the session, so no time is lost to an
//!   abrupt stop.
//! - All mutation goes through `&mut self`; host/FFI code shares the engine
//!   through the [`ENGINE`] mutex, which serializes fixes, ticks, and
//!   lifecycle calls onto one logical writer.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::calories::estimate_calories;
use crate::distance::DistanceAccumulator;
use crate::error::{Result, WalkTrackError};
use crate::location::{AuthorizationStatus, LocationSource};
use crate::progress::RouteProgressTracker;
use crate::session::{WalkMetrics, WalkSession};
use crate::{PlannedRoute, PositionFix, TrackerConfig};

// ============================================================================
// Tracking State
// ============================================================================

/// Lifecycle state of the (single) walk session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    /// No walk yet.
    Idle,
    /// Walking; fixes and ticks are folded into the accumulators.
    Active,
    /// Walk suspended; time and fixes are not accumulated. A walk may stay
    /// paused indefinitely.
    Paused,
    /// A walk has finished and its record was handed out. Equivalent to
    /// `Idle` for the purpose of starting the next walk.
    Completed,
}

impl TrackingState {
    /// Whether a session is in progress (active or paused).
    pub fn in_progress(&self) -> bool {
        matches!(self, TrackingState::Active | TrackingState::Paused)
    }
}

// ============================================================================
// Walk Session Engine
// ============================================================================

/// The walk session state machine.
///
/// Owns all accumulator state exclusively; nothing else mutates the distance
/// total, banked seconds, or the progress cursor. Exactly one session exists
/// per engine, and the app runs one engine ([`ENGINE`]).
///
/// Every lifecycle method has an `_at(now)` form taking an explicit
/// timestamp; the plain forms use `Utc::now()`. Tests use the `_at` forms to
/// simulate pauses without sleeping.
pub struct WalkSessionEngine {
    state: TrackingState,
    config: TrackerConfig,
    source: Box<dyn LocationSource + Send>,
    route: Option<PlannedRoute>,
    progress: RouteProgressTracker,
    distance: DistanceAccumulator,
    /// Seconds banked from previous Active intervals.
    banked_seconds: f64,
    /// Start of the current Active interval; `None` while Idle/Paused.
    active_interval_start: Option<DateTime<Utc>>,
    /// Most recent source failure, held for the UI to surface.
    last_source_error: Option<WalkTrackError>,
}

impl WalkSessionEngine {
    /// Create an engine around the given location source.
    pub fn new(source: Box<dyn LocationSource + Send>, config: TrackerConfig) -> Self {
        Self {
            state: TrackingState::Idle,
            config,
            source,
            route: None,
            progress: RouteProgressTracker::inert(),
            distance: DistanceAccumulator::new(),
            banked_seconds: 0.0,
            active_interval_start: None,
            last_source_error: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// Replace the location source. Ignored while a session is in progress,
    /// so an active walk never loses its subscription.
    pub fn set_location_source(&mut self, source: Box<dyn LocationSource + Send>) {
        if self.state.in_progress() {
            warn!("[WalkEngine] Ignoring location source swap during a session");
            return;
        }
        self.source = source;
    }

    /// Set or clear the planned route for the *next* walk. Ignored while a
    /// session is in progress (the progress cursor must not be rebuilt
    /// mid-walk).
    pub fn set_route(&mut self, route: Option<PlannedRoute>) {
        if self.state.in_progress() {
            warn!("[WalkEngine] Ignoring route change during a session");
            return;
        }
        self.route = route;
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start a new walk at `now`.
    ///
    /// No-op if a session is already in progress. Fails with
    /// [`WalkTrackError::PermissionDenied`] (and no state change) when
    /// location authorization is not granted.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.state.in_progress() {
            debug!("[WalkEngine] start() ignored: session already in progress");
            return Ok(());
        }

        let status = self.source.authorization();
        if !status.is_granted() {
            return Err(WalkTrackError::PermissionDenied { status });
        }

        self.distance.reset();
        self.banked_seconds = 0.0;
        self.progress = match &self.route {
            Some(route) => RouteProgressTracker::new(
                route.progress_points().to_vec(),
                self.config.waypoint_proximity_m,
            ),
            None => RouteProgressTracker::inert(),
        };
        self.active_interval_start = Some(now);
        self.state = TrackingState::Active;
        self.source.start_updating();

        info!(
            "[WalkEngine] Session started ({})",
            if self.progress.is_tracking() {
                "planned route"
            } else {
                "free walk"
            }
        );
        Ok(())
    }

    /// Start a new walk now.
    pub fn start(&mut self) -> Result<()> {
        self.start_at(Utc::now())
    }

    /// Pause the walk at `now`, banking the current Active interval.
    /// No-op unless Active.
    pub fn pause_at(&mut self, now: DateTime<Utc>) {
        if self.state != TrackingState::Active {
            debug!("[WalkEngine] pause() ignored in state {:?}", self.state);
            return;
        }

        self.bank_active_interval(now);
        self.state = TrackingState::Paused;
        self.source.stop_updating();
        info!(
            "[WalkEngine] Session paused at {:.0}s",
            self.banked_seconds
        );
    }

    /// Pause the walk now.
    pub fn pause(&mut self) {
        self.pause_at(Utc::now())
    }

    /// Resume a paused walk at `now`. Banked time is preserved.
    /// No-op unless Paused.
    pub fn resume_at(&mut self, now: DateTime<Utc>) {
        if self.state != TrackingState::Paused {
            debug!("[WalkEngine] resume() ignored in state {:?}", self.state);
            return;
        }

        self.active_interval_start = Some(now);
        self.state = TrackingState::Active;
        self.source.start_updating();
        info!("[WalkEngine] Session resumed");
    }

    /// Resume a paused walk now.
    pub fn resume(&mut self) {
        self.resume_at(Utc::now())
    }

    /// End the walk at `now` and return the finished session record.
    ///
    /// The last Active interval is banked first, so no time is lost. Returns
    /// `None` when no session is in progress (nothing to end). Afterwards the
    /// engine is reset and ready for the next `start()`.
    pub fn end_at(&mut self, now: DateTime<Utc>) -> Option<WalkSession> {
        if !self.state.in_progress() {
            debug!("[WalkEngine] end() ignored in state {:?}", self.state);
            return None;
        }

        if self.state == TrackingState::Active {
            self.bank_active_interval(now);
        }
        self.source.stop_updating();

        let duration_seconds = self.banked_seconds;
        let distance_km = self.distance.total_km();
        let path = std::mem::take(&mut self.distance).into_path();
        let session = WalkSession::assemble(now, duration_seconds, distance_km, path);

        self.banked_seconds = 0.0;
        self.progress.reset();
        self.state = TrackingState::Completed;

        info!(
            "[WalkEngine] Session ended: {:.2} km in {:.0}s",
            session.distance_km, session.duration_seconds
        );
        Some(session)
    }

    /// End the walk now.
    pub fn end(&mut self) -> Option<WalkSession> {
        self.end_at(Utc::now())
    }

    /// Fold `now - active_interval_start` into the banked total.
    fn bank_active_interval(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.active_interval_start.take() {
            let elapsed = (now - started).num_milliseconds() as f64 / 1000.0;
            self.banked_seconds += elapsed.max(0.0);
        }
    }

    // ========================================================================
    // Fix & Clock Input
    // ========================================================================

    /// Fold one GPS fix into the accumulators. Ignored unless Active.
    ///
    /// Fixes must be delivered in arrival order; distance integration and
    /// progress advancement are both order-sensitive.
    pub fn handle_fix(&mut self, fix: PositionFix) {
        if self.state != TrackingState::Active {
            debug!("[WalkEngine] Fix ignored in state {:?}", self.state);
            return;
        }
        if !fix.is_valid() {
            warn!(
                "[WalkEngine] Dropping fix with invalid coordinates ({}, {})",
                fix.latitude, fix.longitude
            );
            return;
        }

        self.distance.record(fix);
        self.progress.observe(&fix.point());
    }

    /// Clock tick (1 Hz while Active): recompute the live metrics at `now`.
    /// Returns `None` outside the Active state, so stray ticks around a
    /// pause are harmless.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<WalkMetrics> {
        if self.state != TrackingState::Active {
            return None;
        }
        Some(self.metrics_at(now))
    }

    /// Clock tick at the current wall-clock time.
    pub fn tick(&mut self) -> Option<WalkMetrics> {
        self.tick_at(Utc::now())
    }

    // ========================================================================
    // Observable Metrics
    // ========================================================================

    /// Elapsed active duration at `now`: the banked total plus the running
    /// Active interval, if any.
    pub fn duration_seconds_at(&self, now: DateTime<Utc>) -> f64 {
        let running = self
            .active_interval_start
            .map(|started| ((now - started).num_milliseconds() as f64 / 1000.0).max(0.0))
            .unwrap_or(0.0);
        self.banked_seconds + running
    }

    /// Total accumulated distance in kilometers.
    pub fn distance_km(&self) -> f64 {
        self.distance.total_km()
    }

    /// Route completion percentage, `None` on a free walk.
    pub fn completion_percent(&self) -> Option<f64> {
        self.progress.completion_percent()
    }

    /// Snapshot of everything the UI displays, evaluated at `now`.
    pub fn metrics_at(&self, now: DateTime<Utc>) -> WalkMetrics {
        let duration_seconds = self.duration_seconds_at(now);
        WalkMetrics {
            state: self.state,
            distance_km: self.distance.total_km(),
            duration_seconds,
            calories: estimate_calories(duration_seconds),
            completion_percent: self.progress.completion_percent(),
        }
    }

    /// Snapshot at the current wall-clock time.
    pub fn metrics(&self) -> WalkMetrics {
        self.metrics_at(Utc::now())
    }

    // ========================================================================
    // Source Events
    // ========================================================================

    /// Authorization changed while running. Logged only; an in-progress
    /// session keeps its accumulated state either way.
    pub fn on_authorization_changed(&mut self, status: AuthorizationStatus) {
        if status.is_granted() {
            info!("[WalkEngine] Location authorization granted");
        } else {
            warn!(
                "[WalkEngine] Location authorization changed to {:?} in state {:?}",
                status, self.state
            );
        }
    }

    /// Transient fix-delivery failure. Held for the UI to surface as a
    /// notification; never stops the session.
    pub fn on_location_error(&mut self, message: &str) {
        warn!("[WalkEngine] Location source error: {}", message);
        self.last_source_error = Some(WalkTrackError::LocationSource {
            message: message.to_string(),
        });
    }

    /// Take the most recent source failure, if any. Returns `None` once the
    /// error has been surfaced.
    pub fn take_last_source_error(&mut self) -> Option<WalkTrackError> {
        self.last_source_error.take()
    }
}

// ============================================================================
// Global Singleton
// ============================================================================

/// Global engine instance.
///
/// The mutex is the explicit single-writer guarantee: fixes, ticks, and
/// lifecycle calls from the host are serialized here, so a concurrent fix
/// and tick can never interleave partial accumulator updates. The host must
/// install its location bridge with
/// [`WalkSessionEngine::set_location_source`] at startup; until then,
/// starting a walk fails with `PermissionDenied` (status `NotDetermined`).
pub static ENGINE: Lazy<Mutex<WalkSessionEngine>> = Lazy::new(|| {
    Mutex::new(WalkSessionEngine::new(
        Box::new(crate::location::UnconfiguredLocationSource),
        TrackerConfig::default(),
    ))
});

/// Get a lock on the global engine.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&mut WalkSessionEngine) -> R,
{
    let mut engine = ENGINE.lock().unwrap();
    f(&mut engine)
}

// ============================================================================
// Tests
// ============================================================================
