//! Calorie estimation from active walking time.
//!
//! The estimate is deliberately simple: a fixed burn rate at an assumed
//! body weight, scaled by active time. It is monotonic in active seconds,
//! so the displayed value never decreases during a walk.
//!
//! TODO: take the tracked dog's (or walker's) weight as an input once the
//! profile API exposes it; the backend currently has no weight field.

/// Energy burned per kilogram of body weight per hour of walking.
pub const BURN_RATE_KCAL_PER_KG_HOUR: f64 = 4.0;

/// Assumed walker weight in kilograms.
pub const ASSUMED_WEIGHT_KG: f64 = 70.0;

/// Estimate calories burned over `active_seconds` of walking.
///
/// # Example
/// ```
/// use walk_tracker::estimate_calories;
/// assert_eq!(estimate_calories(3600.0), 280.0); // one active hour
/// ```
pub fn estimate_calories(active_seconds: f64) -> f64 {
    (active_seconds / 3600.0) * BURN_RATE_KCAL_PER_KG_HOUR * ASSUMED_WEIGHT_KG
}
