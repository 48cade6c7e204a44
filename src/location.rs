//! Abstraction over the platform location facility.
//!
//! The host app bridges its native location manager (CoreLocation, Fused
//! Location Provider, ...) to the engine through the [`LocationSource`] trait
//! and pushes fixes into [`WalkSessionEngine::handle_fix`]. Injecting the
//! source rather than reaching for a platform singleton keeps the engine
//! deterministic under test: a double can replay a fixed sequence of fixes.
//!
//! [`WalkSessionEngine::handle_fix`]: crate::engine::WalkSessionEngine::handle_fix

use serde::{Deserialize, Serialize};

/// Location authorization status, mirroring the platform's permission model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    Granted,
    Denied,
    Restricted,
    NotDetermined,
}

impl AuthorizationStatus {
    /// Whether tracking may start under this status.
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthorizationStatus::Granted)
    }
}

/// The platform location facility, as seen by the engine.
///
/// The source is expected to apply its own minimum-movement filter (~5 m)
/// before delivering fixes; the engine accepts fixes as delivered.
pub trait LocationSource {
    /// Current authorization status. Checked once at session start.
    fn authorization(&self) -> AuthorizationStatus;

    /// Begin delivering fixes to the engine.
    fn start_updating(&mut self);

    /// Stop delivering fixes.
    fn stop_updating(&mut self);
}

/// Placeholder source used by the global engine until the host installs its
/// native bridge. Reports `NotDetermined`, so `start()` fails with
/// `PermissionDenied` rather than silently tracking nothing.
pub struct UnconfiguredLocationSource;

impl LocationSource for UnconfiguredLocationSource {
    fn authorization(&self) -> AuthorizationStatus {
        AuthorizationStatus::NotDetermined
    }

    fn start_updating(&mut self) {}

    fn stop_updating(&mut self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Test double: fixed authorization status plus call counters.
    pub(crate) struct StubLocationSource {
        status: AuthorizationStatus,
        pub updating: Arc<AtomicBool>,
        pub start_calls: Arc<AtomicUsize>,
        pub stop_calls: Arc<AtomicUsize>,
    }

    impl StubLocationSource {
        pub fn new(status: AuthorizationStatus) -> Self {
            Self {
                status,
                updating: Arc::new(AtomicBool::new(false)),
                start_calls: Arc::new(AtomicUsize::new(0)),
                stop_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Handles onto the counters, usable after the source is boxed.
        pub fn handles(&self) -> (Arc<AtomicBool>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            (
                self.updating.clone(),
                self.start_calls.clone(),
                self.stop_calls.clone(),
            )
        }
    }

    impl LocationSource for StubLocationSource {
        fn authorization(&self) -> AuthorizationStatus {
            self.status
        }

        fn start_updating(&mut self) {
            self.updating.store(true, Ordering::SeqCst);
            self.start_calls.fetch_add(1, Ordering::SeqCst);
        }

        fn stop_updating(&mut self) {
            self.updating.store(false, Ordering::SeqCst);
            self.stop_calls.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_granted() {
        assert!(AuthorizationStatus::Granted.is_granted());
        assert!(!AuthorizationStatus::Denied.is_granted());
        assert!(!AuthorizationStatus::Restricted.is_granted());
        assert!(!AuthorizationStatus::NotDetermined.is_granted());
    }
}
