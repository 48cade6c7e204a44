//! Session upload to the walk API.
//!
//! The payload types are always available (and unit-testable); the HTTP
//! client itself is behind the `http` feature. The upload is a single
//! attempt with no retry or offline queue: a failure is surfaced to the
//! caller and the session is not persisted for later. The session uuid is
//! carried in the payload as an idempotency key, so a retry layer could be
//! added server-side or host-side without changing the wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::WalkSession;

/// One `{lat, lng}` pair of the uploaded path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Wire payload for a finished session.
///
/// Field names and units are a contract with the walk API: distance in
/// kilometers, duration in seconds, calories integer-rounded, path as an
/// ordered list of `{lat, lng}` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Idempotency key.
    pub session_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub distance_km: f64,
    pub calories: i64,
    pub average_speed_kmh: f64,
    pub path: Vec<PathPoint>,
    /// Dogs (and walker) that took part in the walk.
    pub participant_ids: Vec<i64>,
}

impl SessionPayload {
    /// Build the wire payload from a finished session.
    pub fn new(session: &WalkSession, participant_ids: Vec<i64>) -> Self {
        Self {
            session_id: session.id,
            start_time: session.start_time,
            end_time: session.end_time,
            duration_seconds: session.duration_seconds,
            distance_km: session.distance_km,
            calories: session.calories.round() as i64,
            average_speed_kmh: session.average_speed_kmh,
            path: session
                .path
                .iter()
                .map(|p| PathPoint {
                    lat: p.latitude,
                    lng: p.longitude,
                })
                .collect(),
            participant_ids,
        }
    }
}

#[cfg(feature = "http")]
pub use client::SessionUploader;

#[cfg(feature = "http")]
mod client {
    use std::time::Duration;

    use log::{info, warn};
    use reqwest::Client;

    use super::SessionPayload;
    use crate::error::{Result, WalkTrackError};
    use crate::session::WalkSession;

    const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Single-attempt session uploader.
    pub struct SessionUploader {
        client: Client,
        endpoint: String,
        auth_header: String,
    }

    impl SessionUploader {
        /// Create an uploader for the given API base URL and bearer token.
        pub fn new(base_url: &str, token: &str) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .map_err(|e| WalkTrackError::Upload {
                    message: format!("failed to create HTTP client: {e}"),
                    status_code: None,
                })?;

            Ok(Self {
                client,
                endpoint: format!("{}/walks/sessions", base_url.trim_end_matches('/')),
                auth_header: format!("Bearer {token}"),
            })
        }

        /// Upload one finished session from synchronous host code.
        ///
        /// Spins up a runtime for the single call; FFI-facing hosts without
        /// an async runtime of their own use this entry point.
        pub fn upload_blocking(
            &self,
            session: &WalkSession,
            participant_ids: &[i64],
        ) -> Result<bool> {
            let runtime =
                tokio::runtime::Runtime::new().map_err(|e| WalkTrackError::Internal {
                    message: format!("failed to create upload runtime: {e}"),
                })?;
            runtime.block_on(self.upload(session, participant_ids))
        }

        /// Upload one finished session. Exactly one attempt; a failure is
        /// returned to the caller and never retried here.
        pub async fn upload(
            &self,
            session: &WalkSession,
            participant_ids: &[i64],
        ) -> Result<bool> {
            let payload = SessionPayload::new(session, participant_ids.to_vec());

            let response = self
                .client
                .post(&self.endpoint)
                .header("Authorization", &self.auth_header)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    warn!("[SessionUploader] Request failed: {e}");
                    WalkTrackError::Upload {
                        message: e.to_string(),
                        status_code: None,
                    }
                })?;

            let status = response.status();
            if status.is_success() {
                info!(
                    "[SessionUploader] Uploaded session {} ({:.2} km)",
                    payload.session_id, payload.distance_km
                );
                Ok(true)
            } else {
                let body = response.text().await.unwrap_or_default();
                warn!(
                    "[SessionUploader] Upload rejected ({}): {}",
                    status, body
                );
                Err(WalkTrackError::Upload {
                    message: body,
                    status_code: Some(status.as_u16()),
                })
            }
        }
    }

}
