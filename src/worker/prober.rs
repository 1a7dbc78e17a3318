//! Issues a single HTTP GET against a target and classifies the outcome.
//!
//! The prober never returns an error: every transport-level failure is
//! folded into [`ProbeOutcome::TransportError`].

use std::time::Instant;

use chrono::{DateTime, Utc};

/// How a single probe attempt resolved. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered; any HTTP status counts, including non-2xx.
    Response { status: u16 },
    /// The request never produced a response: DNS failure, connection
    /// refused, or the per-request timeout expired.
    TransportError { message: String },
}

impl ProbeOutcome {
    /// Whether the attempt counts as healthy. A response with a status in
    /// the 200..=399 range is ok; everything else is not.
    pub fn is_ok(&self) -> bool {
        match self {
            ProbeOutcome::Response { status } => (200..400).contains(status),
            ProbeOutcome::TransportError { .. } => false,
        }
    }

    /// The HTTP status for the log row; transport failures record 0.
    pub fn status_code(&self) -> u16 {
        match self {
            ProbeOutcome::Response { status } => *status,
            ProbeOutcome::TransportError { .. } => 0,
        }
    }

    /// Short human-readable cause, present only on transport failures.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Response { .. } => None,
            ProbeOutcome::TransportError { message } => Some(message),
        }
    }
}

/// The immutable record of one probe attempt, consumed exactly once by the
/// result recorder.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub target_id: i32,
    pub issued_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub outcome: ProbeOutcome,
}

/// Performs one GET request against `url` and measures the wall-clock
/// latency, inclusive of connection setup. The per-request timeout is
/// carried by the shared `client`.
pub async fn probe(client: &reqwest::Client, target_id: i32, url: &str) -> ProbeResult {
    let issued_at = Utc::now();
    let started = Instant::now();

    let outcome = match client.get(url).send().await {
        Ok(response) => ProbeOutcome::Response {
            status: response.status().as_u16(),
        },
        Err(err) => {
            let message = if err.is_timeout() {
                "request timed out".to_string()
            } else {
                err.to_string()
            };
            ProbeOutcome::TransportError { message }
        }
    };

    let duration_ms = started.elapsed().as_millis() as i64;

    ProbeResult {
        target_id,
        issued_at,
        completed_at: Utc::now(),
        duration_ms,
        outcome,
    }
}
