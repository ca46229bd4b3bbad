//! Transport error taxonomy shared by vendor gateways.
//!
//! The HTTP client itself lives in each integration. What is shared here is
//! how a response status maps to an error and which errors are worth
//! retrying after a fixed delay.

use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a vendor gateway while talking to the remote API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    // Client errors
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unavailable for legal reasons: {0}")]
    UnavailableForLegalReasons(String),

    // Retryable server errors
    #[error("too many requests: {0}")]
    TooManyRequests(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("gateway timeout: {0}")]
    GatewayTimeout(String),

    // Non-retryable server errors
    #[error("internal server error: {0}")]
    InternalServerError(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("unexpected response status {status}: {body}")]
    Unexpected { status: u16, body: String },

    #[error("connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    /// Map a response status to an error.
    ///
    /// Returns `None` for the success statuses 200, 201 and 204.
    pub fn from_status(status: u16, body: impl Into<String>) -> Option<Self> {
        let body = body.into();
        let err = match status {
            200 | 201 | 204 => return None,
            400 => TransportError::BadRequest(body),
            401 => TransportError::Unauthorized(body),
            403 => TransportError::Forbidden(body),
            404 => TransportError::NotFound(body),
            405 => TransportError::MethodNotAllowed(body),
            409 => TransportError::Conflict(body),
            429 => TransportError::TooManyRequests(body),
            451 => TransportError::UnavailableForLegalReasons(body),
            500 => TransportError::InternalServerError(body),
            501 => TransportError::NotImplemented(body),
            503 => TransportError::ServiceUnavailable(body),
            504 => TransportError::GatewayTimeout(body),
            status => TransportError::Unexpected { status, body },
        };
        Some(err)
    }

    /// HTTP status behind this error, if there was a response at all.
    pub fn status(&self) -> Option<u16> {
        let status = match self {
            TransportError::BadRequest(_) => 400,
            TransportError::Unauthorized(_) => 401,
            TransportError::Forbidden(_) => 403,
            TransportError::NotFound(_) => 404,
            TransportError::MethodNotAllowed(_) => 405,
            TransportError::Conflict(_) => 409,
            TransportError::TooManyRequests(_) => 429,
            TransportError::UnavailableForLegalReasons(_) => 451,
            TransportError::InternalServerError(_) => 500,
            TransportError::NotImplemented(_) => 501,
            TransportError::ServiceUnavailable(_) => 503,
            TransportError::GatewayTimeout(_) => 504,
            TransportError::Unexpected { status, .. } => *status,
            TransportError::Connection(_) => return None,
        };
        Some(status)
    }

    /// Whether the request may succeed if sent again after a pause.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::TooManyRequests(_)
                | TransportError::ServiceUnavailable(_)
                | TransportError::GatewayTimeout(_)
        )
    }
}

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero behaves like one.
    pub attempts: u32,
    /// Pause before each new attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Run `op`, sending it again while it fails with a retryable error and
    /// attempts remain. The last error is returned once they run out.
    pub fn run<T, F>(&self, mut op: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Result<T, TransportError>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %err,
                        "Retrying vendor request"
                    );
                    thread::sleep(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
