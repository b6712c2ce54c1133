//! Lifecycle and error reporting for the exchange loop.
//!
//! The loop never touches a global logger directly; it reports through the
//! [`DiagnosticsSink`] it was built with. [`TracingDiagnostics`] forwards to
//! whatever `tracing` subscriber the process installed at startup.

use crate::error::ExchangeError;
use crate::exchange::ExchangeState;

/// Something worth recording about a session.
///
/// Request contents, and in particular the credential, are never part of an
/// event.
#[derive(Debug)]
pub enum DiagnosticEvent<'a> {
    SessionStarted,
    StateChanged {
        state: ExchangeState,
    },
    FrameReceived {
        size: usize,
    },
    Dispatching {
        model: &'a str,
        default_system_prompt: bool,
        text_len: usize,
    },
    ResponseSent {
        size: usize,
        is_error: bool,
    },
    ExchangeFailed {
        state: ExchangeState,
        error: &'a ExchangeError,
    },
    /// The error frame for a failed exchange could not be delivered.
    ErrorReportFailed {
        error: &'a ExchangeError,
    },
    SessionClosed {
        exchanges: usize,
    },
}

/// Receiver for [`DiagnosticEvent`]s.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, event: &DiagnosticEvent<'_>);
}

/// Emits every event as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn record(&self, event: &DiagnosticEvent<'_>) {
        match event {
            DiagnosticEvent::SessionStarted => tracing::info!("native host session started"),
            DiagnosticEvent::StateChanged { state } => {
                tracing::trace!(state = %state, "exchange state changed");
            }
            DiagnosticEvent::FrameReceived { size } => {
                tracing::info!(size, "request frame received");
            }
            DiagnosticEvent::Dispatching {
                model,
                default_system_prompt,
                text_len,
            } => {
                tracing::info!(
                    model,
                    default_system_prompt,
                    text_len,
                    "sending completion request"
                );
            }
            DiagnosticEvent::ResponseSent { size, is_error } => {
                tracing::info!(size, is_error, "response frame sent");
            }
            DiagnosticEvent::ExchangeFailed { state, error } => {
                tracing::error!(state = %state, kind = ?error.kind(), error = %error, "exchange failed");
            }
            DiagnosticEvent::ErrorReportFailed { error } => {
                tracing::error!(error = %error, "could not send error response");
            }
            DiagnosticEvent::SessionClosed { exchanges } => {
                tracing::info!(exchanges, "input closed, session ended");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_accepts_every_event() {
        let error = ExchangeError::MissingCredential;
        let events = [
            DiagnosticEvent::SessionStarted,
            DiagnosticEvent::StateChanged {
                state: ExchangeState::Dispatching,
            },
            DiagnosticEvent::FrameReceived { size: 12 },
            DiagnosticEvent::Dispatching {
                model: "m",
                default_system_prompt: true,
                text_len: 2,
            },
            DiagnosticEvent::ResponseSent {
                size: 20,
                is_error: false,
            },
            DiagnosticEvent::ExchangeFailed {
                state: ExchangeState::Validating,
                error: &error,
            },
            DiagnosticEvent::ErrorReportFailed { error: &error },
            DiagnosticEvent::SessionClosed { exchanges: 1 },
        ];

        for event in &events {
            TracingDiagnostics.record(event);
        }
    }
}
