//! Single-exchange request/response lifecycle for a native messaging host.
//!
//! One framed JSON request is read from the browser, forwarded to a
//! text-generation [`Collaborator`], and answered with exactly one framed
//! `{"result": ...}` or `{"error": ...}` response. Any failure ends the
//! session after a best-effort error frame; end of input ends it cleanly.

pub mod client;
pub mod collaborator;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exchange;
pub mod message;

pub use client::MessagesClient;
pub use collaborator::{Collaborator, Completion, CompletionRequest, ContentBlock};
pub use config::{
    ClientConfig, ExchangeConfig, DEFAULT_API_BASE_URL, DEFAULT_API_VERSION, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SYSTEM_PROMPT,
};
pub use diagnostics::{DiagnosticEvent, DiagnosticsSink, TracingDiagnostics};
pub use error::{CollaboratorError, ErrorKind, ExchangeError, Result};
pub use exchange::{ExchangeLoop, ExchangeState, SessionSummary};
pub use message::{Request, Response};
