use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use nativebridge_frame::{FrameConfig, FrameReader, FrameWriter};

use crate::collaborator::{Collaborator, CompletionRequest};
use crate::config::ExchangeConfig;
use crate::diagnostics::{DiagnosticEvent, DiagnosticsSink, TracingDiagnostics};
use crate::error::{ExchangeError, Result};
use crate::message::{Request, Response};

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    WaitingForFrame,
    Decoding,
    Validating,
    Dispatching,
    Encoding,
    Closed,
    Failed,
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WaitingForFrame => "waiting_for_frame",
            Self::Decoding => "decoding",
            Self::Validating => "validating",
            Self::Dispatching => "dispatching",
            Self::Encoding => "encoding",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a session that ended on clean end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Exchanges answered with a result.
    pub exchanges: usize,
}

enum Step {
    Answered,
    Closed,
}

/// Drives request/response exchanges over one input/output stream pair.
///
/// Exchanges run strictly one after another. The first failure ends the
/// session: an error frame is attempted, then [`run`](Self::run) returns
/// the error. No state is carried from one exchange to the next.
pub struct ExchangeLoop<R, W, C> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    collaborator: C,
    config: ExchangeConfig,
    diagnostics: Arc<dyn DiagnosticsSink>,
    state: ExchangeState,
}

impl<R: Read, W: Write, C: Collaborator> ExchangeLoop<R, W, C> {
    /// Create a loop with default configuration, browser frame limits and
    /// `tracing` diagnostics.
    pub fn new(input: R, output: W, collaborator: C) -> Self {
        Self {
            reader: FrameReader::new(input),
            writer: FrameWriter::with_config(output, FrameConfig::host_to_browser()),
            collaborator,
            config: ExchangeConfig::default(),
            diagnostics: Arc::new(TracingDiagnostics),
            state: ExchangeState::WaitingForFrame,
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Limits for incoming (`input`) and outgoing (`output`) frames.
    pub fn with_frame_limits(mut self, input: FrameConfig, output: FrameConfig) -> Self {
        self.reader.set_max_payload_size(input.max_payload_size);
        self.writer.set_max_payload_size(output.max_payload_size);
        self
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Run exchanges until the input closes or one fails.
    pub fn run(&mut self) -> Result<SessionSummary> {
        self.record(&DiagnosticEvent::SessionStarted);

        let mut exchanges = 0usize;
        loop {
            match self.exchange() {
                Ok(Step::Answered) => exchanges += 1,
                Ok(Step::Closed) => {
                    self.enter(ExchangeState::Closed);
                    self.record(&DiagnosticEvent::SessionClosed { exchanges });
                    return Ok(SessionSummary { exchanges });
                }
                Err(err) => {
                    self.fail(&err);
                    return Err(err);
                }
            }
        }
    }

    /// One full read, dispatch and reply cycle.
    fn exchange(&mut self) -> Result<Step> {
        self.enter(ExchangeState::WaitingForFrame);
        let Some(frame) = self
            .reader
            .read_frame()
            .map_err(ExchangeError::from_read)?
        else {
            return Ok(Step::Closed);
        };
        self.record(&DiagnosticEvent::FrameReceived {
            size: frame.payload.len(),
        });

        self.enter(ExchangeState::Decoding);
        let request = Request::from_payload(&frame.payload)?;

        self.enter(ExchangeState::Validating);
        let completion_request = self.prepare(request)?;

        self.enter(ExchangeState::Dispatching);
        let completion = self.collaborator.complete(&completion_request)?;
        let text = completion.first_text()?.to_string();

        self.enter(ExchangeState::Encoding);
        self.send(&Response::Result(text))?;
        Ok(Step::Answered)
    }

    /// Validate a request and fill in defaults.
    fn prepare(&self, request: Request) -> Result<CompletionRequest> {
        let api_key = request
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(ExchangeError::MissingCredential)?;

        let (system, default_system_prompt) = match request.system_prompt {
            Some(prompt) if !prompt.is_empty() => (prompt, false),
            _ => (self.config.default_system_prompt.clone(), true),
        };
        let text = request.text.unwrap_or_default();

        self.record(&DiagnosticEvent::Dispatching {
            model: &self.config.model,
            default_system_prompt,
            text_len: text.len(),
        });

        Ok(CompletionRequest {
            api_key,
            model: self.config.model.clone(),
            system,
            max_tokens: self.config.max_tokens,
            text,
        })
    }

    fn send(&mut self, response: &Response) -> Result<()> {
        let payload = response.to_payload()?;
        self.writer
            .write_frame(&payload)
            .map_err(ExchangeError::SendResponse)?;
        self.record(&DiagnosticEvent::ResponseSent {
            size: payload.len(),
            is_error: response.is_error(),
        });
        Ok(())
    }

    /// Record the failure and report it to the peer if the output allows.
    fn fail(&mut self, err: &ExchangeError) {
        self.record(&DiagnosticEvent::ExchangeFailed {
            state: self.state,
            error: err,
        });
        self.enter(ExchangeState::Failed);

        if !err.output_writable() {
            self.record(&DiagnosticEvent::ErrorReportFailed { error: err });
            return;
        }
        if let Err(send_err) = self.send(&Response::error(err)) {
            self.record(&DiagnosticEvent::ErrorReportFailed { error: &send_err });
        }
    }

    fn enter(&mut self, state: ExchangeState) {
        self.state = state;
        self.record(&DiagnosticEvent::StateChanged { state });
    }

    fn record(&self, event: &DiagnosticEvent<'_>) {
        self.diagnostics.record(event);
    }

    /// Consume the loop and return the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }
}
