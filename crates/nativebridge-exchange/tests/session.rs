use std::io::Cursor;
use std::sync::Mutex;

use nativebridge_exchange::{
    Collaborator, CollaboratorError, Completion, CompletionRequest, ErrorKind, ExchangeLoop,
    Response, SessionSummary, DEFAULT_SYSTEM_PROMPT,
};
use nativebridge_frame::{FrameReader, FrameWriter};

/// Replies with `echo:` followed by the user text.
#[derive(Default)]
struct Echo {
    seen: Mutex<Vec<CompletionRequest>>,
}

impl Collaborator for Echo {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CollaboratorError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(Completion::text(format!("echo:{}", request.text)))
    }
}

fn frames(payloads: &[&str]) -> Vec<u8> {
    let mut writer = FrameWriter::new(Cursor::new(Vec::new()));
    for payload in payloads {
        writer.write_frame(payload.as_bytes()).unwrap();
    }
    writer.into_inner().into_inner()
}

fn read_responses(output: Vec<u8>) -> Vec<Response> {
    let mut reader = FrameReader::new(Cursor::new(output));
    let mut out = Vec::new();
    while let Some(frame) = reader.read_frame().unwrap() {
        out.push(serde_json::from_slice(&frame.payload).unwrap());
    }
    out
}

fn session(
    input: Vec<u8>,
    collaborator: &Echo,
) -> (Result<SessionSummary, ErrorKind>, Vec<Response>) {
    let mut exchange = ExchangeLoop::new(Cursor::new(input), Vec::new(), collaborator);
    let result = exchange.run().map_err(|err| err.kind());
    let (_, output) = exchange.into_inner();
    (result, read_responses(output))
}

#[test]
fn many_exchanges_answer_in_order() {
    let echo = Echo::default();
    let (result, responses) = session(
        frames(&[
            r#"{"apiKey":"k","text":"one"}"#,
            r#"{"apiKey":"k","text":"twö"}"#,
            r#"{"apiKey":"k","text":"three"}"#,
        ]),
        &echo,
    );

    assert_eq!(result, Ok(SessionSummary { exchanges: 3 }));
    assert_eq!(
        responses,
        vec![
            Response::Result("echo:one".to_string()),
            Response::Result("echo:twö".to_string()),
            Response::Result("echo:three".to_string()),
        ]
    );
}

#[test]
fn omitted_system_prompt_uses_default() {
    let echo = Echo::default();
    let (result, _) = session(frames(&[r#"{"apiKey":"k","text":"hi"}"#]), &echo);

    assert!(result.is_ok());
    assert_eq!(echo.seen.lock().unwrap()[0].system, DEFAULT_SYSTEM_PROMPT);
}

#[test]
fn failure_stops_before_later_frames() {
    let echo = Echo::default();
    let (result, responses) = session(
        frames(&[
            r#"{"apiKey":"k","text":"first"}"#,
            r#"{"text":"no key"}"#,
            r#"{"apiKey":"k","text":"never"}"#,
        ]),
        &echo,
    );

    assert_eq!(result, Err(ErrorKind::MissingCredential));
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0], Response::Result("echo:first".to_string()));
    assert!(responses[1].is_error());
    assert_eq!(echo.seen.lock().unwrap().len(), 1);
}

#[test]
fn length_prefix_longer_than_stream_is_malformed() {
    let mut input = 64u32.to_le_bytes().to_vec();
    input.extend_from_slice(br#"{"apiKey":"k"}"#);

    let echo = Echo::default();
    let (result, responses) = session(input, &echo);

    assert_eq!(result, Err(ErrorKind::MalformedFrame));
    assert_eq!(responses.len(), 1);
    assert!(responses[0].is_error());
    assert!(echo.seen.lock().unwrap().is_empty());
}

#[test]
fn independent_sessions_do_not_share_state() {
    let echo = Echo::default();
    let failing = frames(&[r#"{"apiKey":""}"#]);
    let passing = frames(&[r#"{"apiKey":"k","systemPrompt":"custom","text":"x"}"#]);

    let (first, first_out) = session(failing.clone(), &echo);
    let (second, second_out) = session(passing.clone(), &echo);
    let (third, third_out) = session(failing, &echo);
    let (fourth, fourth_out) = session(passing, &echo);

    assert_eq!(first, third);
    assert_eq!(first_out, third_out);
    assert_eq!(second, fourth);
    assert_eq!(second_out, fourth_out);
    assert_eq!(second_out, vec![Response::Result("echo:x".to_string())]);

    let seen = echo.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[test]
#[cfg(unix)]
fn runs_over_a_socket_pair() {
    let (host_in, mut browser_out) = std::os::unix::net::UnixStream::pair().unwrap();
    let (mut browser_in, host_out) = std::os::unix::net::UnixStream::pair().unwrap();

    let host = std::thread::spawn(move || {
        let echo = Echo::default();
        let result = ExchangeLoop::new(host_in, host_out, &echo)
            .run()
            .map_err(|e| e.kind());
        result
    });

    let mut writer = FrameWriter::new(&mut browser_out);
    writer.write_frame(br#"{"apiKey":"k","text":"ping"}"#).unwrap();

    let mut reader = FrameReader::new(&mut browser_in);
    let frame = reader.read_frame().unwrap().unwrap();
    let response: Response = serde_json::from_slice(&frame.payload).unwrap();
    assert_eq!(response, Response::Result("echo:ping".to_string()));

    drop(writer);
    drop(browser_out);
    assert_eq!(host.join().unwrap(), Ok(SessionSummary { exchanges: 1 }));
}
