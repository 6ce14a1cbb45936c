use crate::client::ApiClient;
use crate::error::ApiError;
use eventsource_stream::Eventsource;
use futures::{pin_mut, Stream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

pub use tokio_util::sync::CancellationToken;

/// Advisory event forwarded to the caller while a generation stream is
/// running. Deltas are also collected into the session buffer; the
/// completion payload remains authoritative.
#[derive(Debug, Clone)]
pub enum StreamNotice {
    Progress {
        message: String,
        percent: Option<u8>,
        status: Option<String>,
    },
    Delta {
        text: String,
    },
}

/// How a stream session ended. Exactly one of these per session, and
/// `Cancelled` fires no callback at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed,
    Failed,
    Cancelled,
}

/// Handed back when the session ends. `text` is the accumulated delta
/// buffer, kept for display only.
#[derive(Debug)]
pub struct StreamSummary {
    pub outcome: StreamOutcome,
    pub text: String,
}

/// Deliverable of a text-mode stream (chapter drafting): the assembled
/// content plus the word count reported by the final frame.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub content: String,
    pub word_count: u64,
}

/// Caller-supplied callbacks and cancellation token for one session.
///
/// Guarantee: `on_progress` fires zero or more times, strictly before the
/// single terminal event; `on_complete` and `on_error` are mutually
/// exclusive and never fire after cancellation.
pub struct StreamOptions<T> {
    on_progress: Option<Box<dyn FnMut(StreamNotice) + Send>>,
    on_complete: Option<Box<dyn FnOnce(T) + Send>>,
    on_error: Option<Box<dyn FnOnce(ApiError) + Send>>,
    cancel: CancellationToken,
}

impl<T> Default for StreamOptions<T> {
    fn default() -> Self {
        Self {
            on_progress: None,
            on_complete: None,
            on_error: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl<T> StreamOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, callback: impl FnMut(StreamNotice) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    pub fn on_complete(mut self, callback: impl FnOnce(T) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(ApiError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn notify(&mut self, notice: StreamNotice) {
        if let Some(callback) = self.on_progress.as_mut() {
            callback(notice);
        }
    }

    fn complete(mut self, value: T) {
        if let Some(callback) = self.on_complete.take() {
            callback(value);
        }
    }

    fn fail(mut self, err: ApiError) {
        if let Some(callback) = self.on_error.take() {
            callback(err);
        }
    }
}

/// Wire frame: one decoded `data:` payload, dispatched on its `type` tag.
/// The generation endpoints speak two dialects (wizard streams finish
/// with `result` + `done`, chapter streams with a bare `done`); both are
/// covered here.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Frame {
    Progress {
        #[serde(default)]
        message: String,
        #[serde(default)]
        progress: Option<u8>,
        #[serde(default)]
        status: Option<String>,
    },
    Start {
        #[serde(default)]
        message: String,
    },
    #[serde(alias = "content")]
    Chunk { content: String },
    Heartbeat,
    Result { data: Value },
    Error {
        #[serde(alias = "error")]
        message: String,
        #[serde(default)]
        code: Option<u16>,
    },
    Done {
        #[serde(default)]
        word_count: Option<u64>,
    },
}

/// Terminal condition of the reader loop. `None` from the driver means
/// the session was cancelled and nothing may fire.
#[derive(Debug)]
pub(crate) enum Terminal {
    Result(Value),
    Done { word_count: Option<u64> },
    ServerError { message: String, code: Option<u16> },
    Eof,
    Transport(String),
}

/// Reader loop over an SSE byte stream. Frames may span network reads;
/// the incremental decoder keeps the unfinished tail buffered. Malformed
/// frames are logged and skipped; isolated corruption never ends the
/// stream.
pub(crate) async fn drive<T, S, B, E>(
    bytes: S,
    options: &mut StreamOptions<T>,
    text: &mut String,
) -> Option<Terminal>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let cancel = options.cancel.clone();
    let events = bytes.eventsource();
    pin_mut!(events);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            next = events.next() => match next {
                None => return Some(Terminal::Eof),
                Some(Err(err)) => return Some(Terminal::Transport(err.to_string())),
                Some(Ok(event)) => {
                    let frame = match serde_json::from_str::<Frame>(&event.data) {
                        Ok(frame) => frame,
                        Err(err) => {
                            warn!(
                                target: "inkweave::stream",
                                %err,
                                data = %event.data,
                                "skipping malformed stream frame"
                            );
                            continue;
                        }
                    };
                    match frame {
                        Frame::Progress { message, progress, status } => {
                            options.notify(StreamNotice::Progress {
                                message,
                                percent: progress,
                                status,
                            });
                        }
                        Frame::Start { message } => {
                            options.notify(StreamNotice::Progress {
                                message,
                                percent: None,
                                status: None,
                            });
                        }
                        Frame::Chunk { content } => {
                            text.push_str(&content);
                            options.notify(StreamNotice::Delta { text: content });
                        }
                        Frame::Heartbeat => {
                            trace!(target: "inkweave::stream", "heartbeat");
                        }
                        Frame::Result { data } => return Some(Terminal::Result(data)),
                        Frame::Error { message, code } => {
                            return Some(Terminal::ServerError { message, code })
                        }
                        Frame::Done { word_count } => {
                            return Some(Terminal::Done { word_count })
                        }
                    }
                }
            }
        }
    }
}

impl ApiClient {
    async fn open_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;
        self.send(
            self.request(Method::POST, url)
                .header(ACCEPT, "text/event-stream")
                .json(payload),
        )
        .await
    }

    /// POST eliciting a long-lived event stream whose final payload
    /// arrives in a `result` frame, decoded into `T`. A `done` marker or
    /// EOF without a preceding result is a protocol error.
    pub async fn stream_post<B, T>(
        &self,
        path: &str,
        payload: &B,
        mut options: StreamOptions<T>,
    ) -> StreamSummary
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = match self.open_stream(path, payload).await {
            Ok(response) => response,
            Err(err) => {
                options.fail(err);
                return StreamSummary {
                    outcome: StreamOutcome::Failed,
                    text: String::new(),
                };
            }
        };
        let mut text = String::new();
        let terminal = drive(response.bytes_stream(), &mut options, &mut text).await;
        let outcome = match terminal {
            None => StreamOutcome::Cancelled,
            Some(Terminal::Result(data)) => match serde_json::from_value::<T>(data) {
                Ok(result) => {
                    options.complete(result);
                    StreamOutcome::Completed
                }
                Err(err) => {
                    options.fail(ApiError::Decode(err));
                    StreamOutcome::Failed
                }
            },
            Some(Terminal::Done { .. }) | Some(Terminal::Eof) => {
                options.fail(ApiError::Stream(
                    "stream ended before a result frame".to_string(),
                ));
                StreamOutcome::Failed
            }
            Some(Terminal::ServerError { message, code }) => {
                options.fail(ApiError::Generation { message, code });
                StreamOutcome::Failed
            }
            Some(Terminal::Transport(detail)) => {
                options.fail(ApiError::Stream(detail));
                StreamOutcome::Failed
            }
        };
        StreamSummary { outcome, text }
    }

    /// POST eliciting an event stream that delivers raw text deltas and
    /// finishes with a `done` marker; the accumulated text is the
    /// deliverable.
    pub async fn stream_text_post<B>(
        &self,
        path: &str,
        payload: &B,
        mut options: StreamOptions<GeneratedText>,
    ) -> StreamSummary
    where
        B: Serialize + ?Sized,
    {
        let response = match self.open_stream(path, payload).await {
            Ok(response) => response,
            Err(err) => {
                options.fail(err);
                return StreamSummary {
                    outcome: StreamOutcome::Failed,
                    text: String::new(),
                };
            }
        };
        let mut text = String::new();
        let terminal = drive(response.bytes_stream(), &mut options, &mut text).await;
        let outcome = match terminal {
            None => StreamOutcome::Cancelled,
            Some(Terminal::Done { word_count }) => {
                let word_count = word_count.unwrap_or_else(|| text.chars().count() as u64);
                options.complete(GeneratedText {
                    content: text.clone(),
                    word_count,
                });
                StreamOutcome::Completed
            }
            // A result frame on a text stream is unexpected but harmless;
            // the accumulated text is still the deliverable.
            Some(Terminal::Result(_)) => {
                let word_count = text.chars().count() as u64;
                options.complete(GeneratedText {
                    content: text.clone(),
                    word_count,
                });
                StreamOutcome::Completed
            }
            Some(Terminal::Eof) => {
                options.fail(ApiError::Stream(
                    "stream closed before completion".to_string(),
                ));
                StreamOutcome::Failed
            }
            Some(Terminal::ServerError { message, code }) => {
                options.fail(ApiError::Generation { message, code });
                StreamOutcome::Failed
            }
            Some(Terminal::Transport(detail)) => {
                options.fail(ApiError::Stream(detail));
                StreamOutcome::Failed
            }
        };
        StreamSummary { outcome, text }
    }
}
