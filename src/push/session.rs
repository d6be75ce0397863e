//! SockJS XHR polling session.

use crate::client::utils::join_path;
use crate::client::OctoPrintClient;
use crate::error::{OctoPrintError, Result};
use crate::protocol::paths;
use crate::protocol::{encode_send_body, Frame, FrameParser};
use crate::push::{PushMessage, PushStream};
use crate::resources::auth::LoginUser;
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::VecDeque;
use tokio::sync::mpsc;
use url::Url;
use uuid::Uuid;

/// Polls allowed before the open frame must have arrived.
const MAX_OPEN_POLLS: usize = 5;

/// Capacity of the channel between polling task and [`PushStream`].
const STREAM_BUFFER: usize = 64;

/// A push session on OctoPrint's SockJS endpoint.
///
/// Every poll is a `POST /sockjs/{server}/{session}/xhr`; outgoing messages
/// go to `.../xhr_send`. The session does not reconnect: once it is closed
/// a new session must be created.
#[derive(Debug)]
pub struct PushSession {
    client: OctoPrintClient,
    server_id: String,
    session_id: String,
    parser: FrameParser,
    pending: VecDeque<Frame>,
    close: Option<(u16, String)>,
    opened: bool,
    closed: bool,
}

impl PushSession {
    /// Create a session with a random server id and session id.
    pub fn new(client: &OctoPrintClient) -> Self {
        let id = Uuid::new_v4();
        let bytes = id.as_bytes();
        let server_id = format!("{:03}", u16::from_le_bytes([bytes[0], bytes[1]]) % 1000);
        Self::with_ids(client, server_id, id.simple().to_string())
    }

    /// Create a session with fixed ids.
    pub fn with_ids(
        client: &OctoPrintClient,
        server_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        PushSession {
            client: client.clone(),
            server_id: server_id.into(),
            session_id: session_id.into(),
            parser: FrameParser::new(),
            pending: VecDeque::new(),
            close: None,
            opened: false,
            closed: false,
        }
    }

    /// Three digit server id of the endpoint path.
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// Session id of the endpoint path.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether the open frame has been received.
    pub fn is_open(&self) -> bool {
        self.opened && !self.closed && self.close.is_none()
    }

    /// Poll until the server sends the open frame.
    ///
    /// Frames arriving in the same response after the open frame are kept
    /// for the next [`poll`](PushSession::poll).
    pub async fn open(&mut self) -> Result<()> {
        if self.opened {
            return Ok(());
        }
        for _ in 0..MAX_OPEN_POLLS {
            let mut frames: VecDeque<Frame> = self.fetch_frames().await?.into();
            while let Some(frame) = frames.pop_front() {
                match frame {
                    Frame::Open => {
                        self.opened = true;
                        self.pending.extend(frames);
                        return Ok(());
                    }
                    Frame::Close { code, reason } => {
                        self.closed = true;
                        return Err(OctoPrintError::PushClosed { code, reason });
                    }
                    Frame::Heartbeat => {}
                    Frame::Messages(_) => {
                        return Err(OctoPrintError::Push(
                            "messages received before session opened".to_string(),
                        ));
                    }
                }
            }
        }
        Err(OctoPrintError::Push(format!(
            "no open frame after {} polls",
            MAX_OPEN_POLLS
        )))
    }

    /// Poll once and return the decoded messages.
    ///
    /// Heartbeats are dropped, so the result may be empty. A close frame
    /// yields [`OctoPrintError::PushClosed`], after any messages that came
    /// before it have been returned. Messages whose payload does not fit
    /// their typed variant are returned as [`PushMessage::Other`].
    pub async fn poll(&mut self) -> Result<Vec<PushMessage>> {
        if let Some(err) = self.take_close() {
            return Err(err);
        }
        if self.closed {
            return Err(OctoPrintError::Push("session is closed".to_string()));
        }
        self.open().await?;

        let frames: Vec<Frame> = if self.pending.is_empty() {
            self.fetch_frames().await?
        } else {
            self.pending.drain(..).collect()
        };

        let mut messages = Vec::new();
        for frame in frames {
            match frame {
                Frame::Messages(items) => {
                    messages.extend(items.into_iter().filter_map(|item| self.decode(item)));
                }
                Frame::Close { code, reason } => {
                    self.close = Some((code, reason));
                    break;
                }
                Frame::Open | Frame::Heartbeat => {}
            }
        }

        if messages.is_empty() {
            if let Some(err) = self.take_close() {
                return Err(err);
            }
        }
        Ok(messages)
    }

    /// Send a message to the server.
    pub async fn send(&self, message: &Value) -> Result<()> {
        let body = encode_send_body(std::slice::from_ref(message));
        self.client
            .send_raw(Method::POST, self.endpoint("xhr_send")?, Some(&body))
            .await?;
        Ok(())
    }

    /// Authenticate the session with a user name and login session id.
    pub async fn authenticate(&self, user: &str, session: &str) -> Result<()> {
        self.send(&json!({ "auth": format!("{}:{}", user, session) }))
            .await
    }

    /// Authenticate with the result of a (passive) login.
    pub async fn authenticate_login(&self, login: &LoginUser) -> Result<()> {
        let token = login
            .auth_token()
            .ok_or_else(|| OctoPrintError::Push("login has no session".to_string()))?;
        self.send(&json!({ "auth": token })).await
    }

    /// Only receive every `factor`-th state update.
    pub async fn set_throttle(&self, factor: u32) -> Result<()> {
        self.send(&json!({ "throttle": factor })).await
    }

    /// Run the polling loop on a tokio task and stream its messages.
    ///
    /// Messages received before a close are forwarded first. The stream
    /// ends after the close or any other error, which is forwarded once.
    pub fn subscribe(mut self) -> PushStream {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let task = tokio::spawn(async move {
            loop {
                match self.poll().await {
                    Ok(messages) => {
                        for message in messages {
                            if tx.send(Ok(message)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        if self.client.config().enable_logging {
                            tracing::debug!(error = %e, "push session ended");
                        }
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
                if tx.is_closed() {
                    return;
                }
            }
        });
        PushStream::new(rx, task)
    }

    fn take_close(&mut self) -> Option<OctoPrintError> {
        let (code, reason) = self.close.take()?;
        self.closed = true;
        Some(OctoPrintError::PushClosed { code, reason })
    }

    fn decode(&self, item: Value) -> Option<PushMessage> {
        let (kind, payload) = match PushMessage::split(item) {
            Ok(parts) => parts,
            Err(e) => {
                if self.client.config().enable_logging {
                    tracing::debug!(error = %e, "skipping push message");
                }
                return None;
            }
        };
        match PushMessage::from_parts(&kind, payload.clone()) {
            Ok(message) => Some(message),
            Err(e) => {
                if self.client.config().enable_logging {
                    tracing::debug!(kind = %kind, error = %e, "undecodable push message kept untyped");
                }
                Some(PushMessage::untyped(&kind, payload))
            }
        }
    }

    fn endpoint(&self, transport: &str) -> Result<Url> {
        self.client.url(&join_path(&[
            paths::SOCKJS,
            self.server_id.as_str(),
            self.session_id.as_str(),
            transport,
        ]))
    }

    async fn fetch_frames(&mut self) -> Result<Vec<Frame>> {
        let (_, body) = self
            .client
            .send_raw(Method::POST, self.endpoint("xhr")?, None)
            .await?;
        let mut frames = self.parser.feed(&body)?;
        if let Some(frame) = self.parser.finish()? {
            frames.push(frame);
        }
        if self.client.config().enable_logging {
            for frame in &frames {
                tracing::trace!(session = %self.session_id, ?frame, "push frame");
            }
        }
        Ok(frames)
    }
}
