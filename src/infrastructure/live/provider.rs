use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{Message as WsMessage, Utf8Bytes};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::error::{LiveError, LiveResult};
use crate::infrastructure::config::AppConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, WsMessage>;
type WsReader = SplitStream<WsStream>;

const ABNORMAL_CLOSURE: u16 = 1006;
const OUTGOING_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Frame received on the live connection, forwarded unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    Text(String),
    Binary(Vec<u8>),
    /// Connection ended. Always the last event.
    Closed { code: u16, reason: String },
}

/// Opens the live connection.
#[derive(Debug, Clone)]
pub struct LiveProvider {
    url: String,
    connect_timeout: Duration,
    event_buffer: usize,
}

impl LiveProvider {
    #[must_use]
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            connect_timeout,
            event_buffer: EVENT_BUFFER,
        }
    }

    /// Frames held for the handle before new ones are dropped.
    #[must_use]
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.live_url(), config.live_connect_timeout())
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connects and starts forwarding frames.
    ///
    /// The connection stays open until the returned handle is closed or
    /// dropped.
    ///
    /// # Errors
    /// Returns `InvalidUrl` for a non-WebSocket URL, `Timeout` or
    /// `ConnectionFailed` if the handshake does not complete.
    pub async fn mount(&self) -> LiveResult<LiveHandle> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(LiveError::InvalidUrl {
                url: self.url.clone(),
            });
        }

        debug!(url = %self.url, "Opening live connection");
        let (stream, _) = timeout(self.connect_timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| LiveError::timeout("connection"))?
            .map_err(|e| LiveError::connection_failed(e.to_string()))?;
        info!(url = %self.url, "Live connection established");

        let (writer, reader) = stream.split();
        let (event_tx, event_rx) = mpsc::channel(self.event_buffer);
        let (outgoing_tx, outgoing_rx) = mpsc::channel(OUTGOING_BUFFER);
        let cancel = CancellationToken::new();
        let active = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(run_connection(
            writer,
            reader,
            event_tx,
            outgoing_rx,
            cancel.clone(),
            active.clone(),
        ));

        Ok(LiveHandle {
            events: event_rx,
            outgoing: outgoing_tx,
            cancel,
            active,
            task: Some(task),
        })
    }
}

/// Owner of a mounted connection. Dropping it tears the connection down.
pub struct LiveHandle {
    events: mpsc::Receiver<LiveEvent>,
    outgoing: mpsc::Sender<String>,
    cancel: CancellationToken,
    active: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl LiveHandle {
    /// Waits for the next frame. `None` once the connection is gone and
    /// every buffered event was consumed. Frames that arrive while the
    /// buffer is full are dropped; `Closed` is never dropped.
    pub async fn next_event(&mut self) -> Option<LiveEvent> {
        self.events.recv().await
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Sends a text frame.
    ///
    /// # Errors
    /// Returns `NotConnected` once the connection has ended.
    pub async fn send_text(&self, text: impl Into<String>) -> LiveResult<()> {
        if !self.is_active() {
            return Err(LiveError::NotConnected);
        }
        self.outgoing
            .send(text.into())
            .await
            .map_err(|_| LiveError::NotConnected)
    }

    /// Closes the connection and waits for the forwarding task to finish.
    pub async fn close(mut self) {
        self.events.close();
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && timeout(CLOSE_GRACE, task).await.is_err()
        {
            warn!("Live connection did not shut down in time");
        }
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_connection(
    mut writer: WsWriter,
    mut reader: WsReader,
    events: mpsc::Sender<LiveEvent>,
    mut outgoing: mpsc::Receiver<String>,
    cancel: CancellationToken,
    active: Arc<AtomicBool>,
) {
    let mut dropped = 0u64;
    let closed = loop {
        tokio::select! {
            () = cancel.cancelled() => {
                let frame = CloseFrame {
                    code: CloseCode::Normal,
                    reason: Utf8Bytes::from_static("client closing"),
                };
                if let Err(e) = writer.send(WsMessage::Close(Some(frame))).await {
                    debug!(error = %e, "Close frame not delivered");
                }
                let _ = writer.close().await;
                break (u16::from(CloseCode::Normal), "closed by client".to_string());
            }
            Some(text) = outgoing.recv() => {
                if let Err(e) = writer.send(WsMessage::Text(text.into())).await {
                    warn!(error = %e, "Failed to send live frame");
                    break (ABNORMAL_CLOSURE, e.to_string());
                }
            }
            frame = reader.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    trace!(len = text.len(), "Live text frame");
                    forward(&events, LiveEvent::Text(text.as_str().to_owned()), &mut dropped);
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    trace!(len = data.len(), "Live binary frame");
                    forward(&events, LiveEvent::Binary(data.to_vec()), &mut dropped);
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    let _ = writer.send(WsMessage::Pong(data)).await;
                }
                Some(Ok(WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                Some(Ok(WsMessage::Close(frame))) => {
                    break frame.map_or_else(
                        || (1000, "Normal closure".to_string()),
                        |f| (f.code.into(), f.reason.to_string()),
                    );
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Live connection error");
                    break (ABNORMAL_CLOSURE, e.to_string());
                }
                None => break (ABNORMAL_CLOSURE, "Stream ended".to_string()),
            }
        }
    };

    active.store(false, Ordering::SeqCst);
    let (code, reason) = closed;
    if dropped > 0 {
        warn!(dropped, "Live frames dropped while the reader was behind");
    }
    info!(code, reason = %reason, "Live connection closed");
    let _ = events.send(LiveEvent::Closed { code, reason }).await;
}

fn forward(events: &mpsc::Sender<LiveEvent>, event: LiveEvent, dropped: &mut u64) {
    match events.try_send(event) {
        Ok(()) | Err(TrySendError::Closed(_)) => {}
        Err(TrySendError::Full(_)) => {
            *dropped += 1;
            if *dropped == 1 {
                warn!("Live event queue full, dropping frames");
            }
        }
    }
}
