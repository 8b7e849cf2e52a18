//! WebSocket client for the notice service link.

use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use traybell_protocol::constants::{PING_PAYLOAD, WS_MAX_MESSAGE_SIZE};

use crate::endpoint::Endpoint;

/// Errors from the connection layer.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("WebSocket error: {0}")]
    Ws(#[from] tungstenite::Error),

    #[error("connect attempt timed out")]
    Timeout,

    #[error("connection closed")]
    Closed,
}

/// Events flowing from the pumps to the manager run loop.
///
/// Tagged with the generation of the link that produced them, so the
/// manager can drop events from a link it has already replaced.
#[derive(Debug)]
pub(crate) struct LinkEvent {
    pub(crate) generation: u64,
    pub(crate) kind: LinkEventKind,
}

#[derive(Debug)]
pub(crate) enum LinkEventKind {
    /// Inbound text frame.
    Text(String),
    /// Protocol-level pong.
    Pong,
    /// The link went down: close frame, read error, or stream end.
    Closed,
}

/// A live WebSocket link.
///
/// Owns the read/write pump tasks; dropping the client cancels both.
pub(crate) struct WsClient {
    write_tx: mpsc::Sender<tungstenite::Message>,
    cancel: CancellationToken,
    _read_handle: tokio::task::JoinHandle<()>,
    _write_handle: tokio::task::JoinHandle<()>,
}

impl WsClient {
    /// Opens the WebSocket and starts the pumps.
    ///
    /// Inbound frames arrive on `events_tx` tagged with `generation`.
    pub(crate) async fn connect(
        endpoint: &Endpoint,
        generation: u64,
        events_tx: mpsc::Sender<LinkEvent>,
    ) -> Result<Self, ConnectionError> {
        use tungstenite::client::IntoClientRequest;

        let mut request = endpoint.url().into_client_request()?;
        if let Ok(origin) = tungstenite::http::HeaderValue::from_str(&endpoint.origin()) {
            request
                .headers_mut()
                .insert(tungstenite::http::header::ORIGIN, origin);
        }

        let mut ws_config = tungstenite::protocol::WebSocketConfig::default();
        ws_config.max_message_size = Some(WS_MAX_MESSAGE_SIZE);
        ws_config.max_frame_size = Some(WS_MAX_MESSAGE_SIZE);

        let (ws_stream, _) =
            tokio_tungstenite::connect_async_with_config(request, Some(ws_config), false).await?;
        debug!(generation, "WebSocket handshake complete");

        use futures_util::StreamExt;
        let (write, read) = ws_stream.split();

        let (write_tx, write_rx) = mpsc::channel::<tungstenite::Message>(64);
        let cancel = CancellationToken::new();

        let write_handle = {
            let cancel = cancel.clone();
            tokio::spawn(crate::pumps::write::write_pump(write, write_rx, cancel))
        };

        let read_handle = {
            let cancel = cancel.clone();
            let write_tx = write_tx.clone();
            tokio::spawn(crate::pumps::read::read_pump(
                read, generation, events_tx, write_tx, cancel,
            ))
        };

        Ok(Self {
            write_tx,
            cancel,
            _read_handle: read_handle,
            _write_handle: write_handle,
        })
    }

    /// Sends a heartbeat ping frame.
    ///
    /// Fails with [`ConnectionError::Closed`] when the link already went
    /// down; the caller treats that as a log-and-continue condition.
    pub(crate) async fn send_ping(&self) -> Result<(), ConnectionError> {
        self.write_tx
            .send(tungstenite::Message::Ping(PING_PAYLOAD.to_vec().into()))
            .await
            .map_err(|_| ConnectionError::Closed)
    }

    /// Closes the link and stops both pumps. Safe to call repeatedly.
    pub(crate) async fn close(&self) {
        self.cancel.cancel();
        let _ = self.write_tx.send(tungstenite::Message::Close(None)).await;
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        self.cancel.cancel();
        self._read_handle.abort();
        self._write_handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_display() {
        assert_eq!(
            ConnectionError::Timeout.to_string(),
            "connect attempt timed out"
        );
        assert_eq!(ConnectionError::Closed.to_string(), "connection closed");
    }

    #[tokio::test]
    async fn send_ping_after_pump_exit_fails_gracefully() {
        let (write_tx, write_rx) = mpsc::channel(4);
        drop(write_rx);

        let client = WsClient {
            write_tx,
            cancel: CancellationToken::new(),
            _read_handle: tokio::spawn(async {}),
            _write_handle: tokio::spawn(async {}),
        };

        assert!(matches!(
            client.send_ping().await,
            Err(ConnectionError::Closed)
        ));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (write_tx, _write_rx) = mpsc::channel(4);
        let client = WsClient {
            write_tx,
            cancel: CancellationToken::new(),
            _read_handle: tokio::spawn(async {}),
            _write_handle: tokio::spawn(async {}),
        };

        client.close().await;
        client.close().await;
        assert!(client.cancel.is_cancelled());
    }
}
