//! WebSocket read pump — forwards inbound frames to the manager loop.

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use traybell_protocol::constants::WS_MAX_MESSAGE_SIZE;

use crate::ws_client::{LinkEvent, LinkEventKind};

/// Reads frames from the WebSocket and forwards them as [`LinkEvent`]s.
///
/// Liveness is judged by the manager's heartbeat timer, not here: the
/// pump only reports what arrives. On close frame, read error, or
/// stream end it emits a final `Closed` event and exits. A cancelled
/// teardown exits silently — the manager already knows.
pub(crate) async fn read_pump<S>(
    mut read: S,
    generation: u64,
    events_tx: mpsc::Sender<LinkEvent>,
    write_tx: mpsc::Sender<tungstenite::Message>,
    cancel: CancellationToken,
) where
    S: StreamExt<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,

            msg = read.next() => {
                match msg {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        if text.len() > WS_MAX_MESSAGE_SIZE {
                            warn!("text frame too large ({} bytes), dropping", text.len());
                            continue;
                        }
                        forward(&events_tx, generation, LinkEventKind::Text(text.to_string())).await;
                    }
                    Some(Ok(tungstenite::Message::Ping(data))) => {
                        trace!("received ping, sending pong");
                        let _ = write_tx.send(tungstenite::Message::Pong(data)).await;
                    }
                    Some(Ok(tungstenite::Message::Pong(payload))) => {
                        trace!(len = payload.len(), "received pong");
                        forward(&events_tx, generation, LinkEventKind::Pong).await;
                    }
                    Some(Ok(tungstenite::Message::Close(_))) => {
                        debug!("received close frame");
                        break;
                    }
                    Some(Ok(_)) => {} // Binary and raw frames — ignore
                    Some(Err(e)) => {
                        warn!("WebSocket read error: {e}");
                        break;
                    }
                    None => {
                        debug!("WebSocket stream ended");
                        break;
                    }
                }
            }
        }
    }

    forward(&events_tx, generation, LinkEventKind::Closed).await;
}

async fn forward(events_tx: &mpsc::Sender<LinkEvent>, generation: u64, kind: LinkEventKind) {
    let _ = events_tx.send(LinkEvent { generation, kind }).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn forwards_text_and_pong_then_closed() {
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let (write_tx, _write_rx) = mpsc::channel(16);
        let frames = vec![
            Ok(tungstenite::Message::Text(
                r#"{"noticeData":{"message":"hi"}}"#.to_string().into(),
            )),
            Ok(tungstenite::Message::Pong(vec![].into())),
        ];

        read_pump(
            stream::iter(frames),
            7,
            events_tx,
            write_tx,
            CancellationToken::new(),
        )
        .await;

        let ev = events_rx.recv().await.unwrap();
        assert_eq!(ev.generation, 7);
        assert!(matches!(ev.kind, LinkEventKind::Text(t) if t.contains("hi")));
        assert!(matches!(
            events_rx.recv().await.unwrap().kind,
            LinkEventKind::Pong
        ));
        assert!(matches!(
            events_rx.recv().await.unwrap().kind,
            LinkEventKind::Closed
        ));
    }

    #[tokio::test]
    async fn replies_to_server_ping() {
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let (write_tx, mut write_rx) = mpsc::channel(16);
        let frames = vec![Ok(tungstenite::Message::Ping(b"x".to_vec().into()))];

        read_pump(
            stream::iter(frames),
            0,
            events_tx,
            write_tx,
            CancellationToken::new(),
        )
        .await;

        assert!(matches!(
            write_rx.recv().await,
            Some(tungstenite::Message::Pong(_))
        ));
        // A server ping is not a pong: no liveness credit for it.
        assert!(matches!(
            events_rx.recv().await.unwrap().kind,
            LinkEventKind::Closed
        ));
    }

    #[tokio::test]
    async fn oversized_text_is_dropped() {
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let (write_tx, _write_rx) = mpsc::channel(16);
        let huge = "x".repeat(WS_MAX_MESSAGE_SIZE + 1);
        let frames = vec![Ok(tungstenite::Message::Text(huge.into()))];

        read_pump(
            stream::iter(frames),
            0,
            events_tx,
            write_tx,
            CancellationToken::new(),
        )
        .await;

        assert!(matches!(
            events_rx.recv().await.unwrap().kind,
            LinkEventKind::Closed
        ));
    }

    #[tokio::test]
    async fn closed_event_fires_on_read_error() {
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let (write_tx, _write_rx) = mpsc::channel(16);
        let frames: Vec<Result<tungstenite::Message, tungstenite::Error>> =
            vec![Err(tungstenite::Error::ConnectionClosed)];

        read_pump(
            stream::iter(frames),
            0,
            events_tx,
            write_tx,
            CancellationToken::new(),
        )
        .await;

        assert!(matches!(
            events_rx.recv().await.unwrap().kind,
            LinkEventKind::Closed
        ));
    }

    #[tokio::test]
    async fn cancelled_teardown_emits_nothing() {
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let (write_tx, _write_rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        cancel.cancel();

        read_pump(
            stream::pending::<Result<tungstenite::Message, tungstenite::Error>>(),
            0,
            events_tx,
            write_tx,
            cancel,
        )
        .await;

        assert!(events_rx.try_recv().is_err());
    }
}
