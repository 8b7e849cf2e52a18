//! Connection manager: owns the WebSocket link and the heartbeat loop.
//!
//! A single run-loop task performs the initial dial, then multiplexes
//! the heartbeat timer, link events from the pumps, and shutdown. Every
//! state transition happens on that task, so delivery is serialized:
//! connection events, timer ticks, and decoded notices never race.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, mpsc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use traybell_protocol::constants::CONNECT_TIMEOUT;
use traybell_protocol::decode_notice;

use crate::endpoint::Endpoint;
use crate::heartbeat::{HeartbeatAction, heartbeat_action};
use crate::types::{ConnectionEvent, ConnectionState, HeartbeatConfig};
use crate::ws_client::{LinkEvent, LinkEventKind, WsClient};

/// Connection manager for the notice service link.
///
/// Dials once on [`start`](Self::start); after that the heartbeat timer
/// is the sole reconnection mechanism, at fixed cadence.
pub struct ConnectionManager {
    endpoint: Endpoint,
    config: HeartbeatConfig,
    state: Arc<RwLock<ConnectionState>>,
    events_tx: mpsc::Sender<ConnectionEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<ConnectionEvent>>>,
    cancel: CancellationToken,
    run_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl ConnectionManager {
    /// Creates a manager for the given endpoint. Nothing is dialed
    /// until [`start`](Self::start).
    pub fn new(endpoint: Endpoint, config: HeartbeatConfig) -> Self {
        let (events_tx, events_rx) = mpsc::channel(64);
        Self {
            endpoint,
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            cancel: CancellationToken::new(),
            run_handle: Mutex::new(None),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub async fn take_events(&self) -> Option<mpsc::Receiver<ConnectionEvent>> {
        self.events_rx.lock().await.take()
    }

    /// Current link state.
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Spawns the run loop: initial dial plus heartbeat-driven redials.
    /// A second call is a no-op.
    pub async fn start(&self) {
        let mut handle = self.run_handle.lock().await;
        if handle.is_some() {
            return;
        }
        let runner = RunLoop {
            endpoint: self.endpoint.clone(),
            config: self.config,
            state: self.state.clone(),
            events_tx: self.events_tx.clone(),
            cancel: self.cancel.clone(),
        };
        *handle = Some(tokio::spawn(runner.run()));
    }

    /// Stops the heartbeat, closes the link, and releases the run loop.
    /// Safe to call when already shut down.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.run_handle.lock().await.take() {
            let _ = handle.await;
        }
        info!("connection manager shut down");
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// State shared between the manager facade and its run-loop task.
struct RunLoop {
    endpoint: Endpoint,
    config: HeartbeatConfig,
    state: Arc<RwLock<ConnectionState>>,
    events_tx: mpsc::Sender<ConnectionEvent>,
    cancel: CancellationToken,
}

/// Link-local bookkeeping owned by the run loop.
struct Link {
    client: Option<WsClient>,
    /// Bumped on every dial; stale pump events are filtered against it.
    generation: u64,
    /// Seeded at connect time, refreshed on pong while Connected.
    last_pong: Instant,
}

impl RunLoop {
    async fn run(self) {
        let (link_tx, mut link_rx) = mpsc::channel::<LinkEvent>(64);
        let mut link = Link {
            client: None,
            generation: 0,
            last_pong: Instant::now(),
        };

        // Dial immediately; every retry after this is heartbeat-driven.
        self.reconnect(&mut link, &link_tx).await;

        let mut ticker = tokio::time::interval(self.config.ping_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await; // Skip immediate first tick.

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,

                _ = ticker.tick() => self.on_heartbeat(&mut link, &link_tx).await,

                ev = link_rx.recv() => {
                    // We hold a sender, so recv only yields Some.
                    if let Some(ev) = ev {
                        self.on_link_event(&mut link, ev).await;
                    }
                }
            }
        }

        if let Some(client) = link.client.take() {
            client.close().await;
        }
        self.set_state(ConnectionState::Disconnected).await;
    }

    /// One heartbeat tick: ping a live link, redial a dead one.
    async fn on_heartbeat(&self, link: &mut Link, link_tx: &mpsc::Sender<LinkEvent>) {
        let state = *self.state.read().await;
        let action = heartbeat_action(
            state,
            link.last_pong,
            Instant::now(),
            self.config.liveness_window,
        );

        match action {
            HeartbeatAction::Ping => {
                if let Some(client) = &link.client {
                    // A ping racing a disconnect loses gracefully.
                    if let Err(e) = client.send_ping().await {
                        warn!("ping send failed: {e}");
                    }
                }
            }
            HeartbeatAction::Reconnect => {
                debug!("heartbeat: link not live, redialing");
                self.reconnect(link, link_tx).await;
            }
        }
    }

    /// Tears down any existing link and dials the endpoint once.
    ///
    /// Dial failures are logged, never surfaced: the next heartbeat
    /// tick retries at the same cadence.
    async fn reconnect(&self, link: &mut Link, link_tx: &mpsc::Sender<LinkEvent>) {
        if let Some(old) = link.client.take() {
            old.close().await;
        }
        link.generation += 1;

        self.set_state(ConnectionState::Connecting).await;
        debug!(url = %self.endpoint.url(), generation = link.generation, "dialing");

        let attempt = WsClient::connect(&self.endpoint, link.generation, link_tx.clone());
        match tokio::time::timeout(CONNECT_TIMEOUT, attempt).await {
            Ok(Ok(client)) => {
                link.client = Some(client);
                link.last_pong = Instant::now();
                self.set_state(ConnectionState::Connected).await;
                info!("connected to notice service");
            }
            Ok(Err(e)) => {
                warn!("connect failed: {e}");
                self.set_state(ConnectionState::Disconnected).await;
            }
            Err(_) => {
                warn!("connect timed out after {CONNECT_TIMEOUT:?}");
                self.set_state(ConnectionState::Disconnected).await;
            }
        }
    }

    /// Handles one event from the active link's pumps.
    async fn on_link_event(&self, link: &mut Link, ev: LinkEvent) {
        if ev.generation != link.generation {
            // Late event from a link that was already replaced.
            debug!(generation = ev.generation, "dropping stale link event");
            return;
        }

        match ev.kind {
            LinkEventKind::Text(text) => {
                if let Some(notice) = decode_notice(&text) {
                    let _ = self.events_tx.send(ConnectionEvent::Notice(notice)).await;
                }
            }
            LinkEventKind::Pong => {
                if *self.state.read().await == ConnectionState::Connected {
                    link.last_pong = Instant::now();
                }
            }
            LinkEventKind::Closed => {
                debug!("link closed");
                link.client = None;
                // The next heartbeat tick redials; never here.
                self.set_state(ConnectionState::Disconnected).await;
            }
        }
    }

    /// Updates the state and emits an event on actual transitions.
    async fn set_state(&self, new_state: ConnectionState) {
        {
            let mut state = self.state.write().await;
            if *state == new_state {
                return;
            }
            *state = new_state;
        }
        let _ = self
            .events_tx
            .send(ConnectionEvent::StateChanged(new_state))
            .await;
    }
}
