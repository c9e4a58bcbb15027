//! Persistent WebSocket connection to the game server
//!
//! A reader task decodes inbound frames and queues them; a writer task
//! drains outbound frames. The render thread drains the inbound queue between
//! frames with [`Connection::pump`], so the world is only ever mutated there.

use crate::game::WorldState;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use log::{debug, info, warn};
use shared::{ClientMessage, JoinRequest, ProtocolError, ServerMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};

pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("handshake with {endpoint} failed: {source}")]
    Handshake {
        endpoint: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("handshake with {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },
    #[error("failed to send join message: {0}")]
    Join(#[from] tungstenite::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    Message(ServerMessage),
    Closed,
}

pub struct Connection {
    endpoint: String,
    open: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<Message>,
    inbound: mpsc::UnboundedReceiver<NetworkEvent>,
    reader: JoinHandle<()>,
}

impl Connection {
    /// Opens the connection and announces the chosen character.
    ///
    /// Must be called from within a tokio runtime; the I/O tasks are spawned on it.
    pub async fn connect(endpoint: &str, join: JoinRequest) -> Result<Self, ConnectionError> {
        info!("Connecting to {}", endpoint);

        let (socket, _response) = tokio::time::timeout(HANDSHAKE_TIMEOUT, connect_async(endpoint))
            .await
            .map_err(|_| ConnectionError::Timeout {
                endpoint: endpoint.to_string(),
                timeout: HANDSHAKE_TIMEOUT,
            })?
            .map_err(|source| ConnectionError::Handshake {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let (mut sink, stream) = socket.split();

        let hello = ClientMessage::UserJoins(join).to_json()?;
        sink.send(Message::Text(hello)).await?;

        info!("Connected to {}", endpoint);

        let open = Arc::new(AtomicBool::new(true));
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let reader = tokio::spawn(read_frames(stream, inbound_tx, Arc::clone(&open)));
        tokio::spawn(write_frames(sink, outbound_rx, Arc::clone(&open)));

        Ok(Connection {
            endpoint: endpoint.to_string(),
            open,
            outbound: outbound_tx,
            inbound: inbound_rx,
            reader,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Queues a message if the connection is open. Otherwise it is dropped.
    pub fn send(&self, message: &ClientMessage) {
        if !self.is_open() {
            return;
        }

        match message.to_json() {
            Ok(text) => {
                let _ = self.outbound.send(Message::Text(text));
            }
            Err(e) => warn!("Failed to encode {:?}: {}", message, e),
        }
    }

    pub fn try_next_event(&mut self) -> Option<NetworkEvent> {
        self.inbound.try_recv().ok()
    }

    pub async fn next_event(&mut self) -> Option<NetworkEvent> {
        self.inbound.recv().await
    }

    /// Applies all queued inbound events to `world`. Returns how many
    /// broadcasts were applied.
    pub fn pump(&mut self, world: &mut WorldState) -> usize {
        let mut applied = 0;

        while let Some(event) = self.try_next_event() {
            match event {
                NetworkEvent::Message(ServerMessage::Broadcast { players }) => {
                    world.apply_broadcast(players);
                    applied += 1;
                }
                NetworkEvent::Message(ServerMessage::Unknown) => {
                    debug!("Ignoring message with unrecognized type");
                }
                NetworkEvent::Closed => {
                    warn!("Connection to {} lost", self.endpoint);
                }
            }
        }

        applied
    }

    /// Sends a close frame and stops accepting outbound messages.
    pub fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            info!("Disconnecting from {}", self.endpoint);
            let _ = self.outbound.send(Message::Close(None));
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
        self.reader.abort();
    }
}

async fn read_frames<S>(
    mut stream: S,
    inbound: mpsc::UnboundedSender<NetworkEvent>,
    open: Arc<AtomicBool>,
) where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    debug!("Discarding non UTF-8 binary frame");
                    continue;
                }
            },
            Ok(Message::Close(frame)) => {
                info!("Server closed the connection: {:?}", frame);
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!("Error receiving frame: {}", e);
                break;
            }
        };

        match ServerMessage::from_json(&text) {
            Ok(message) => {
                if inbound.send(NetworkEvent::Message(message)).is_err() {
                    break;
                }
            }
            Err(e) => debug!("Discarding frame: {}", e),
        }
    }

    open.store(false, Ordering::SeqCst);
    let _ = inbound.send(NetworkEvent::Closed);
}

async fn write_frames<S>(
    mut sink: S,
    mut outbound: mpsc::UnboundedReceiver<Message>,
    open: Arc<AtomicBool>,
) where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    while let Some(message) = outbound.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(e) = sink.send(message).await {
            warn!("Error sending frame: {}", e);
            open.store(false, Ordering::SeqCst);
            break;
        }
        if closing {
            break;
        }
    }

    let _ = sink.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn test_reader_skips_malformed_and_reports_close() {
        let frames = vec![
            Ok(Message::Text("garbage".to_string())),
            Ok(Message::Text(r#"{"type":"chat"}"#.to_string())),
            Ok(Message::Ping(vec![1])),
            Ok(Message::Text(r#"{"type":"broadcast","players":[]}"#.to_string())),
            Ok(Message::Close(None)),
            Ok(Message::Text(r#"{"type":"broadcast","players":[]}"#.to_string())),
        ];
        let (tx, mut rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(true));

        read_frames(stream::iter(frames), tx, Arc::clone(&open)).await;

        assert_eq!(
            rx.recv().await,
            Some(NetworkEvent::Message(ServerMessage::Unknown))
        );
        assert_eq!(
            rx.recv().await,
            Some(NetworkEvent::Message(ServerMessage::Broadcast { players: vec![] }))
        );
        assert_eq!(rx.recv().await, Some(NetworkEvent::Closed));
        assert_eq!(rx.recv().await, None);
        assert!(!open.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_reader_accepts_utf8_binary_frames() {
        let frames = vec![Ok(Message::Binary(
            br#"{"type":"broadcast","players":null}"#.to_vec(),
        ))];
        let (tx, mut rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(true));

        read_frames(stream::iter(frames), tx, open).await;

        assert_eq!(
            rx.recv().await,
            Some(NetworkEvent::Message(ServerMessage::Broadcast { players: vec![] }))
        );
        assert_eq!(rx.recv().await, Some(NetworkEvent::Closed));
    }

    fn detached(open: bool) -> (Connection, mpsc::UnboundedReceiver<Message>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (_inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let connection = Connection {
            endpoint: "ws://test/".to_string(),
            open: Arc::new(AtomicBool::new(open)),
            outbound: outbound_tx,
            inbound: inbound_rx,
            reader: tokio::spawn(async {}),
        };
        (connection, outbound_rx)
    }

    #[tokio::test]
    async fn test_send_queues_while_open() {
        let (connection, mut outbound) = detached(true);
        connection.send(&ClientMessage::KeyDown(shared::Direction::Up));

        match outbound.try_recv() {
            Ok(Message::Text(text)) => assert_eq!(
                ClientMessage::from_json(&text).unwrap(),
                ClientMessage::KeyDown(shared::Direction::Up)
            ),
            other => panic!("expected queued key-down, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_after_close_is_dropped() {
        let (connection, mut outbound) = detached(true);
        connection.close();
        connection.send(&ClientMessage::KeyDown(shared::Direction::Left));

        assert!(matches!(outbound.try_recv(), Ok(Message::Close(None))));
        assert!(outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_on_lost_connection_is_dropped() {
        let (connection, mut outbound) = detached(false);
        connection.send(&ClientMessage::KeyDown(shared::Direction::Down));

        assert!(!connection.is_open());
        assert!(outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_endpoint_fails() {
        let result = Connection::connect(
            "ws://127.0.0.1:1/ws/rogue/",
            JoinRequest {
                sprite: shared::WARRIOR.to_string(),
                username: None,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(ConnectionError::Handshake { .. }) | Err(ConnectionError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_endpoint() {
        let result = Connection::connect(
            "not a url",
            JoinRequest {
                sprite: shared::WARRIOR.to_string(),
                username: None,
            },
        )
        .await;

        assert!(matches!(result, Err(ConnectionError::Handshake { .. })));
    }
}
