//! WebSocket transport
//!
//! One tokio-tungstenite connection per shard: reads Hello, sends the
//! handshake, keeps the heartbeat going and feeds every frame to the dispatch
//! table.

use std::time::Duration;

use async_trait::async_trait;
use botgate_core::EventType;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use super::{GatewayError, Session, Transport, TransportFactory};
use crate::events::dispatch;
use crate::protocol::{HelloPayload, OpCode, ReadyData, WsPayload};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for Hello after the socket opens
const HELLO_TIMEOUT: Duration = Duration::from_secs(10);

/// Close code reported when the server closes without a status
const NO_STATUS_CODE: u16 = 1005;

/// Gateway connection over tokio-tungstenite
pub struct WebSocketConnection {
    session: Session,
    stream: Option<WsStream>,
    heartbeat_interval: Duration,
    close: CancellationToken,
}

impl WebSocketConnection {
    /// Create an unconnected transport for a session
    pub fn new(session: Session) -> Self {
        Self {
            session,
            stream: None,
            heartbeat_interval: Duration::from_millis(HelloPayload::DEFAULT_HEARTBEAT_INTERVAL),
            close: CancellationToken::new(),
        }
    }

    async fn send(&mut self, frame: &WsPayload) -> Result<(), GatewayError> {
        let json = frame.to_json()?;
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| GatewayError::Protocol("not connected".to_string()))?;
        stream.send(Message::Text(json)).await?;
        Ok(())
    }

    async fn read_hello(stream: &mut WsStream) -> Result<HelloPayload, GatewayError> {
        loop {
            let bytes = match stream.next().await {
                Some(Ok(Message::Text(text))) => text.into_bytes(),
                Some(Ok(Message::Binary(bytes))) => bytes,
                Some(Ok(Message::Close(_))) | None => return Err(GatewayError::ConnectionLost),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            };

            let frame = WsPayload::from_bytes(&bytes)?;
            if frame.op != OpCode::Hello {
                return Err(GatewayError::Protocol(format!(
                    "expected Hello, got {}",
                    frame.op
                )));
            }
            let hello = match frame.d {
                Some(d) => serde_json::from_value(d)?,
                None => HelloPayload::default(),
            };
            return Ok(hello);
        }
    }

    /// Apply one inbound frame to the session and hand it to the dispatch table
    ///
    /// Returns an error only when the server asks for the connection to end.
    fn handle_frame(&mut self, bytes: &[u8]) -> Result<(), GatewayError> {
        let payload = match WsPayload::from_bytes(bytes) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    shard_id = self.session.shards.shard_id,
                    error = %e,
                    "Dropping unparsable frame"
                );
                return Ok(());
            }
        };

        if let Some(seq) = payload.s {
            self.session.record_seq(seq);
        }

        tracing::trace!(
            shard_id = self.session.shards.shard_id,
            op = %payload.op,
            event_type = ?payload.t,
            seq = ?payload.s,
            "Frame received"
        );

        match payload.op {
            OpCode::Reconnect => return Err(GatewayError::NeedReconnect),
            OpCode::InvalidSession => return Err(GatewayError::InvalidSession),
            OpCode::HeartbeatAck => {
                tracing::trace!(shard_id = self.session.shards.shard_id, "Heartbeat acknowledged");
            }
            OpCode::Dispatch => match payload.event_type() {
                Some(EventType::Ready) => self.on_ready(&payload),
                Some(EventType::Resumed) => tracing::info!(
                    shard_id = self.session.shards.shard_id,
                    session_id = %self.session.id,
                    seq = self.session.last_seq,
                    "Session resumed"
                ),
                _ => {}
            },
            _ => {}
        }

        // Every frame other than reconnect/invalid-session goes to the table
        if let Err(err) = dispatch(&self.session.handlers, &payload) {
            tracing::warn!(
                shard_id = self.session.shards.shard_id,
                op = %payload.op,
                event_type = err.event_type(),
                error = %err,
                "Failed to dispatch event"
            );
        }
        Ok(())
    }

    fn on_ready(&mut self, payload: &WsPayload) {
        let ready = payload
            .d
            .clone()
            .map(serde_json::from_value::<ReadyData>)
            .transpose();

        match ready {
            Ok(Some(ready)) => {
                self.session.establish(ready.session_id);
                tracing::info!(
                    shard_id = self.session.shards.shard_id,
                    shard_count = self.session.shards.shard_count,
                    session_id = %self.session.id,
                    user = ready.user.display_name(),
                    "Shard ready"
                );
            }
            Ok(None) => tracing::warn!(
                shard_id = self.session.shards.shard_id,
                "READY without data"
            ),
            Err(e) => tracing::warn!(
                shard_id = self.session.shards.shard_id,
                error = %e,
                "Malformed READY"
            ),
        }
    }
}

#[async_trait]
impl Transport for WebSocketConnection {
    async fn connect(&mut self) -> Result<(), GatewayError> {
        let (mut stream, _) = connect_async(self.session.url.as_str())
            .await
            .map_err(|e| GatewayError::Connect(e.to_string()))?;

        let hello = tokio::time::timeout(HELLO_TIMEOUT, Self::read_hello(&mut stream))
            .await
            .map_err(|_| GatewayError::Connect("timed out waiting for Hello".to_string()))??;

        self.heartbeat_interval = Duration::from_millis(hello.heartbeat_interval.max(1));
        self.stream = Some(stream);

        tracing::debug!(
            shard_id = self.session.shards.shard_id,
            heartbeat_interval_ms = hello.heartbeat_interval,
            "Connected to gateway"
        );
        Ok(())
    }

    async fn identify(&mut self) -> Result<(), GatewayError> {
        let payload = self.session.identify_payload();
        let frame = WsPayload::identify(&payload)?;
        self.send(&frame)
            .await
            .map_err(|e| GatewayError::Handshake(e.to_string()))?;

        tracing::info!(
            shard_id = self.session.shards.shard_id,
            shard_count = self.session.shards.shard_count,
            intents = %payload.intents,
            "Identify sent"
        );
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), GatewayError> {
        let frame = WsPayload::resume(&self.session.resume_payload())?;
        self.send(&frame)
            .await
            .map_err(|e| GatewayError::Handshake(e.to_string()))?;

        tracing::info!(
            shard_id = self.session.shards.shard_id,
            session_id = %self.session.id,
            seq = self.session.last_seq,
            "Resume sent"
        );
        Ok(())
    }

    async fn listening(&mut self) -> Result<(), GatewayError> {
        let stream = self
            .stream
            .take()
            .ok_or_else(|| GatewayError::Protocol("not connected".to_string()))?;
        let (mut sink, mut source) = stream.split();

        let period = self.heartbeat_interval;
        let mut heartbeat = interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let close = self.close.clone();

        loop {
            tokio::select! {
                () = close.cancelled() => {
                    if let Err(e) = sink.send(Message::Close(None)).await {
                        tracing::debug!(error = %e, "Close frame not sent");
                    }
                    tracing::info!(
                        shard_id = self.session.shards.shard_id,
                        "Connection closed locally"
                    );
                    return Ok(());
                }
                _ = heartbeat.tick() => {
                    let frame = WsPayload::heartbeat(self.session.last_seq);
                    sink.send(Message::Text(frame.to_json()?)).await?;
                    tracing::debug!(
                        shard_id = self.session.shards.shard_id,
                        seq = self.session.last_seq,
                        "Heartbeat sent"
                    );
                }
                msg = source.next() => match msg {
                    Some(Ok(Message::Text(text))) => self.handle_frame(text.as_bytes())?,
                    Some(Ok(Message::Binary(bytes))) => self.handle_frame(&bytes)?,
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame.map_or((NO_STATUS_CODE, String::new()), |f| {
                            (u16::from(f.code), f.reason.into_owned())
                        });
                        return Err(GatewayError::Closed { code, reason });
                    }
                    // Ping/pong is answered by tungstenite
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Err(GatewayError::ConnectionLost),
                }
            }
        }
    }

    fn session(&self) -> Session {
        self.session.clone()
    }

    fn close_signal(&self) -> CancellationToken {
        self.close.clone()
    }
}

/// Creates a [`WebSocketConnection`] per connection attempt
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnectionFactory;

impl TransportFactory for WebSocketConnectionFactory {
    fn create(&self, session: Session) -> Box<dyn Transport> {
        Box::new(WebSocketConnection::new(session))
    }
}
