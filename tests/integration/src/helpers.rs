//! Scripted transport for driving the session manager
//!
//! Each shard gets a queue of steps; one step is consumed per connection
//! attempt. Once a shard's script is empty its connections stay open until
//! closed.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use botgate_core::{Intents, Token, WebsocketAp};
use botgate_gateway::{
    EventHandlers, GatewayError, Session, SessionManager, Transport, TransportFactory,
};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How a scripted `listening()` ends
#[derive(Debug, Clone)]
pub enum ListenOutcome {
    /// Orderly close
    Ok,
    Err(GatewayError),
    /// Stay connected until the close signal fires
    UntilClosed,
}

/// One scripted connection attempt
#[derive(Debug, Clone)]
pub enum Step {
    ConnectError,
    HandshakeError,
    /// Panic inside `connect()`
    Panic,
    Listen {
        /// Session id and sequence observed before the connection ends
        session: Option<(String, u64)>,
        outcome: ListenOutcome,
    },
}

impl Step {
    /// Establish a session, then end with `err`
    pub fn fail_after(session_id: &str, seq: u64, err: GatewayError) -> Self {
        Self::Listen {
            session: Some((session_id.to_string(), seq)),
            outcome: ListenOutcome::Err(err),
        }
    }

    pub fn fail(err: GatewayError) -> Self {
        Self::Listen {
            session: None,
            outcome: ListenOutcome::Err(err),
        }
    }

    pub fn close() -> Self {
        Self::Listen {
            session: None,
            outcome: ListenOutcome::Ok,
        }
    }

    pub fn stay_open() -> Self {
        Self::Listen {
            session: None,
            outcome: ListenOutcome::UntilClosed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeKind {
    Identify,
    Resume,
}

/// A handshake as the transport sent it
#[derive(Debug, Clone)]
pub struct Handshake {
    pub shard_id: u32,
    pub kind: HandshakeKind,
    pub session_id: String,
    pub seq: u64,
    pub intents: Intents,
}

#[derive(Debug, Default)]
struct RecorderState {
    launches: Vec<(u32, Instant)>,
    handshakes: Vec<Handshake>,
    live: usize,
    max_live: usize,
    closes: usize,
}

/// Everything the mock transports observed
#[derive(Debug, Default)]
pub struct Recorder {
    state: Mutex<RecorderState>,
}

impl Recorder {
    /// Shard id and instant of every transport created
    pub fn launches(&self) -> Vec<(u32, Instant)> {
        self.state.lock().launches.clone()
    }

    pub fn launch_count(&self) -> usize {
        self.state.lock().launches.len()
    }

    pub fn handshakes(&self) -> Vec<Handshake> {
        self.state.lock().handshakes.clone()
    }

    /// Transports currently alive
    pub fn live(&self) -> usize {
        self.state.lock().live
    }

    /// Highest number of transports alive at once
    pub fn max_live(&self) -> usize {
        self.state.lock().max_live
    }

    /// Connections ended by the close signal
    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }

    fn created(&self, shard_id: u32) {
        let mut state = self.state.lock();
        state.launches.push((shard_id, Instant::now()));
        state.live += 1;
        state.max_live = state.max_live.max(state.live);
    }

    fn dropped(&self) {
        self.state.lock().live -= 1;
    }
}

/// `TransportFactory` that hands out scripted transports
#[derive(Default)]
pub struct MockTransportFactory {
    scripts: Mutex<HashMap<u32, VecDeque<Step>>>,
    connect_delay: Duration,
    recorder: Arc<Recorder>,
}

impl MockTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue steps for one shard
    pub fn script(self, shard_id: u32, steps: impl IntoIterator<Item = Step>) -> Self {
        self.scripts
            .lock()
            .entry(shard_id)
            .or_default()
            .extend(steps);
        self
    }

    /// Make every `connect()` take this long
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn recorder(&self) -> Arc<Recorder> {
        Arc::clone(&self.recorder)
    }
}

impl TransportFactory for MockTransportFactory {
    fn create(&self, session: Session) -> Box<dyn Transport> {
        let shard_id = session.shards.shard_id;
        let step = self
            .scripts
            .lock()
            .get_mut(&shard_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(Step::stay_open);

        self.recorder.created(shard_id);

        Box::new(MockTransport {
            session,
            step,
            connect_delay: self.connect_delay,
            close: CancellationToken::new(),
            recorder: Arc::clone(&self.recorder),
        })
    }
}

struct MockTransport {
    session: Session,
    step: Step,
    connect_delay: Duration,
    close: CancellationToken,
    recorder: Arc<Recorder>,
}

impl MockTransport {
    fn record_handshake(&self, kind: HandshakeKind) -> Result<(), GatewayError> {
        self.recorder.state.lock().handshakes.push(Handshake {
            shard_id: self.session.shards.shard_id,
            kind,
            session_id: self.session.id.clone(),
            seq: self.session.last_seq,
            intents: self.session.identify_payload().intents,
        });

        match self.step {
            Step::HandshakeError => Err(GatewayError::Handshake("scripted".to_string())),
            _ => Ok(()),
        }
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.recorder.dropped();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self) -> Result<(), GatewayError> {
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        match self.step {
            Step::ConnectError => Err(GatewayError::Connect("scripted".to_string())),
            Step::Panic => panic!("scripted panic"),
            _ => Ok(()),
        }
    }

    async fn identify(&mut self) -> Result<(), GatewayError> {
        self.record_handshake(HandshakeKind::Identify)
    }

    async fn resume(&mut self) -> Result<(), GatewayError> {
        self.record_handshake(HandshakeKind::Resume)
    }

    async fn listening(&mut self) -> Result<(), GatewayError> {
        let Step::Listen { session, outcome } = self.step.clone() else {
            return Ok(());
        };

        if let Some((id, seq)) = session {
            self.session.establish(id);
            self.session.record_seq(seq);
        }

        match outcome {
            ListenOutcome::Ok => Ok(()),
            ListenOutcome::Err(err) => Err(err),
            ListenOutcome::UntilClosed => {
                self.close.cancelled().await;
                self.recorder.state.lock().closes += 1;
                Ok(())
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

/// A manager running in the background
pub struct RunningManager {
    pub manager: Arc<SessionManager>,
    pub ctx: CancellationToken,
    pub handle: JoinHandle<Result<(), GatewayError>>,
}

impl RunningManager {
    /// Cancel the context and wait for `start` to return
    pub async fn shutdown(self) -> Result<(), GatewayError> {
        self.ctx.cancel();
        self.handle.await.unwrap()
    }
}

/// Spawn `start` for `manager`
pub fn spawn_manager(
    manager: SessionManager,
    ap: WebsocketAp,
    token: Token,
    handlers: Arc<EventHandlers>,
) -> RunningManager {
    let manager = Arc::new(manager);
    let ctx = CancellationToken::new();

    let handle = {
        let manager = Arc::clone(&manager);
        let ctx = ctx.clone();
        tokio::spawn(async move { manager.start(ctx, &ap, &token, handlers).await })
    };

    RunningManager {
        manager,
        ctx,
        handle,
    }
}

/// Let spawned tasks settle without moving the clock far
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
