//! Shard session manager
//!
//! Launches one connection task per shard from a bounded queue. A task that
//! ends recoverably puts its session back on the same queue, so reconnects go
//! through the single launch loop instead of recursing.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use botgate_core::{ShardConfig, Token, WebsocketAp};
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{GatewayError, PanicHandler, Session, Transport, TransportFactory};
use crate::events::EventHandlers;

/// Session-start quota window, in seconds
const CONCURRENCY_WINDOW_SECS: u64 = 2;

/// Stop flag shared by the manager and its connection tasks
#[derive(Debug, Default)]
struct StopSignal {
    stopped: AtomicBool,
    token: CancellationToken,
}

impl StopSignal {
    /// Cancel once; returns false if already stopped
    fn trigger(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.token.cancel();
        true
    }
}

/// Everything a connection task needs from its manager
#[derive(Clone)]
struct TaskContext {
    factory: Arc<dyn TransportFactory>,
    panic_handler: PanicHandler,
    stop: Arc<StopSignal>,
    fatal: Arc<Mutex<Option<GatewayError>>>,
    queue: mpsc::Sender<Session>,
    ctx: CancellationToken,
}

/// Runs every shard of one bot
///
/// Single use: once stopped, `start` returns immediately.
pub struct SessionManager {
    factory: Arc<dyn TransportFactory>,
    panic_handler: PanicHandler,
    stop: Arc<StopSignal>,
    fatal: Arc<Mutex<Option<GatewayError>>>,
}

impl SessionManager {
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self {
            factory,
            panic_handler: Arc::new(|message: &str, session: &Session| {
                tracing::error!(
                    shard_id = session.shards.shard_id,
                    session_id = %session.id,
                    seq = session.last_seq,
                    panic = message,
                    "Connection task panicked"
                );
            }),
            stop: Arc::new(StopSignal::default()),
            fatal: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the diagnostic hook called when a connection task panics
    #[must_use]
    pub fn with_panic_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &Session) + Send + Sync + 'static,
    {
        self.panic_handler = Arc::new(handler);
        self
    }

    /// Fail if the remaining session starts cannot cover every shard
    pub fn check_session_limit(ap: &WebsocketAp) -> Result<(), GatewayError> {
        if ap.fits_quota() {
            Ok(())
        } else {
            Err(GatewayError::SessionLimit {
                shards: ap.shards,
                remaining: ap.session_start_limit.remaining,
            })
        }
    }

    /// Spacing between launches for a given `max_concurrency`
    ///
    /// The quota window divided by the concurrency, rounded, never below one
    /// second.
    pub fn calc_interval(max_concurrency: u32) -> Duration {
        let concurrency = u64::from(max_concurrency.max(1));
        let secs = (2 * CONCURRENCY_WINDOW_SECS + concurrency) / (2 * concurrency);
        Duration::from_secs(secs.max(1))
    }

    /// Run every shard until `ctx` is cancelled or the manager is stopped
    ///
    /// Returns the fatal error if a shard's credential was rejected for good.
    pub async fn start(
        &self,
        ctx: CancellationToken,
        ap: &WebsocketAp,
        token: &Token,
        handlers: Arc<EventHandlers>,
    ) -> Result<(), GatewayError> {
        Self::check_session_limit(ap)?;
        if ap.shards == 0 {
            return Err(GatewayError::InvalidAccessPoint(
                "shard count is zero".to_string(),
            ));
        }

        let interval = Self::calc_interval(ap.session_start_limit.max_concurrency);
        let (queue, mut pending) = mpsc::channel::<Session>(ap.shards as usize);

        for shard_id in 0..ap.shards {
            let session = Session::new(
                ap.url.as_str(),
                token.clone(),
                ShardConfig::new(shard_id, ap.shards),
                Arc::clone(&handlers),
            );
            queue
                .try_send(session)
                .map_err(|_| GatewayError::QueueClosed)?;
        }

        tracing::info!(
            shard_count = ap.shards,
            max_concurrency = ap.session_start_limit.max_concurrency,
            interval_secs = interval.as_secs(),
            intents = %handlers.intents(),
            "Session manager started"
        );

        let task = TaskContext {
            factory: Arc::clone(&self.factory),
            panic_handler: Arc::clone(&self.panic_handler),
            stop: Arc::clone(&self.stop),
            fatal: Arc::clone(&self.fatal),
            queue,
            ctx: ctx.clone(),
        };

        loop {
            let session = tokio::select! {
                biased;
                () = ctx.cancelled() => return self.cancelled(),
                () = self.stop.token.cancelled() => return self.finish(),
                next = pending.recv() => next.ok_or(GatewayError::QueueClosed)?,
            };

            tokio::select! {
                biased;
                () = ctx.cancelled() => return self.cancelled(),
                () = self.stop.token.cancelled() => return self.finish(),
                () = tokio::time::sleep(interval) => {}
            }

            launch(task.clone(), session);
        }
    }

    /// Signal every connection to close; safe to call any number of times
    pub fn stop(&self) {
        if self.stop.trigger() {
            tracing::info!("Session manager stopping");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.stopped.load(Ordering::Acquire)
    }

    fn cancelled(&self) -> Result<(), GatewayError> {
        self.stop();
        self.finish()
    }

    fn finish(&self) -> Result<(), GatewayError> {
        match self.fatal.lock().take() {
            Some(err) => Err(err),
            None => {
                tracing::info!("Session manager stopped");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}

/// Spawn one connection task with panic containment
fn launch(task: TaskContext, session: Session) {
    tracing::info!(
        shard_id = session.shards.shard_id,
        shard_count = session.shards.shard_count,
        resumable = session.is_resumable(),
        "Launching shard"
    );

    tokio::spawn(async move {
        let snapshot = session.clone();
        let outcome = AssertUnwindSafe(run_connection(&task, session))
            .catch_unwind()
            .await;

        let requeue = match outcome {
            Ok(next) => next,
            Err(panic) => {
                let message = panic_message(&panic);
                (task.panic_handler)(&message, &snapshot);
                Some(snapshot)
            }
        };

        if let Some(session) = requeue {
            let shard_id = session.shards.shard_id;
            if task.queue.send(session).await.is_err() {
                tracing::debug!(shard_id, "Manager gone, session not requeued");
            }
        }
    });
}

/// Drive one connection to its end
///
/// Returns the session to requeue, if any. The transport is dropped before
/// returning.
async fn run_connection(task: &TaskContext, session: Session) -> Option<Session> {
    let shard_id = session.shards.shard_id;
    let resumable = session.is_resumable();
    let mut transport = task.factory.create(session.clone());

    if let Err(err) = transport.connect().await {
        tracing::warn!(shard_id, error = %err, "Connect failed, requeueing shard");
        return Some(session);
    }

    let handshake = if resumable {
        transport.resume().await
    } else {
        transport.identify().await
    };
    if let Err(err) = handshake {
        tracing::error!(shard_id, resumable, error = %err, "Handshake failed, shard stopped");
        return None;
    }

    let done = CancellationToken::new();
    let _done_guard = done.clone().drop_guard();
    spawn_closer(task, transport.as_ref(), done);

    let result = transport.listening().await;
    let mut current = transport.session();
    drop(transport);

    let err = match result {
        Ok(()) => {
            tracing::info!(shard_id, "Shard connection closed");
            return None;
        }
        Err(err) => err,
    };

    current.handlers.notify_error(&err);

    if err.can_not_identify() {
        tracing::error!(shard_id, error = %err, "Credential rejected, stopping all shards");
        task.fatal.lock().get_or_insert(err);
        if task.stop.trigger() {
            tracing::info!("Session manager stopping");
        }
        return None;
    }

    if err.can_not_resume() {
        tracing::warn!(
            shard_id,
            session_id = %current.id,
            error = %err,
            "Session not resumable, reconnecting with identify"
        );
        current.clear_identity();
    } else {
        tracing::warn!(
            shard_id,
            session_id = %current.id,
            seq = current.last_seq,
            error = %err,
            "Connection ended, reconnecting"
        );
    }
    Some(current)
}

/// Close the transport when the manager stops or the task ends
fn spawn_closer(task: &TaskContext, transport: &dyn Transport, done: CancellationToken) {
    let close = transport.close_signal();
    let ctx = task.ctx.clone();
    let stopped = task.stop.token.clone();

    tokio::spawn(async move {
        tokio::select! {
            () = ctx.cancelled() => {}
            () = stopped.cancelled() => {}
            () = done.cancelled() => {}
        }
        close.cancel();
    });
}

fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
        .to_string()
}
