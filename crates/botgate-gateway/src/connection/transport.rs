//! Transport contract
//!
//! The session manager drives shard connections only through these traits, so
//! tests and alternative transports can be injected.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{GatewayError, Session};

/// One physical gateway connection for one shard
#[async_trait]
pub trait Transport: Send {
    /// Open the connection; nothing is kept on failure
    async fn connect(&mut self) -> Result<(), GatewayError>;

    /// Send a fresh Identify for the session's shard
    async fn identify(&mut self) -> Result<(), GatewayError>;

    /// Send a Resume with the session's id and last sequence
    async fn resume(&mut self) -> Result<(), GatewayError>;

    /// Receive until the connection ends
    ///
    /// Returns `Ok(())` on a local close and the classifying error otherwise.
    async fn listening(&mut self) -> Result<(), GatewayError>;

    /// Snapshot of the session as this transport currently sees it
    fn session(&self) -> Session;

    /// Token that closes the connection when cancelled
    fn close_signal(&self) -> CancellationToken;

    /// Close the connection; idempotent
    fn close(&self) {
        self.close_signal().cancel();
    }
}

/// Builds a transport for each connection attempt
pub trait TransportFactory: Send + Sync {
    fn create(&self, session: Session) -> Box<dyn Transport>;
}

/// Diagnostic hook called when a connection task panics
pub type PanicHandler = Arc<dyn Fn(&str, &Session) + Send + Sync>;
