//! botgate entry point
//!
//! Run with:
//! ```bash
//! cargo run -p botgate-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use std::sync::Arc;
use std::time::Duration;

use botgate_common::{try_init_tracing_with_config, AppConfig, AppError, TracingConfig};
use botgate_gateway::{
    fetch_access_point, EventHandler, EventHandlers, HttpWebsocketApi, SessionManager,
    WebSocketConnectionFactory,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const ACCESS_POINT_ATTEMPTS: u32 = 3;
const ACCESS_POINT_BACKOFF: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    let tracing_config = config
        .as_ref()
        .map_or_else(|_| TracingConfig::default(), |c| TracingConfig::for_environment(c.app.env));
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        error!(error = %e, "botgate stopped with error");
        std::process::exit(e.exit_code());
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    info!(
        name = %config.app.name,
        env = ?config.app.env,
        api_base = %config.api.base_url,
        sandbox = config.api.sandbox,
        "Starting botgate"
    );

    let token = config.bot.token()?;
    let api = HttpWebsocketApi::new(&config.api.base_url, token.clone(), config.api.timeout)?;
    let ap = fetch_access_point(&api, ACCESS_POINT_ATTEMPTS, ACCESS_POINT_BACKOFF).await?;

    let handlers = Arc::new(EventHandlers::new());
    let intents = handlers.register([
        EventHandler::ready(|_, ready| {
            info!(
                session_id = %ready.session_id,
                shard = %ready.shard,
                user = ready.user.display_name(),
                "READY"
            );
            Ok(())
        }),
        EventHandler::error_notify(|err| warn!(error = %err, "Connection error")),
        EventHandler::at_message(|payload, message| {
            info!(
                seq = ?payload.s,
                channel_id = %message.channel_id,
                author = message.author.as_ref().map_or("", |a| a.display_name()),
                content = message.preview(80),
                "AT_MESSAGE_CREATE"
            );
            Ok(())
        }),
        EventHandler::plain(|payload, raw| {
            debug!(op = %payload.op, event_type = ?payload.t, bytes = raw.len(), "Unhandled frame");
            Ok(())
        }),
    ]);
    info!(%intents, shards = ap.shards, "Handlers registered");

    let ctx = CancellationToken::new();
    let shutdown = ctx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        shutdown.cancel();
    });

    let manager = SessionManager::new(Arc::new(WebSocketConnectionFactory));
    manager.start(ctx, &ap, &token, handlers).await?;

    info!("botgate stopped");
    Ok(())
}
