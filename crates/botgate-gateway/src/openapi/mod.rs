//! REST access-point client
//!
//! Only `GET /gateway/bot` is needed before the shards start.

use std::time::Duration;

use async_trait::async_trait;
use botgate_core::{CoreError, Token, WebsocketAp, WebsocketApi};
use reqwest::Client;

const GATEWAY_BOT_PATH: &str = "/gateway/bot";

/// Fetch the access point, retrying transient failures
///
/// Makes at most `attempts` calls, doubling `backoff` after each retryable
/// failure. Errors that are not retryable are returned at once.
pub async fn fetch_access_point<A>(
    api: &A,
    attempts: u32,
    backoff: Duration,
) -> Result<WebsocketAp, CoreError>
where
    A: WebsocketApi + ?Sized,
{
    let mut delay = backoff;
    let mut attempt = 1;
    loop {
        match api.ws().await {
            Ok(ap) => return Ok(ap),
            Err(err) if err.is_retryable() && attempt < attempts => {
                tracing::warn!(
                    attempt,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %err,
                    "Access point fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// `WebsocketApi` over reqwest
#[derive(Debug, Clone)]
pub struct HttpWebsocketApi {
    client: Client,
    base_url: String,
    token: Token,
}

impl HttpWebsocketApi {
    pub fn new(
        base_url: impl Into<String>,
        token: Token,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{GATEWAY_BOT_PATH}", self.base_url)
    }
}

#[async_trait]
impl WebsocketApi for HttpWebsocketApi {
    async fn ws(&self) -> Result<WebsocketAp, CoreError> {
        let url = self.endpoint();
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.token.authorization())
            .send()
            .await
            .map_err(|e| CoreError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let ap: WebsocketAp = serde_json::from_str(&body)?;
        tracing::debug!(
            url = %ap.url,
            shards = ap.shards,
            remaining = ap.session_start_limit.remaining,
            max_concurrency = ap.session_start_limit.max_concurrency,
            "Access point fetched"
        );
        Ok(ap)
    }
}
