//! HTTP client for the prize service.

use std::time::Duration;

use async_trait::async_trait;
use dicebot_core::{CoreError, PrizeIssuer, UserId};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{Result, TelegramError};

/// Path the prize service exposes for slot jackpots.
const WIN_PATH: &str = "win777";

/// Upper bound for a prize request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct PrizeRequest {
    user_id: u64,
}

/// Posts `{"user_id": ...}` to `<base>/win777`.
pub struct HttpPrizeIssuer {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpPrizeIssuer {
    pub fn new(base: &Url) -> Result<Self> {
        let endpoint = format!("{}/{}", base.as_str().trim_end_matches('/'), WIN_PATH);
        let endpoint =
            Url::parse(&endpoint).map_err(|e| TelegramError::HttpError(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PrizeIssuer for HttpPrizeIssuer {
    async fn issue(&self, user: UserId) -> dicebot_core::Result<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&PrizeRequest { user_id: user.0 })
            .send()
            .await
            .map_err(|e| CoreError::Prize(e.to_string()))?;
        debug!(user_id = %user, status = %response.status(), "Prize service responded");
        Ok(())
    }
}
