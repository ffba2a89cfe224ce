//! Webhook endpoint helpers.

use axum::{routing::get, Router};
use url::Url;

use crate::error::{Result, TelegramError};

/// Full URL Telegram posts updates to: `<base>/bot<token>`.
pub fn webhook_url(base: &Url, token: &str) -> Result<Url> {
    let url = format!("{}/bot{}", base.as_str().trim_end_matches('/'), token);
    Url::parse(&url).map_err(|e| TelegramError::InvalidWebhookUrl(e.to_string()))
}

/// `GET /` liveness probe, served next to the webhook route.
pub fn liveness_router() -> Router {
    Router::new().route("/", get(|| async { "OK" }))
}
