use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::kernel::event::ActionRequest;

/// Spoken through the synthesis provider when the execution layer fails.
pub const APOLOGY: &str = "Sorry, I wasn't able to do that just now.";

/// Client for the external tool-execution layer (task creation, note
/// capture, item lookup).
///
/// Mutating requests carry the Coordinator's idempotency key; a retry sends
/// the same request struct, same key, so a retried call cannot duplicate a
/// side effect.
#[derive(Clone)]
pub struct ToolClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ToolReceipt {
    pub ok: bool,
    #[serde(default)]
    pub detail: String,
}

impl ToolClient {
    pub fn new(base_url: &str, budget: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(budget)
                .build()
                .unwrap_or_default(),
            base_url: base_url.to_string(),
        }
    }

    pub async fn execute(&self, request: &ActionRequest) -> Result<ToolReceipt> {
        let response = self
            .client
            .post(format!("{}/actions", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("tool layer error: {}", response.status()));
        }

        let receipt: ToolReceipt = response.json().await?;
        Ok(receipt)
    }

    /// Never retried blind: the caller passes the original request so the
    /// idempotency key is preserved.
    pub async fn retry(&self, request: &ActionRequest) -> Result<ToolReceipt> {
        self.execute(request).await
    }
}
