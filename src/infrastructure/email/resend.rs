use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;
use zeroize::Zeroizing;

use crate::{entities::email::OutboundEmail, errors::DispatchError, repositories::email_sender::EmailSender};

/// Sends mail through a Resend-compatible HTTP API.
pub struct ResendClient {
    http: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl ResendClient {
    pub fn new(endpoint: Url, api_key: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ResendClient {
            http,
            endpoint,
            api_key: Zeroizing::new(api_key.to_string()),
        })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        let response = self.http
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
