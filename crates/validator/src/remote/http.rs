use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::RemoteTransport;
use crate::foundation::TransportError;

/// Posts checks as JSON to `base.join(route)` and reads a JSON boolean.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    pub fn new(base: &str) -> Result<Self, TransportError> {
        Ok(Self::with_client(Client::new(), Url::parse(base)?))
    }

    /// Creates a transport around an existing client.
    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Base URL routes are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl RemoteTransport for HttpTransport {
    async fn send(&self, route: &str, body: &serde_json::Value) -> Result<bool, TransportError> {
        let url = self.base.join(route)?;
        debug!(%url, "posting remote check");
        let verdict: serde_json::Value = self
            .client
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        match verdict {
            serde_json::Value::Bool(valid) => Ok(valid),
            other => Err(TransportError::UnexpectedResponse(other)),
        }
    }
}
