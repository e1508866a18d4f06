use crate::clients::pool::ClientPool;
use crate::error::{Error, Result};
use async_trait::async_trait;
use tracing::debug;

/// One HTTP GET against the service. Identity rotation and proxy routing
/// live behind this boundary; callers only see a body or an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<String>;
}

pub struct RquestTransport {
    pool: ClientPool,
}

impl RquestTransport {
    pub fn new(pool: ClientPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Transport for RquestTransport {
    async fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<String> {
        let client = self.pool.next_client();
        let mut request = client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        debug!(status = status.as_u16(), url = url, "Response received");

        if !status.is_success() {
            return Err(Error::HttpStatus { status });
        }

        Ok(response.text().await?)
    }
}
