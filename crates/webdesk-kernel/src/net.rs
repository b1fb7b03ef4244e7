//! HTTP access for the `ping` and `curl` tools.
//!
//! Tools only see [`HttpProbe`], so tests and offline builds can swap the
//! network out. No timeout is imposed here; a request lives as long as the
//! client lets it.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("network access is disabled")]
    Offline,

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
}

/// Minimal HTTP client surface.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Send a HEAD request. Any response counts as success.
    async fn head(&self, url: &str) -> Result<(), ProbeError>;

    /// Fetch `url` and return the body as text.
    async fn get_text(&self, url: &str) -> Result<String, ProbeError>;
}

/// Refuses every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProbe;

#[async_trait]
impl HttpProbe for OfflineProbe {
    async fn head(&self, _url: &str) -> Result<(), ProbeError> {
        Err(ProbeError::Offline)
    }

    async fn get_text(&self, _url: &str) -> Result<String, ProbeError> {
        Err(ProbeError::Offline)
    }
}

/// [`HttpProbe`] backed by a shared `reqwest` client.
#[cfg(feature = "net")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestProbe {
    client: reqwest::Client,
}

#[cfg(feature = "net")]
impl ReqwestProbe {
    pub fn new() -> Self {
        Self::default()
    }

    fn request_error(url: &str, e: reqwest::Error) -> ProbeError {
        ProbeError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg(feature = "net")]
#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn head(&self, url: &str) -> Result<(), ProbeError> {
        self.client
            .head(url)
            .send()
            .await
            .map_err(|e| Self::request_error(url, e))?;
        Ok(())
    }

    async fn get_text(&self, url: &str) -> Result<String, ProbeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::request_error(url, e))?;
        response.text().await.map_err(|e| Self::request_error(url, e))
    }
}

/// The probe a kernel uses when none is configured.
pub fn default_probe() -> std::sync::Arc<dyn HttpProbe> {
    #[cfg(feature = "net")]
    {
        std::sync::Arc::new(ReqwestProbe::new())
    }
    #[cfg(not(feature = "net"))]
    {
        std::sync::Arc::new(OfflineProbe)
    }
}
