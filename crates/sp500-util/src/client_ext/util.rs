use anyhow::Result;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{error, trace};

/// Build the shared [`reqwest::Client`], identified by `user_agent`.
///
/// Wikipedia rejects requests without a descriptive user agent, so every
/// outbound request goes through a client built here.
pub fn http_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

pub trait ClientUtilExt {
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send;

    fn get_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

impl ClientUtilExt for Client {
    /// GET request `url` and return the body as text, failing on any non-2xx status.
    async fn get_text(&self, url: &str) -> Result<String> {
        trace!("GET {url}");
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| {
                error!("request error: {e}\nURL: {url}");
                e
            })?
            .error_for_status()?;

        let body = response.text().await?;
        trace!("{} bytes of text received from {url}", body.len());
        Ok(body)
    }

    /// GET request `url` and return the raw body bytes, failing on any non-2xx status.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        trace!("GET {url}");
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| {
                error!("request error: {e}\nURL: {url}");
                e
            })?
            .error_for_status()?;

        let body = response.bytes().await?;
        trace!("{} bytes received from {url}", body.len());
        Ok(body.to_vec())
    }
}
