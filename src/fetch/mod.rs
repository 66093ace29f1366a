//! HTTP retrieval of the raw dataset.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use tracing::debug;

use crate::error::{EdaError, Result};

/// Issues a single GET for `url` and returns the body.
///
/// A non-success status is reported as [`EdaError::ResourceUnavailable`];
/// there is no retry.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let parsed = reqwest::Url::parse(url).map_err(|_| EdaError::InvalidSource(url.to_string()))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(EdaError::ResourceUnavailable {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Response body received");
    Ok(bytes.to_vec())
}
