//! HTTP client for pulling profiles from a running control endpoint.

use crate::output::decode_profile;
use crate::profile::Profile;
use crate::utils::config::{FETCH_TIMEOUT_MARGIN, MAX_FETCH_TIMEOUT};
use crate::utils::error::FetchError;
use log::{debug, info};
use reqwest::blocking::Client;
use std::time::Duration;

/// Client for a readprof control endpoint
pub struct ProfileClient {
    client: Client,
    endpoint_url: String,
}

impl ProfileClient {
    /// Create a new client for the endpoint at `endpoint_url`
    ///
    /// The URL is the full endpoint path, e.g. `http://127.0.0.1:8080/debug/readprof`.
    /// Debug endpoints are reached directly, so proxy settings from the
    /// environment are ignored.
    pub fn new(endpoint_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().no_proxy().build()?;

        Ok(Self {
            client,
            endpoint_url: endpoint_url.into(),
        })
    }

    /// Fetch the gzip-compressed profile payload for a `seconds` long window
    ///
    /// Blocks for roughly `seconds` while the endpoint collects samples.
    ///
    /// # Errors
    /// * `FetchError::RequestFailed` - connection or timeout failure
    /// * `FetchError::Status` - endpoint answered with a non-2xx status
    pub fn fetch_raw(&self, seconds: u64) -> Result<Vec<u8>, FetchError> {
        info!(
            "Fetching {}s read profile from: {}",
            seconds, self.endpoint_url
        );

        let response = self
            .client
            .get(&self.endpoint_url)
            .query(&[("seconds", seconds)])
            .timeout(request_timeout(seconds))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body = response.bytes()?;
        debug!("Received {} byte profile payload", body.len());

        Ok(body.to_vec())
    }

    /// Fetch and decode a profile
    ///
    /// # Errors
    /// As [`ProfileClient::fetch_raw`], plus `FetchError::Decode` for an
    /// undecodable payload.
    pub fn fetch(&self, seconds: u64) -> Result<Profile, FetchError> {
        let payload = self.fetch_raw(seconds)?;
        Ok(decode_profile(&payload)?)
    }
}

/// Time allowed for a `seconds` long window plus transfer, capped
fn request_timeout(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
        .saturating_add(FETCH_TIMEOUT_MARGIN)
        .min(MAX_FETCH_TIMEOUT)
}
