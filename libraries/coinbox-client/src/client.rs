//! Device client and configuration session

use crate::error::{ClientError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Number of sample slots on the device.
///
/// Playback picks slot 1 with 70 % probability, slot 2 with 20 %, and
/// slot 3 with 10 %. Slots are addressed zero-based on the wire.
pub const SLOT_COUNT: usize = 3;

/// Probe/control timeout
const CONTROL_TIMEOUT: Duration = Duration::from_secs(3);
/// Upload and reset timeout
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the Coinbox device HTTP interface
///
/// # Example
///
/// ```ignore
/// use coinbox_client::DeviceClient;
///
/// let client = DeviceClient::new("192.168.0.31")?;
/// if client.ping().await {
///     let session = client.enter_config().await?;
///     session.upload_sample(0, wav_bytes).await?;
///     let end = session.finish().await;
///     assert!(end.exited());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: Client,
    base_url: String,
}

impl DeviceClient {
    /// Create a client for the device at `address` (a bare host/IP or a
    /// full `http://` URL).
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        if address.is_empty() {
            return Err(ClientError::InvalidAddress("address is empty".into()));
        }

        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", address.trim_end_matches('/'))
        };

        let http = Client::builder()
            .timeout(CONTROL_TIMEOUT)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { http, base_url })
    }

    /// Get the device base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the device. Returns `true` on any HTTP 200 from `/ping`;
    /// network failures count as "not found" rather than errors, since the
    /// device is routinely offline during discovery.
    pub async fn ping(&self) -> bool {
        let url = format!("{}/ping", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "ping failed");
                false
            }
        }
    }

    /// Put the device into configuration mode and open a session.
    pub async fn enter_config(&self) -> Result<ConfigSession> {
        let url = format!("{}/config", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::DeviceError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        info!(device = %self.base_url, "entered configuration mode");
        Ok(ConfigSession {
            client: self.clone(),
        })
    }

    async fn restart(&self) -> Result<()> {
        let url = format!("{}/restart", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::DeviceError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

/// Terminal state of a configuration session
///
/// Returned from `ConfigSession::finish` so the caller learns whether the
/// device actually left configuration mode; there is no process-wide
/// "exited" flag.
#[derive(Debug)]
pub enum SessionEnd {
    /// The device acknowledged the restart and left configuration mode
    Exited,
    /// The restart request failed; the device may still be in
    /// configuration mode and needs a manual power cycle
    RestartFailed(ClientError),
}

impl SessionEnd {
    /// Whether the device confirmed leaving configuration mode
    pub fn exited(&self) -> bool {
        matches!(self, Self::Exited)
    }
}

/// An open configuration session on the device
///
/// Uploads and resets are only valid while the device is in configuration
/// mode, so they live here rather than on `DeviceClient`.
#[derive(Debug)]
pub struct ConfigSession {
    client: DeviceClient,
}

impl ConfigSession {
    /// Upload a prepared WAV to a zero-based slot.
    ///
    /// The bytes are posted as a multipart file field named `file` with
    /// MIME type `audio/wav`, matching what the firmware's upload handler
    /// parses.
    pub async fn upload_sample(&self, slot: u8, wav: Vec<u8>) -> Result<()> {
        if usize::from(slot) >= SLOT_COUNT {
            return Err(ClientError::InvalidSlot(slot));
        }

        let size = wav.len();
        let part = Part::bytes(wav)
            .file_name(format!("slot{}.wav", slot + 1))
            .mime_str("audio/wav")?;
        let form = Form::new().part("file", part);

        let url = format!("{}/{}", self.client.base_url, slot);
        debug!(url = %url, bytes = size, "uploading sample");

        let response = self
            .client
            .http
            .post(&url)
            .timeout(TRANSFER_TIMEOUT)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::DeviceError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        info!(slot, bytes = size, "sample uploaded");
        Ok(())
    }

    /// Erase all custom samples and restore the factory defaults.
    pub async fn factory_reset(&self) -> Result<()> {
        let url = format!("{}/reset", self.client.base_url);
        let response = self
            .client
            .http
            .get(&url)
            .timeout(TRANSFER_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::DeviceError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        info!("factory reset complete");
        Ok(())
    }

    /// Tear the session down by restarting the device.
    ///
    /// Consumes the session either way; the returned state says whether the
    /// device confirmed the exit.
    pub async fn finish(self) -> SessionEnd {
        match self.client.restart().await {
            Ok(()) => {
                info!("device restarted, configuration mode exited");
                SessionEnd::Exited
            }
            Err(e) => {
                warn!(error = %e, "restart failed, device may still be in config mode");
                SessionEnd::RestartFailed(e)
            }
        }
    }
}
