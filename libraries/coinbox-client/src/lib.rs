//! HTTP client for the Coinbox device
//!
//! The device exposes a tiny HTTP surface on the local network:
//!
//! - `GET /ping` — discovery probe, 200 when the device is up
//! - `GET /config` — enter configuration mode
//! - `POST /<slot>` — upload a sample WAV (multipart, zero-based slot)
//! - `GET /reset` — factory-reset the samples
//! - `GET /restart` — leave configuration mode and restart
//!
//! All calls use short timeouts and surface network failures to the caller
//! without retrying. Configuration mode is modeled as a `ConfigSession`
//! value; its teardown returns an explicit `SessionEnd` state instead of
//! tracking "exited" in global state.

#![forbid(unsafe_code)]

mod client;
mod discovery;
mod error;

pub use client::{ConfigSession, DeviceClient, SessionEnd, SLOT_COUNT};
pub use discovery::DiscoveryPoller;
pub use error::{ClientError, Result};

/// Default static address of the Coinbox on the local network
pub const DEFAULT_DEVICE_ADDR: &str = "192.168.0.31";
