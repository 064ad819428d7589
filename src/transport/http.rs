//! HTTP bridge sender.
//!
//! Publishes the command to an IR bridge that accepts a JSON array of
//! signed durations over HTTP (Tasmota-style relays, ESPHome web hooks,
//! home-automation webhooks). The sign alternation — odd entries negated
//! to mark "off" spans — happens here, at the transport boundary.

use std::time::Duration;

use crate::error::EscarchaError;
use crate::frame::PulseTrain;
use crate::transport::Sender;

/// Request timeout for both probe and send.
const TIMEOUT_SECS: u64 = 10;

/// Sends pulse trains to an HTTP IR bridge.
pub struct HttpSender {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSender {
    pub fn new(url: impl Into<String>) -> Result<Self, EscarchaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| EscarchaError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl Sender for HttpSender {
    fn send(&mut self, pulses: &PulseTrain) -> Result<(), EscarchaError> {
        let payload: Vec<i64> = pulses.signed().collect();
        log::debug!("posting {} durations to {}", payload.len(), self.url);

        let response = self
            .client
            .post(self.url.as_str())
            .json(&payload)
            .send()
            .map_err(|e| EscarchaError::Transport(format!("POST {} failed: {}", self.url, e)))?;

        response
            .error_for_status()
            .map_err(|e| EscarchaError::Transport(format!("bridge rejected command: {}", e)))?;
        Ok(())
    }

    fn probe_availability(&self) -> bool {
        self.client
            .get(self.url.as_str())
            .send()
            .map(|response| !response.status().is_server_error())
            .unwrap_or(false)
    }
}
