//! Blocking render client, one `POST` per render.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use promote_core::{RenderRequest, RenderResult, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT};

use crate::error::ClientError;
use crate::tls;

/// Content type for both the request body and the accepted response.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Transport settings; all of them come from step configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Upper bound for the whole call, connect through last body byte.
    pub timeout: Duration,
    pub insecure_skip_tls_verify: bool,
    /// Extra headers, applied after the content-type headers.
    pub headers: Vec<(String, String)>,
    pub max_response_bytes: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            insecure_skip_tls_verify: false,
            headers: Vec::new(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

/// HTTP client for the render service.
pub struct RenderClient {
    agent: ureq::Agent,
    options: ClientOptions,
}

impl fmt::Debug for RenderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderClient")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RenderClient {
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        let mut builder = ureq::AgentBuilder::new().timeout(options.timeout);
        if options.insecure_skip_tls_verify {
            tracing::warn!("TLS certificate verification disabled for render service");
            builder = builder.tls_config(tls::insecure_client_config()?);
        }
        Ok(Self {
            agent: builder.build(),
            options,
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Send `request` to `endpoint` and decode the rendered targets.
    pub fn send(&self, endpoint: &str, request: &RenderRequest) -> Result<RenderResult, ClientError> {
        let body = serde_json::to_vec(request).map_err(ClientError::Encode)?;

        let mut call = self
            .agent
            .post(endpoint)
            .set("Content-Type", CONTENT_TYPE_JSON)
            .set("Accept", CONTENT_TYPE_JSON);
        for (name, value) in &self.options.headers {
            call = call.set(name, value);
        }

        tracing::debug!(
            url = endpoint,
            deployments = request.deployments().len(),
            "sending render request"
        );

        let response = match call.send_bytes(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(ClientError::Status { code }),
            Err(ureq::Error::Transport(transport)) => {
                return Err(ClientError::Transport(Box::new(transport)))
            }
        };

        let limit = self.options.max_response_bytes;
        let declared = response
            .header("Content-Length")
            .and_then(|v| v.trim().parse::<u64>().ok());
        if declared.is_some_and(|len| len > limit) {
            return Err(ClientError::BodyTooLarge { limit });
        }

        let bytes = read_capped(response.into_reader(), limit)?;
        tracing::trace!(bytes = bytes.len(), "received render response");

        let result: RenderResult = serde_json::from_slice(&bytes).map_err(ClientError::Decode)?;
        tracing::debug!(targets = result.targets().len(), "decoded render response");
        Ok(result)
    }
}

/// Read `reader` to the end, failing once more than `limit` bytes arrive.
fn read_capped(reader: impl Read, limit: u64) -> Result<Vec<u8>, ClientError> {
    let mut buf = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(ClientError::BodyRead)?;
    if buf.len() as u64 > limit {
        return Err(ClientError::BodyTooLarge { limit });
    }
    Ok(buf)
}
