//! Error types for promote-client.

use thiserror::Error;

/// All errors that can arise from a render call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request body could not be encoded.
    #[error("could not encode render request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The TLS configuration could not be built.
    #[error("could not configure TLS: {0}")]
    Tls(#[from] rustls::Error),

    /// Connection, DNS, TLS handshake or timeout failure.
    #[error("error sending request to render service: {0}")]
    Transport(#[source] Box<ureq::Transport>),

    /// The service answered with a non-2xx status.
    #[error("render service returned status {code}")]
    Status { code: u16 },

    /// The body could not be read to the end.
    #[error("error reading render response body: {0}")]
    BodyRead(#[source] std::io::Error),

    /// The body exceeded the configured cap.
    #[error("render response body exceeds limit of {limit} bytes")]
    BodyTooLarge { limit: u64 },

    /// The body was read but is not a valid render result.
    #[error("could not parse render response: {0}")]
    Decode(#[source] serde_json::Error),
}
