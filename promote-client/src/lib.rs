//! # promote-client
//!
//! Blocking HTTP client for the remote render service.
//!
//! Build a [`RenderClient`] from [`ClientOptions`] and call
//! [`RenderClient::send`] once per step invocation. There are no retries; the
//! surrounding pipeline decides whether to re-run the step.

mod client;
mod error;
mod tls;

pub use client::{ClientOptions, RenderClient, CONTENT_TYPE_JSON};
pub use error::ClientError;
