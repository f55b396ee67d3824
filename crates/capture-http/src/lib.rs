//! Process Poster HTTP adapter for the Capture API.
//!
//! Implements the [`capture::CaptureApi`] trait over the engine's REST routes:
//!
//! | Call | Route |
//! |------|-------|
//! | upload file | `POST files` (multipart) |
//! | get workflow | `GET portal/{container}/workflow/{workflow}` |
//! | submit process | `POST portal/{container}/process` |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Authentication headers, multipart framing, timeouts,
//! and status handling all live here. The `gateway` crate sees only
//! [`capture::CaptureApi`].

mod client;
mod config;

pub use client::HttpCaptureApi;
pub use config::{ClientConfig, ClientConfigError, DEFAULT_TIMEOUT_SECS};
