//! Common utilities, types, and configurations shared across BV-BRC crates.
//!
//! This crate contains the base building blocks for the data query engine, including:
//! - **Configuration**: Strongly typed client settings (`config`).
//! - **Authentication**: The credential holder passed to the client (`auth`).
//! - **Cancellation**: Cooperative cancel/deadline signal (`cancel`).
//! - **Resilience**: Bounded retry with exponential backoff (`retry`).
//! - **Logging**: Subscriber setup (`telemetry`).
pub mod auth;
pub mod cancel;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use auth::Token;
pub use cancel::{CancelSource, CancelToken};
pub use config::{ClientSettings, RetrySettings};
