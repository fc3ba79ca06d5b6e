//! jobdesk: moderation and lifecycle control core of a multi-actor job board.
//!
//! The library exposes the domain services (report aggregation, posting
//! lifecycle, employer verification, quota enforcement, account status) and
//! an axum router over them; the binary in `main.rs` wires them to a store
//! and serves HTTP.

pub mod config;
pub mod error;
pub mod moderation;
pub mod telemetry;
