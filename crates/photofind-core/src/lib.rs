//! Service plumbing shared by Photofind binaries.
//!
//! Configuration loading, tracing setup, request ids, the liveness probe,
//! the injectable clock and the conflict-retry wrapper.

pub mod clock;
pub mod config;
pub mod health;
pub mod middleware;
pub mod retry;
pub mod tracing;
