//! Test utilities for Photofind services.
//!
//! Provides `ManualClock` and `MockIdentity`.
//! Import in tests only, never in production code.

pub mod auth;
pub mod clock;
