//! Flight-disruption compensation eligibility.
//!
//! The [`workflows::eligibility`] module holds the pure decision engine and the service facade
//! that wraps it for HTTP callers; [`workflows::airports`] loads the immutable airport reference
//! data the engine classifies distances against.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
