//! Microsite inquiry intake: classification, meeting brief generation, and
//! outbound email hand-off.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
