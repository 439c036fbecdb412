//! HTTP middleware.
//!
//! - Audit logger: one structured log line per request

pub mod audit;
