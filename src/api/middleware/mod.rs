//! HTTP middleware.
//!
//! Execution order (outermost → innermost):
//! 1. CORS: answers preflight before anything else runs
//! 2. Access log: method, path, status, latency

pub mod access_log;
