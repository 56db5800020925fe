//! File output for step telemetry and sweep results.

pub mod export;
