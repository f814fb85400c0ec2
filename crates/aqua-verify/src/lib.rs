//! Completeness and stormwater compliance checks for French permit dossiers.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
