pub mod config;
pub mod error;
pub mod kpi;
pub mod telemetry;
