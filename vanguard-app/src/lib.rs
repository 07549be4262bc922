//! Vanguard Terminal - interactive site-health shell.

pub mod config;
pub mod report;
pub mod session;

pub use config::{BackendConfig, CliArgs, Config, ConfigError};
pub use session::{BusyFlag, KeyOutcome, LineHandle, Session, SessionOptions, Timings};
