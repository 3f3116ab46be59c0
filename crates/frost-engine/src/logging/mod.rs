//! Logging setup.
//!
//! The engine itself only emits through the `log` facade. Binaries call
//! [`init_logging`] once to install an `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
