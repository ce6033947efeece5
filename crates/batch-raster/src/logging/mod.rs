//! Logging utilities.
//!
//! The crate itself only emits through the `log` facade. Hosts that have no
//! logger of their own can install `env_logger` with [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
