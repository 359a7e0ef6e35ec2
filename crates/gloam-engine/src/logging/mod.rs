//! Logging utilities.
//!
//! Logger initialization for host binaries, plus rate limiting for
//! diagnostics that would otherwise repeat every simulation step.

mod init;
mod warn_once;

pub use init::{init_logging, LoggingConfig};
pub use warn_once::WarnOnce;
