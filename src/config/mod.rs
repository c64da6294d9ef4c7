//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level config struct, server identity and loading
//! - [`listen`]: Network listener configuration
//! - [`limits`]: Per-session line, queue and write limits
//! - [`validation`]: Startup validation of loaded values

mod limits;
mod listen;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::Config;
pub use validation::validate;
