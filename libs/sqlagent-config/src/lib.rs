//! Database connection configuration for sqlagent
//!
//! Provides the [`ConnectionDescriptor`] decoded from a JSON or YAML config
//! file, plus environment-driven discovery of that file. The descriptor is
//! immutable after construction; the agent crate turns it into a live pool.

pub mod descriptor;
pub mod error;
pub mod loader;

pub use descriptor::{ConnectionDescriptor, DriverKind};
pub use error::{ConfigError, ConfigResult};
pub use loader::{
    discover, discover_from_env, load, load_from_env, DEFAULT_CONFIG_BASENAME, ENV_DB_CONFIG,
    ENV_DB_LABEL,
};
