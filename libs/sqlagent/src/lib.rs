//! Pooled SQL convenience layer over sqlx.
//!
//! One [`SqlAgent`] per process wraps a pooled `Any` connection (mysql,
//! postgresql or sqlite) built from a [`sqlagent_config::ConnectionDescriptor`],
//! and hands out insert/update/delete/select builders that render to SQL
//! text plus a parameter list only at execution time. A [`global`] module
//! mirrors the agent surface as free functions behind a once-initialized
//! singleton for callers that do not want to thread the agent through.
//!
//! Deadlines and cancellation ride on the futures themselves: wrap any call
//! in `tokio::time::timeout` (or drop it) to cancel the underlying I/O.

pub mod agent;
pub mod builder;
pub mod error;
pub mod global;
pub mod model;
pub mod value;

pub use agent::{
    tx_execute, tx_fetch_all, tx_fetch_one, tx_fetch_optional, SqlAgent, Tx,
    PARAM_POOL_MAX_CONNECTIONS,
};
pub use builder::{
    DeleteBuilder, InsertBuilder, Placeholder, SelectBuilder, ToSql, UpdateBuilder,
};
pub use error::{SqlAgentError, SqlAgentResult};
pub use model::{insert_model, model_columns, update_model_columns};
pub use value::SqlValue;

// Re-export the config crate so callers need only one dependency.
pub use sqlagent_config as config;
pub use sqlagent_config::{ConnectionDescriptor, DriverKind};
