use sqlagent_config::ConfigError;
use thiserror::Error;

/// Errors surfaced by the agent. None are retried internally.
#[derive(Debug, Error)]
pub enum SqlAgentError {
    #[error("database config error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("failed to render SQL: {0}")]
    QueryBuild(String),

    #[error("query execution failed: {0}")]
    Execution(#[source] sqlx::Error),

    #[error("model reflection failed: {0}")]
    Model(String),

    #[error("sql agent is not initialized, call global::init first")]
    NotInitialized,
}

/// Result type alias using SqlAgentError
pub type SqlAgentResult<T> = Result<T, SqlAgentError>;

impl SqlAgentError {
    pub(crate) fn build(msg: impl Into<String>) -> Self {
        Self::QueryBuild(msg.into())
    }
}
