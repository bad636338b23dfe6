//! Process-wide singleton agent.
//!
//! `init*` constructs the shared [`SqlAgent`] at most once; the first
//! successful construction wins and later calls are no-ops. Under N
//! concurrent first-time callers exactly one pool is built and every
//! caller observes it once built. A failed construction leaves the cell
//! empty so a later call may try again.
//!
//! Prefer passing a [`SqlAgent`] explicitly; these free functions exist
//! for callers that want the package-level surface.

use crate::agent::{SqlAgent, Tx};
use crate::builder::{DeleteBuilder, InsertBuilder, SelectBuilder, ToSql, UpdateBuilder};
use crate::error::{SqlAgentError, SqlAgentResult};
use futures::future::BoxFuture;
use serde::Serialize;
use sqlagent_config::{self as config, ConnectionDescriptor};
use sqlx::any::{AnyQueryResult, AnyRow};
use sqlx::FromRow;
use std::path::Path;
use tokio::sync::OnceCell;
use tracing::debug;

static AGENT: OnceCell<SqlAgent> = OnceCell::const_new();

/// Initialize the shared agent from a descriptor. No-op once initialized.
pub async fn init(cfg: &ConnectionDescriptor) -> SqlAgentResult<()> {
    AGENT
        .get_or_try_init(|| async {
            debug!("initializing shared sql agent");
            SqlAgent::connect(cfg).await
        })
        .await?;
    Ok(())
}

/// Initialize from a config file (`.json` default, `.yaml`/`.yml` alternate).
pub async fn init_from_file(path: impl AsRef<Path>) -> SqlAgentResult<()> {
    let cfg = config::load(path)?;
    init(&cfg).await
}

/// Initialize from the environment: `DB_CONFIG` names the file directly,
/// otherwise the `database[-DB_LABEL]` search runs from the current
/// directory upward.
pub async fn init_from_env() -> SqlAgentResult<()> {
    let cfg = config::load_from_env()?;
    init(&cfg).await
}

/// The shared agent, or `NotInitialized` before a successful `init`.
pub fn agent() -> SqlAgentResult<&'static SqlAgent> {
    AGENT.get().ok_or(SqlAgentError::NotInitialized)
}

/// The shared agent if it has been initialized.
pub fn try_agent() -> Option<&'static SqlAgent> {
    AGENT.get()
}

/// Close the shared agent's pool at shutdown.
pub async fn close() -> SqlAgentResult<()> {
    agent()?.close().await;
    Ok(())
}

// ----------------------------------------------------------------------
// Free-function mirror of the agent surface
// ----------------------------------------------------------------------

pub fn insert(table: impl Into<String>) -> SqlAgentResult<InsertBuilder> {
    Ok(agent()?.insert(table))
}

pub fn update(table: impl Into<String>) -> SqlAgentResult<UpdateBuilder> {
    Ok(agent()?.update(table))
}

pub fn delete(table: impl Into<String>) -> SqlAgentResult<DeleteBuilder> {
    Ok(agent()?.delete(table))
}

pub fn select<I, S>(columns: I) -> SqlAgentResult<SelectBuilder>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(agent()?.select(columns))
}

pub fn insert_model<T: Serialize>(
    table: impl Into<String>,
    model: &T,
    ignore: &[&str],
) -> SqlAgentResult<InsertBuilder> {
    agent()?.insert_model(table, model, ignore)
}

pub fn update_model_columns<T: Serialize>(
    builder: UpdateBuilder,
    model: &T,
    ignore: &[&str],
) -> SqlAgentResult<UpdateBuilder> {
    agent()?.update_model_columns(builder, model, ignore)
}

pub fn model_columns<T: Serialize>(model: &T, ignore: &[&str]) -> SqlAgentResult<Vec<String>> {
    agent()?.model_columns(model, ignore)
}

pub async fn execute<B: ToSql>(builder: &B) -> SqlAgentResult<AnyQueryResult> {
    agent()?.execute(builder).await
}

pub async fn fetch_one<T, B>(builder: &B) -> SqlAgentResult<T>
where
    B: ToSql,
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    agent()?.fetch_one(builder).await
}

pub async fn fetch_optional<T, B>(builder: &B) -> SqlAgentResult<Option<T>>
where
    B: ToSql,
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    agent()?.fetch_optional(builder).await
}

pub async fn fetch_all<T, B>(builder: &B) -> SqlAgentResult<Vec<T>>
where
    B: ToSql,
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    agent()?.fetch_all(builder).await
}

pub async fn transaction<T, F>(f: F) -> SqlAgentResult<T>
where
    F: for<'t> FnOnce(&'t mut Tx) -> BoxFuture<'t, SqlAgentResult<T>>,
{
    agent()?.transaction(f).await
}

// Re-exported so transaction bodies only need this module.
pub use crate::agent::{tx_execute, tx_fetch_all, tx_fetch_one, tx_fetch_optional};
