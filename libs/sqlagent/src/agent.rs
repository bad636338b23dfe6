//! Pooled connection agent.
//!
//! One [`SqlAgent`] wraps a pooled `Any` connection plus the driver kind it
//! was built for; the driver kind selects the placeholder style stamped on
//! builders handed out by the factories. The agent holds no locks and no
//! mutable state, concurrency is delegated to the pool.

use crate::builder::{DeleteBuilder, InsertBuilder, Placeholder, SelectBuilder, ToSql, UpdateBuilder};
use crate::error::{SqlAgentError, SqlAgentResult};
use crate::model;
use crate::value::SqlValue;
use futures::future::BoxFuture;
use serde::Serialize;
use sqlagent_config::{ConfigError, ConnectionDescriptor, DriverKind};
use sqlx::any::{AnyPoolOptions, AnyQueryResult, AnyRow};
use sqlx::{Any, AnyPool, FromRow, Transaction};
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reserved key in `ConnectionDescriptor::parameters` that sizes the pool.
/// Stripped before URL rendering.
pub const PARAM_POOL_MAX_CONNECTIONS: &str = "pool_max_connections";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

static INSTALL_DRIVERS: Once = Once::new();

/// An open transaction, passed by `&mut` so it cannot be shared across tasks.
pub type Tx = Transaction<'static, Any>;

macro_rules! bind_all {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlValue::Null => query.bind(Option::<String>::None),
                SqlValue::Bool(v) => query.bind(*v),
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Float(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.clone()),
            };
        }
        query
    }};
}

/// Connection agent over one pooled database handle.
#[derive(Debug, Clone)]
pub struct SqlAgent {
    pool: AnyPool,
    driver: DriverKind,
}

impl SqlAgent {
    /// Open a pooled connection described by `cfg` and verify it answers.
    ///
    /// Each call builds an independent pool; use [`crate::global`] for the
    /// process-wide singleton.
    pub async fn connect(cfg: &ConnectionDescriptor) -> SqlAgentResult<Self> {
        cfg.validate()?;
        let mut cfg = cfg.clone().with_driver_defaults();

        let max_connections = match cfg.parameters.remove(PARAM_POOL_MAX_CONNECTIONS) {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                ConfigError::Invalid(format!(
                    "{} must be an integer, got {:?}",
                    PARAM_POOL_MAX_CONNECTIONS, raw
                ))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect(&cfg.url())
            .await
            .map_err(SqlAgentError::Connection)?;

        // Probe before handing the pool out
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(SqlAgentError::Connection)?;

        info!(driver = %cfg.driver, database = %cfg.name, "database connected");
        Ok(Self {
            pool,
            driver: cfg.driver,
        })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn driver(&self) -> DriverKind {
        self.driver
    }

    /// Placeholder style for this agent's driver.
    pub fn placeholder(&self) -> Placeholder {
        Placeholder::from(self.driver)
    }

    /// Check the database is still reachable.
    pub async fn ping(&self) -> SqlAgentResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(SqlAgentError::Execution)?;
        Ok(())
    }

    /// Close the pool. Call once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        info!(driver = %self.driver, "database pool closed");
    }

    // ------------------------------------------------------------------
    // Builder factories, pre-bound to this agent's placeholder style
    // ------------------------------------------------------------------

    pub fn insert(&self, table: impl Into<String>) -> InsertBuilder {
        InsertBuilder::new(table).placeholder(self.placeholder())
    }

    pub fn update(&self, table: impl Into<String>) -> UpdateBuilder {
        UpdateBuilder::new(table).placeholder(self.placeholder())
    }

    pub fn delete(&self, table: impl Into<String>) -> DeleteBuilder {
        DeleteBuilder::new(table).placeholder(self.placeholder())
    }

    pub fn select<I, S>(&self, columns: I) -> SelectBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectBuilder::new(columns).placeholder(self.placeholder())
    }

    // ------------------------------------------------------------------
    // Model reflection helpers
    // ------------------------------------------------------------------

    /// Insert builder with columns and values derived from `model`'s serde
    /// fields, minus `ignore`.
    pub fn insert_model<T: Serialize>(
        &self,
        table: impl Into<String>,
        model: &T,
        ignore: &[&str],
    ) -> SqlAgentResult<InsertBuilder> {
        Ok(model::insert_model(table, model, ignore)?.placeholder(self.placeholder()))
    }

    /// Add a SET clause per serde field of `model`, minus `ignore`.
    pub fn update_model_columns<T: Serialize>(
        &self,
        builder: UpdateBuilder,
        model: &T,
        ignore: &[&str],
    ) -> SqlAgentResult<UpdateBuilder> {
        model::update_model_columns(builder, model, ignore)
    }

    /// Column names derived from `model`'s serde fields, minus `ignore`.
    pub fn model_columns<T: Serialize>(
        &self,
        model: &T,
        ignore: &[&str],
    ) -> SqlAgentResult<Vec<String>> {
        model::model_columns(model, ignore)
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Render `builder` and run it against the pool.
    pub async fn execute<B: ToSql>(&self, builder: &B) -> SqlAgentResult<AnyQueryResult> {
        let (sql, params) = builder.to_sql()?;
        debug!(sql = %sql, params = params.len(), "execute");
        bind_all!(sqlx::query(&sql), &params)
            .execute(&self.pool)
            .await
            .map_err(SqlAgentError::Execution)
    }

    /// Render `builder`, fetch exactly one row and scan it into `T`.
    pub async fn fetch_one<T, B>(&self, builder: &B) -> SqlAgentResult<T>
    where
        B: ToSql,
        T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        let (sql, params) = builder.to_sql()?;
        debug!(sql = %sql, params = params.len(), "fetch_one");
        bind_all!(sqlx::query_as::<Any, T>(&sql), &params)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlAgentError::Execution)
    }

    /// Like [`Self::fetch_one`] but `Ok(None)` when no row matches.
    pub async fn fetch_optional<T, B>(&self, builder: &B) -> SqlAgentResult<Option<T>>
    where
        B: ToSql,
        T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        let (sql, params) = builder.to_sql()?;
        bind_all!(sqlx::query_as::<Any, T>(&sql), &params)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlAgentError::Execution)
    }

    /// Render `builder`, fetch every row and scan them into `Vec<T>`.
    pub async fn fetch_all<T, B>(&self, builder: &B) -> SqlAgentResult<Vec<T>>
    where
        B: ToSql,
        T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        let (sql, params) = builder.to_sql()?;
        debug!(sql = %sql, params = params.len(), "fetch_all");
        bind_all!(sqlx::query_as::<Any, T>(&sql), &params)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlAgentError::Execution)
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits only if `f` returns `Ok`; any error path rolls back.
    ///
    /// ```no_run
    /// # use sqlagent::{SqlAgent, SqlAgentResult, tx_execute};
    /// # async fn demo(agent: &SqlAgent) -> SqlAgentResult<u64> {
    /// let inserted = agent
    ///     .transaction(|tx| {
    ///         Box::pin(async move {
    ///             let builder = sqlagent::InsertBuilder::new("t")
    ///                 .columns(["name"])
    ///                 .values(["x"]);
    ///             let res = tx_execute(tx, &builder).await?;
    ///             Ok(res.rows_affected())
    ///         })
    ///     })
    ///     .await?;
    /// # Ok(inserted)
    /// # }
    /// ```
    pub async fn transaction<T, F>(&self, f: F) -> SqlAgentResult<T>
    where
        F: for<'t> FnOnce(&'t mut Tx) -> BoxFuture<'t, SqlAgentResult<T>>,
    {
        let mut tx = self.pool.begin().await.map_err(SqlAgentError::Execution)?;
        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(SqlAgentError::Execution)?;
                Ok(value)
            },
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "transaction rollback failed");
                }
                Err(err)
            },
        }
    }
}

// ----------------------------------------------------------------------
// Transaction-scoped execution helpers
// ----------------------------------------------------------------------

/// Render `builder` and run it inside the open transaction.
pub async fn tx_execute<B: ToSql>(tx: &mut Tx, builder: &B) -> SqlAgentResult<AnyQueryResult> {
    let (sql, params) = builder.to_sql()?;
    debug!(sql = %sql, params = params.len(), "tx execute");
    bind_all!(sqlx::query(&sql), &params)
        .execute(&mut **tx)
        .await
        .map_err(SqlAgentError::Execution)
}

/// Fetch exactly one row inside the open transaction.
pub async fn tx_fetch_one<T, B>(tx: &mut Tx, builder: &B) -> SqlAgentResult<T>
where
    B: ToSql,
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    let (sql, params) = builder.to_sql()?;
    bind_all!(sqlx::query_as::<Any, T>(&sql), &params)
        .fetch_one(&mut **tx)
        .await
        .map_err(SqlAgentError::Execution)
}

/// Fetch at most one row inside the open transaction.
pub async fn tx_fetch_optional<T, B>(tx: &mut Tx, builder: &B) -> SqlAgentResult<Option<T>>
where
    B: ToSql,
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    let (sql, params) = builder.to_sql()?;
    bind_all!(sqlx::query_as::<Any, T>(&sql), &params)
        .fetch_optional(&mut **tx)
        .await
        .map_err(SqlAgentError::Execution)
}

/// Fetch every matching row inside the open transaction.
pub async fn tx_fetch_all<T, B>(tx: &mut Tx, builder: &B) -> SqlAgentResult<Vec<T>>
where
    B: ToSql,
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    let (sql, params) = builder.to_sql()?;
    bind_all!(sqlx::query_as::<Any, T>(&sql), &params)
        .fetch_all(&mut **tx)
        .await
        .map_err(SqlAgentError::Execution)
}
