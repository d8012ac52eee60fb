//! The store handle, schema bootstrap, and error mapping.

use sqlx::postgres::{PgPool, PgPoolOptions};
use tickerflow_core::error::StoreError;
use tracing::{debug, info};

use crate::config::StoreConfig;

pub(crate) const BARS_TABLE: &str = "bars";
pub(crate) const TREND_INDICATORS_TABLE: &str = "trend_indicators";
pub(crate) const REVERSION_INDICATORS_TABLE: &str = "reversion_indicators";
pub(crate) const SIGNALS_TABLE: &str = "signals";
pub(crate) const ORDERS_TABLE: &str = "orders";

pub(crate) const CREATE_BARS_SQL: &str = "\
    CREATE TABLE IF NOT EXISTS bars (
        datetime TIMESTAMPTZ NOT NULL,
        ticker VARCHAR(10) NOT NULL,
        open DOUBLE PRECISION NOT NULL,
        high DOUBLE PRECISION NOT NULL,
        low DOUBLE PRECISION NOT NULL,
        close DOUBLE PRECISION NOT NULL,
        volume BIGINT NOT NULL,
        PRIMARY KEY (datetime, ticker)
    )";

pub(crate) const CREATE_REVERSION_INDICATORS_SQL: &str = "\
    CREATE TABLE IF NOT EXISTS reversion_indicators (
        datetime TIMESTAMPTZ NOT NULL,
        ticker VARCHAR(10) NOT NULL,
        close DOUBLE PRECISION,
        z_score DOUBLE PRECISION,
        signal VARCHAR(10) NOT NULL,
        PRIMARY KEY (datetime, ticker)
    )";

pub(crate) const CREATE_SIGNALS_SQL: &str = "\
    CREATE TABLE IF NOT EXISTS signals (
        datetime TIMESTAMPTZ NOT NULL,
        ticker VARCHAR(10) NOT NULL,
        close DOUBLE PRECISION,
        trend VARCHAR(10),
        signal VARCHAR(10),
        PRIMARY KEY (datetime, ticker)
    )";

pub(crate) const CREATE_ORDERS_SQL: &str = "\
    CREATE TABLE IF NOT EXISTS orders (
        id BIGSERIAL PRIMARY KEY,
        symbol VARCHAR(10) NOT NULL,
        side VARCHAR(4) NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        placed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )";

/// The trend indicator table's EMA columns are named by configured span,
/// so its CREATE statement is built per run.
pub(crate) fn create_trend_indicators_sql(ema_spans: [u32; 3]) -> String {
    let [fast, mid, slow] = ema_spans;
    format!(
        "CREATE TABLE IF NOT EXISTS trend_indicators (
            datetime TIMESTAMPTZ NOT NULL,
            ticker VARCHAR(10) NOT NULL,
            open DOUBLE PRECISION,
            high DOUBLE PRECISION,
            low DOUBLE PRECISION,
            close DOUBLE PRECISION,
            volume BIGINT,
            ema_{fast} DOUBLE PRECISION,
            ema_{mid} DOUBLE PRECISION,
            ema_{slow} DOUBLE PRECISION,
            adx DOUBLE PRECISION,
            plus_di DOUBLE PRECISION,
            minus_di DOUBLE PRECISION,
            trend VARCHAR(10) NOT NULL,
            PRIMARY KEY (datetime, ticker)
        )"
    )
}

/// Undefined values are stored as SQL NULL.
pub(crate) fn nan_to_null(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// SQL NULL comes back as NaN.
pub(crate) fn null_to_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

/// Map a driver error onto the store taxonomy: transport problems are
/// retryable connection errors, row-shape problems are decode errors,
/// everything else is a query failure.
pub(crate) fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::Connection(err.to_string()),
        sqlx::Error::RowNotFound
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StoreError::Decode(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

pub(crate) fn tx_err(err: sqlx::Error) -> StoreError {
    StoreError::Transaction(err.to_string())
}

/// Handle to the Postgres store. Cheap to clone; every method checks a
/// connection out of the shared pool.
#[derive(Clone)]
pub struct Store {
    pub(crate) pool: PgPool,
}

impl Store {
    /// Open a connection pool against the configured database.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(
            host = %config.host,
            dbname = %config.dbname,
            "Connected to Postgres"
        );

        Ok(Self { pool })
    }

    /// Create every pipeline table that does not yet exist. The trend
    /// indicator table is created with the given EMA spans; enrichment
    /// runs rebuild it anyway if the spans have changed.
    pub async fn ensure_schema(&self, ema_spans: [u32; 3]) -> Result<(), StoreError> {
        let statements = [
            CREATE_BARS_SQL.to_string(),
            create_trend_indicators_sql(ema_spans),
            CREATE_REVERSION_INDICATORS_SQL.to_string(),
            CREATE_SIGNALS_SQL.to_string(),
            CREATE_ORDERS_SQL.to_string(),
        ];
        for statement in &statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(classify)?;
        }
        debug!("Pipeline tables ensured");
        Ok(())
    }
}
