//! PostgreSQL implementation of the database gateway
use crate::config::DatabaseConfig;
use crate::database::{
    DatabaseClient, DatabaseError, DbResult, QueryOutcome, QueryRows, is_read_statement,
};
use crate::schema::{
    self, COUNTABLE_TABLES, LEDGER_PARTIES, OPEN_TITLES, OPEN_TITLES_TABLE, OPERATIONS,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::{debug, info, warn};

/// sqlx-backed gateway. Holds at most one live connection, established
/// lazily on first use and reused across calls.
pub struct PostgresDatabase {
    host: String,
    port: u16,
    user: String,
    password: String,
    dbname: String,
    pool: Option<PgPool>,
}

impl PostgresDatabase {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            user: config.user.clone(),
            password: config.password.clone(),
            dbname: config.dbname.clone(),
            pool: None,
        }
    }

    /// Lazy, idempotent connection establishment. A call when already
    /// connected is a no-op; after `close` the same credentials are reused.
    async fn ensure_connected(&mut self) -> DbResult<&PgPool> {
        if self.pool.is_none() {
            info!(
                "Conectando ao PostgreSQL: host={} porta={} usuário={} banco={}",
                self.host, self.port, self.user, self.dbname
            );

            let options = PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.dbname);

            let pool = PgPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(std::time::Duration::from_secs(15))
                .connect_with(options)
                .await
                .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

            self.pool = Some(pool);
        }

        Ok(self.pool.as_ref().expect("pool present after connect"))
    }

    async fn fetch_limited(&mut self, sql: &str, limit: i64) -> DbResult<QueryRows> {
        let pool = self.ensure_connected().await?;
        let rows = sqlx::query(sql)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        rows_to_query_rows(&rows)
    }
}

#[async_trait]
impl DatabaseClient for PostgresDatabase {
    async fn execute_query(&mut self, sql: &str) -> DbResult<QueryOutcome> {
        let pool = self.ensure_connected().await?;
        debug!("Executando consulta: {}", sql);

        if is_read_statement(sql) {
            let rows = sqlx::query(sql)
                .fetch_all(pool)
                .await
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
            debug!("Consulta retornou {} resultados", rows.len());
            return Ok(QueryOutcome::Rows(rows_to_query_rows(&rows)?));
        }

        // Write/DDL path: commit on success, roll back on failure. The
        // connection itself survives a failed statement.
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        match sqlx::query(sql).execute(&mut *tx).await {
            Ok(result) => {
                tx.commit()
                    .await
                    .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
                Ok(QueryOutcome::Affected(result.rows_affected()))
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback falhou: {}", rollback_err);
                }
                Err(DatabaseError::QueryError(e.to_string()))
            }
        }
    }

    async fn list_tables(&mut self) -> DbResult<Vec<String>> {
        let pool = self.ensure_connected().await?;
        let rows = sqlx::query(
            "SELECT table_name \
             FROM information_schema.tables \
             WHERE table_schema = 'public' \
             ORDER BY table_name",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>(0)
                    .map_err(|e| DatabaseError::QueryError(e.to_string()))
            })
            .collect()
    }

    async fn describe_table(&mut self, table: &str) -> DbResult<QueryRows> {
        let pool = self.ensure_connected().await?;
        let rows = sqlx::query(
            "SELECT column_name, data_type, is_nullable, column_default \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        rows_to_query_rows(&rows)
    }

    async fn list_operations(&mut self, limit: i64) -> DbResult<QueryRows> {
        let sql = format!(
            "SELECT {} FROM public.{} ORDER BY \"data\" DESC LIMIT $1",
            quoted_projection(&OPERATIONS.column_names()),
            OPERATIONS.name
        );
        self.fetch_limited(&sql, limit).await
    }

    async fn list_open_titles(&mut self, limit: i64) -> DbResult<QueryRows> {
        let sql = format!(
            "SELECT {} FROM public.{} ORDER BY data_emissao DESC LIMIT $1",
            quoted_projection(&OPEN_TITLES.column_names()),
            OPEN_TITLES.name
        );
        self.fetch_limited(&sql, limit).await
    }

    async fn list_ledger_parties(&mut self, limit: i64) -> DbResult<QueryRows> {
        let sql = format!(
            "SELECT {} FROM public.{} ORDER BY nome LIMIT $1",
            quoted_projection(&LEDGER_PARTIES.column_names()),
            LEDGER_PARTIES.name
        );
        self.fetch_limited(&sql, limit).await
    }

    async fn count_records(&mut self, table: &str) -> DbResult<QueryRows> {
        // Identifiers cannot be bound, so the allow-list check must come
        // before the query text exists.
        if !schema::is_countable(table) {
            return Err(DatabaseError::InvalidTable(COUNTABLE_TABLES.join(", ")));
        }

        let pool = self.ensure_connected().await?;
        debug!("Contando registros na tabela {}", table);
        let rows = sqlx::query(&format!(
            "SELECT CAST(COUNT(*) AS bigint) AS total_records FROM public.{table}"
        ))
        .fetch_all(pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        rows_to_query_rows(&rows)
    }

    async fn count_open_titles(&mut self) -> DbResult<QueryRows> {
        let pool = self.ensure_connected().await?;
        let rows = sqlx::query(&format!(
            "SELECT CAST(COUNT(*) AS bigint) AS total_titulos_abertos FROM public.{OPEN_TITLES_TABLE}"
        ))
        .fetch_all(pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        rows_to_query_rows(&rows)
    }

    async fn close(&mut self) -> DbResult<()> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        Ok(())
    }
}

/// Double-quote every identifier in a projection list.
fn quoted_projection(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Materialize sqlx rows into ordered columns + JSON cells. An empty result
/// set has no column metadata available and yields an empty `QueryRows`.
fn rows_to_query_rows(rows: &[PgRow]) -> DbResult<QueryRows> {
    let Some(first) = rows.first() else {
        return Ok(QueryRows::default());
    };

    let columns: Vec<String> = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let mut out = QueryRows::new(columns);
    for row in rows {
        let mut cells = Vec::with_capacity(out.columns.len());
        for idx in 0..out.columns.len() {
            cells.push(decode_value(row, idx)?);
        }
        out.rows.push(cells);
    }
    Ok(out)
}

/// Decode one PostgreSQL cell into a `serde_json::Value` by type name.
fn decode_value(row: &PgRow, index: usize) -> DbResult<JsonValue> {
    let raw = row
        .try_get_raw(index)
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
    if raw.is_null() {
        return Ok(JsonValue::Null);
    }

    let type_name = row.column(index).type_info().name().to_string();
    let decode_err = |e: sqlx::Error| DatabaseError::QueryError(e.to_string());

    let value = match type_name.as_str() {
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            JsonValue::String(row.try_get::<String, _>(index).map_err(decode_err)?)
        }
        "INT2" | "SMALLINT" => JsonValue::from(row.try_get::<i16, _>(index).map_err(decode_err)?),
        "INT4" | "INTEGER" | "SERIAL" => {
            JsonValue::from(row.try_get::<i32, _>(index).map_err(decode_err)?)
        }
        "INT8" | "BIGINT" | "BIGSERIAL" => {
            JsonValue::from(row.try_get::<i64, _>(index).map_err(decode_err)?)
        }
        "FLOAT4" | "REAL" => {
            let v = row.try_get::<f32, _>(index).map_err(decode_err)?;
            serde_json::Number::from_f64(f64::from(v))
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null)
        }
        "FLOAT8" | "DOUBLE PRECISION" => {
            let v = row.try_get::<f64, _>(index).map_err(decode_err)?;
            serde_json::Number::from_f64(v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null)
        }
        // Canonical string form preserves precision for money columns.
        "NUMERIC" | "DECIMAL" => JsonValue::String(
            row.try_get::<sqlx::types::Decimal, _>(index)
                .map_err(decode_err)?
                .to_string(),
        ),
        "BOOL" | "BOOLEAN" => {
            JsonValue::Bool(row.try_get::<bool, _>(index).map_err(decode_err)?)
        }
        "DATE" => JsonValue::String(
            row.try_get::<NaiveDate, _>(index)
                .map_err(decode_err)?
                .format("%Y-%m-%d")
                .to_string(),
        ),
        "TIMESTAMP" => JsonValue::String(
            row.try_get::<NaiveDateTime, _>(index)
                .map_err(decode_err)?
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
        "TIMESTAMPTZ" => JsonValue::String(
            row.try_get::<DateTime<Utc>, _>(index)
                .map_err(decode_err)?
                .to_rfc3339(),
        ),
        "TIME" => JsonValue::String(
            row.try_get::<NaiveTime, _>(index)
                .map_err(decode_err)?
                .to_string(),
        ),
        "UUID" => JsonValue::String(
            row.try_get::<sqlx::types::Uuid, _>(index)
                .map_err(decode_err)?
                .to_string(),
        ),
        "JSON" | "JSONB" => row.try_get::<JsonValue, _>(index).map_err(decode_err)?,
        _ => row
            .try_get::<String, _>(index)
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    };

    Ok(value)
}
