//! Order persistence layer
//!
//! SQLite backend through `sqlx`. The table keeps the column names the
//! kitchen tooling already knows (`pedidos`, `mesa`, `detalles`, `estado`).

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use super::OrderStore;
use crate::error::{BoardError, BoardResult};
use crate::order::{NewOrder, Order, OrderId, OrderStatus};

/// Order store backed by a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteOrderStore {
    /// Database pool
    db_pool: SqlitePool,
}

impl SqliteOrderStore {
    /// Open (creating if missing) the database at `url` and run migrations
    ///
    /// `sqlite::memory:` gives every connection its own database, so pass
    /// `max_connections = 1` for in-memory use.
    pub async fn connect(url: &str, max_connections: u32) -> BoardResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let db_pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        run_migrations(&db_pool).await?;
        info!("Order store ready at {}", url);

        Ok(Self { db_pool })
    }

    /// Wrap an existing pool; the caller is responsible for migrations
    #[must_use]
    pub const fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Close the pool, waiting for connections to finish
    pub async fn close(&self) {
        self.db_pool.close().await;
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn persist(&self, order: NewOrder) -> BoardResult<Order> {
        let result = sqlx::query(
            r"
            INSERT INTO pedidos (mesa, detalles, total, estado)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(order.table())
        .bind(order.details())
        .bind(order.total())
        .bind(OrderStatus::Pending.code())
        .execute(&self.db_pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Order {} persisted", id);
        Ok(order.into_order(id))
    }

    async fn get(&self, id: OrderId) -> BoardResult<Option<Order>> {
        let row = sqlx::query(
            r"
            SELECT id, mesa, detalles, total, estado
            FROM pedidos
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> BoardResult<Order> {
        let row = sqlx::query(
            r"
            UPDATE pedidos SET estado = ?1
            WHERE id = ?2
            RETURNING id, mesa, detalles, total, estado
            ",
        )
        .bind(status.code())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        match row {
            Some(row) => {
                debug!("Order {} moved to {:?}", id, status);
                order_from_row(&row)
            }
            None => Err(BoardError::OrderNotFound { order_id: id }),
        }
    }

    async fn list_by_status(&self, status: OrderStatus) -> BoardResult<Vec<Order>> {
        let rows = sqlx::query(
            r"
            SELECT id, mesa, detalles, total, estado
            FROM pedidos
            WHERE estado = ?1
            ORDER BY id
            ",
        )
        .bind(status.code())
        .fetch_all(&self.db_pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }
}

fn order_from_row(row: &SqliteRow) -> BoardResult<Order> {
    let status: i64 = row.try_get("estado")?;

    Ok(Order {
        id: row.try_get("id")?,
        table: row.try_get("mesa")?,
        details: row.try_get("detalles")?,
        total: row.try_get("total")?,
        status: OrderStatus::try_from(status)?,
    })
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> BoardResult<()> {
    info!("Running database migrations");

    // AUTOINCREMENT keeps ids from being reused after the newest row is gone
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS pedidos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mesa TEXT NOT NULL,
            detalles TEXT NOT NULL,
            total REAL NOT NULL,
            estado INTEGER NOT NULL DEFAULT 0
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pedidos_estado ON pedidos (estado)")
        .execute(pool)
        .await?;

    info!("Database migrations completed");
    Ok(())
}
