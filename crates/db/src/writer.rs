//! Replace-semantics table writer.

use sqlx::postgres::Postgres;
use sqlx::query_builder::Separated;
use sqlx::QueryBuilder;
use tabload_table::{ColumnType, Table, Value};
use tracing::{debug, info};

use crate::pool::DbPool;
use crate::schema::{create_table_sql, drop_table_sql, insert_prefix};

/// PostgreSQL accepts at most this many bind parameters per statement.
pub const MAX_BIND_PARAMS: usize = 65_535;

/// Error type for the database write.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to connect to {target}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to replace table {table}")]
    Replace {
        table: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("table {table} has no columns")]
    NoColumns { table: String },
}

/// Writes whole tables into the database.
pub struct TableWriter<'a> {
    db: &'a DbPool,
}

impl<'a> TableWriter<'a> {
    pub fn new(db: &'a DbPool) -> Self {
        Self { db }
    }

    /// Replace the relation `name` with the contents of `table`.
    ///
    /// Drops any existing relation of that name, recreates it from the
    /// table's columns and inserts every row in order, all inside one
    /// transaction.
    ///
    /// # Returns
    /// The number of rows inserted
    pub async fn replace_table(&self, name: &str, table: &Table) -> Result<u64, WriteError> {
        if table.column_count() == 0 {
            return Err(WriteError::NoColumns {
                table: name.to_string(),
            });
        }

        let replace_err = |source: sqlx::Error| WriteError::Replace {
            table: name.to_string(),
            source,
        };

        let mut tx = self.db.pool().begin().await.map_err(replace_err)?;

        sqlx::query(&drop_table_sql(name))
            .execute(&mut *tx)
            .await
            .map_err(replace_err)?;
        sqlx::query(&create_table_sql(name, table.columns()))
            .execute(&mut *tx)
            .await
            .map_err(replace_err)?;
        debug!("Recreated table {} with {} columns", name, table.column_count());

        let prefix = insert_prefix(name, table.columns());
        let types: Vec<ColumnType> = table.columns().iter().map(|c| c.ty).collect();
        let rows_per_statement = (MAX_BIND_PARAMS / table.column_count()).max(1);

        let mut inserted = 0;
        for chunk in table.rows().chunks(rows_per_statement) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(&prefix);
            builder.push_values(chunk, |mut b, row| {
                for (value, ty) in row.iter().zip(&types) {
                    push_cell(&mut b, value, *ty);
                }
            });
            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(replace_err)?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(replace_err)?;

        info!("Replaced table {} with {} rows", name, inserted);
        Ok(inserted)
    }
}

/// Bind one cell, typing nulls after their column.
fn push_cell<'q>(b: &mut Separated<'_, 'q, Postgres, &'static str>, value: &'q Value, ty: ColumnType) {
    match (value, ty) {
        (Value::Null, ColumnType::Boolean) => b.push_bind(None::<bool>),
        (Value::Null, ColumnType::Integer) => b.push_bind(None::<i64>),
        (Value::Null, ColumnType::Float) => b.push_bind(None::<f64>),
        (Value::Null, ColumnType::Text) => b.push_bind(None::<String>),
        (Value::Integer(v), ColumnType::Float) => b.push_bind(*v as f64),
        (Value::Boolean(v), _) => b.push_bind(*v),
        (Value::Integer(v), _) => b.push_bind(*v),
        (Value::Float(v), _) => b.push_bind(*v),
        (Value::Text(v), _) => b.push_bind(v.as_str()),
    };
}
