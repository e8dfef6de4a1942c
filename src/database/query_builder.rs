use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::store::{with_id, Document};
use crate::filter::{Filter, FilterData};

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    doc: sqlx::types::Json<Value>,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, DatabaseError> {
        match self.doc.0 {
            Value::Object(map) => Ok(with_id(map, self.id)),
            other => Err(DatabaseError::Serialization(format!("{} in row {}", other, self.id))),
        }
    }
}

/// Runs document queries against one collection table
pub struct QueryBuilder {
    table_name: String,
    filter: Filter,
    query_logging: bool,
}

impl QueryBuilder {
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        // Reuse Filter table name validation
        let filter = Filter::new(&table_name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(Self {
            table_name,
            filter,
            query_logging: false,
        })
    }

    pub fn query_logging(mut self, enabled: bool) -> Self {
        self.query_logging = enabled;
        self
    }

    pub fn filter(mut self, filter_data: FilterData) -> Self {
        self.filter.assign(filter_data);
        self
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<Document>, DatabaseError> {
        let sql_result = self
            .filter
            .to_sql()
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        self.log(&sql_result.query, &sql_result.params);

        let mut q = sqlx::query_as::<_, DocumentRow>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    pub async fn select_by_id(self, pool: &PgPool, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let sql = format!("SELECT \"id\", \"doc\" FROM \"{}\" WHERE \"id\" = $1", self.table_name);
        self.log(&sql, &[Value::String(id.to_string())]);

        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(DocumentRow::into_document).transpose()
    }

    pub async fn insert(self, pool: &PgPool, id: Uuid, doc: Document) -> Result<(), DatabaseError> {
        let sql = format!("INSERT INTO \"{}\" (\"id\", \"doc\") VALUES ($1, $2)", self.table_name);
        self.log(&sql, &[Value::String(id.to_string())]);

        sqlx::query(&sql)
            .bind(id)
            .bind(sqlx::types::Json(Value::Object(doc)))
            .execute(pool)
            .await?;
        Ok(())
    }

    fn log(&self, sql: &str, params: &[Value]) {
        if self.query_logging {
            tracing::debug!(table = %self.table_name, "{} -- params: {:?}", sql, params);
        }
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    // Conditions only carry scalars
    match v {
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        other => q.bind(sqlx::types::Json(other.clone())),
    }
}
