//! PostgreSQL implementation of `SubscriptionStore`.
//!
//! Persists subscriptions in the `events.subscription` table (see
//! `migrations/`). Identifier allocation rides on the table's sequence,
//! which gives the atomic, never-reused assignment the contract requires.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::error;
use url::Url;

use crate::domain::subscription::{Subscription, SubscriptionId, SubscriptionRequest};
use crate::ports::{StoreError, SubscriptionStore};

const SUBSCRIPTION_COLUMNS: &str =
    r#"id, sourcefilter, subjectfilter, typefilter, consumer, endpointurl, createdby, "time", validated"#;

/// PostgreSQL implementation of `SubscriptionStore`.
#[derive(Clone)]
pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    /// Creates a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str, e: impl std::fmt::Display) -> StoreError {
    error!(error = %e, "{} failed", context);
    StoreError::database(format!("{}: {}", context, e))
}

fn row_to_subscription(row: &PgRow) -> Result<Subscription, StoreError> {
    let source: String = row
        .try_get("sourcefilter")
        .map_err(|e| db_error("decode sourcefilter", e))?;
    let endpoint: String = row
        .try_get("endpointurl")
        .map_err(|e| db_error("decode endpointurl", e))?;

    // Both columns were written from parsed URLs; a parse failure here
    // means a corrupt row, surfaced as a database error.
    let source_filter =
        Url::parse(&source).map_err(|e| db_error("parse stored sourcefilter", e))?;
    let end_point = Url::parse(&endpoint).map_err(|e| db_error("parse stored endpointurl", e))?;

    Ok(Subscription {
        id: SubscriptionId::new(
            row.try_get::<i64, _>("id")
                .map_err(|e| db_error("decode id", e))?,
        ),
        source_filter,
        subject_filter: row
            .try_get("subjectfilter")
            .map_err(|e| db_error("decode subjectfilter", e))?,
        alternative_subject_filter: None,
        type_filter: row
            .try_get("typefilter")
            .map_err(|e| db_error("decode typefilter", e))?,
        consumer: row
            .try_get("consumer")
            .map_err(|e| db_error("decode consumer", e))?,
        end_point,
        created_by: row
            .try_get("createdby")
            .map_err(|e| db_error("decode createdby", e))?,
        created: row
            .try_get("time")
            .map_err(|e| db_error("decode time", e))?,
        validated: row
            .try_get("validated")
            .map_err(|e| db_error("decode validated", e))?,
    })
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn insert(
        &self,
        request: &SubscriptionRequest,
        created_by: &str,
    ) -> Result<Subscription, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO events.subscription
                (sourcefilter, subjectfilter, typefilter, consumer, endpointurl, createdby, validated)
            VALUES ($1, $2, $3, $4, $5, $6, false)
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(request.source_filter.as_str())
            .bind(request.driving_subject())
            .bind(request.type_filter.as_deref())
            .bind(&request.consumer)
            .bind(request.end_point.as_str())
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("insert subscription", e))?;

        row_to_subscription(&row)
    }

    async fn get(&self, id: SubscriptionId) -> Result<Option<Subscription>, StoreError> {
        let sql = format!(
            "SELECT {} FROM events.subscription WHERE id = $1",
            SUBSCRIPTION_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch subscription", e))?;

        row.as_ref().map(row_to_subscription).transpose()
    }

    async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM events.subscription WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete subscription", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn mark_validated(&self, id: SubscriptionId) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE events.subscription SET validated = true WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("mark subscription validated", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn query_by_consumer(
        &self,
        consumer: &str,
        include_invalid: bool,
    ) -> Result<Vec<Subscription>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM events.subscription
            WHERE consumer = $1 AND (validated OR $2)
            "#,
            SUBSCRIPTION_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(consumer)
            .bind(include_invalid)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("query subscriptions by consumer", e))?;

        rows.iter().map(row_to_subscription).collect()
    }

    async fn query_eligible_excluding_orgs(
        &self,
        source: &str,
        subject: Option<&str>,
        type_filter: Option<&str>,
    ) -> Result<Vec<Subscription>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM events.subscription
            WHERE validated
              AND consumer NOT LIKE '/org/%'
              AND sourcefilter = $1
              AND (subjectfilter IS NULL OR subjectfilter = $2)
              AND (typefilter IS NULL OR typefilter = $3)
            "#,
            SUBSCRIPTION_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(source)
            .bind(subject)
            .bind(type_filter)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("query eligible subscriptions", e))?;

        rows.iter().map(row_to_subscription).collect()
    }
}
