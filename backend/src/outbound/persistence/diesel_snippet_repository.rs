//! PostgreSQL-backed `SnippetRepository` implementation using Diesel ORM.
//!
//! Timestamps come from the injected clock, truncated to the microsecond
//! precision PostgreSQL stores, so a snippet read back compares equal to the
//! values that were written.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{LATEST_SNIPPETS_LIMIT, SnippetRepository, SnippetRepositoryError};
use crate::domain::{NewSnippet, Snippet, SnippetId};

use super::models::{NewSnippetRow, SnippetRow};
use super::pool::{DbPool, PoolError};
use super::schema::snippets;

/// `LIMIT` applied by [`SnippetRepository::latest`]; equals
/// [`LATEST_SNIPPETS_LIMIT`].
const LATEST_LIMIT: i64 = 10;

/// Diesel-backed implementation of the snippet repository port.
#[derive(Clone)]
pub struct DieselSnippetRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselSnippetRepository {
    /// Create a new repository with the given connection pool and clock.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(6)
    }
}

fn map_pool_error(error: PoolError) -> SnippetRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SnippetRepositoryError::connection(message)
        }
    }
}

/// `NotFound` lands in `Query` too; `get` calls `.optional()` first so a
/// missing row never reaches this mapping.
fn map_diesel_error(error: diesel::result::Error) -> SnippetRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            SnippetRepositoryError::connection(info.message())
        }
        DieselError::DatabaseError(kind, info) => {
            SnippetRepositoryError::query(format!("{kind:?}: {}", info.message()))
        }
        other => SnippetRepositoryError::query(other.to_string()),
    }
}

/// Absolute expiry for a snippet created at `created`.
fn expiry_for(
    created: DateTime<Utc>,
    retention_days: u32,
) -> Result<DateTime<Utc>, SnippetRepositoryError> {
    Duration::try_days(i64::from(retention_days))
        .and_then(|retention| created.checked_add_signed(retention))
        .ok_or_else(|| {
            SnippetRepositoryError::query(format!(
                "retention of {retention_days} days is out of range"
            ))
        })
}

fn row_to_snippet(row: SnippetRow) -> Snippet {
    let SnippetRow {
        id,
        title,
        content,
        created,
        expires,
    } = row;
    Snippet {
        id: SnippetId::from_store(id),
        title,
        content,
        created,
        expires,
    }
}

#[async_trait]
impl SnippetRepository for DieselSnippetRepository {
    async fn insert(&self, snippet: &NewSnippet) -> Result<SnippetId, SnippetRepositoryError> {
        let created = self.now();
        let expires = expiry_for(created, snippet.retention_days)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewSnippetRow {
            title: snippet.title.as_str(),
            content: snippet.content.as_str(),
            created,
            expires,
        };

        let id = diesel::insert_into(snippets::table)
            .values(&new_row)
            .returning(snippets::id)
            .get_result::<i32>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(snippet_id = id, %expires, "inserted snippet");
        Ok(SnippetId::from_store(id))
    }

    async fn get(&self, id: SnippetId) -> Result<Snippet, SnippetRepositoryError> {
        let now = self.now();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = snippets::table
            .filter(snippets::id.eq(id.get()).and(snippets::expires.gt(now)))
            .select(SnippetRow::as_select())
            .first::<SnippetRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_snippet)
            .ok_or_else(SnippetRepositoryError::no_record)
    }

    async fn latest(&self) -> Result<Vec<Snippet>, SnippetRepositoryError> {
        let now = self.now();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SnippetRow> = snippets::table
            .filter(snippets::expires.gt(now))
            .order((snippets::created.desc(), snippets::id.desc()))
            .limit(LATEST_LIMIT)
            .select(SnippetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_snippet).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::TimeZone;
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, SnippetRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_is_a_query_error_not_no_record() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, SnippetRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("not found"));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let repo_err = map_diesel_error(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));

        assert_eq!(
            repo_err,
            SnippetRepositoryError::connection("server closed the connection")
        );
    }

    #[rstest]
    fn constraint_violation_keeps_database_message() {
        let repo_err = map_diesel_error(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("new row violates check constraint".to_owned()),
        ));

        assert!(matches!(repo_err, SnippetRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("CheckViolation"));
        assert!(repo_err.to_string().contains("violates check constraint"));
    }

    #[rstest]
    fn latest_limit_matches_port_limit() {
        assert_eq!(usize::try_from(LATEST_LIMIT).ok(), Some(LATEST_SNIPPETS_LIMIT));
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(365)]
    fn expiry_adds_whole_days(#[case] days: u32) {
        let created = Utc
            .with_ymd_and_hms(2024, 2, 28, 23, 30, 0)
            .single()
            .expect("valid timestamp");
        let expires = expiry_for(created, days).expect("in range");
        assert_eq!(expires - created, Duration::days(i64::from(days)));
    }

    #[rstest]
    fn expiry_out_of_range_is_rejected() {
        let err = expiry_for(DateTime::<Utc>::MAX_UTC, 1).expect_err("overflow");
        assert!(err.to_string().contains("out of range"));
    }

    #[rstest]
    fn row_conversion_keeps_every_field() {
        let created = Utc::now().trunc_subsecs(6);
        let row = SnippetRow {
            id: 12,
            title: "Title".to_owned(),
            content: "Body".to_owned(),
            created,
            expires: created + Duration::days(1),
        };

        let snippet = row_to_snippet(row);
        assert_eq!(snippet.id.get(), 12);
        assert_eq!(snippet.title, "Title");
        assert_eq!(snippet.content, "Body");
        assert_eq!(snippet.created, created);
        assert_eq!(snippet.expires, created + Duration::days(1));
    }
}
