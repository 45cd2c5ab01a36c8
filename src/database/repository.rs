use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::database::DatabaseError;

/// A record tagged with an owning user. Table names are compile-time
/// constants, never user input.
pub trait Owned: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;

    fn owner_id(&self) -> i64;
}

/// Ownership-scoped data access, shared by artists, albums and playlists.
pub struct Repository<T> {
    pool: SqlitePool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Owned> Repository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// The caller's records in creation order.
    pub async fn list_owned(&self, owner_id: i64) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE owner_id = ? ORDER BY id", T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Every record regardless of owner, for admin listings.
    pub async fn list_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Fetch a record as seen by `viewer_id`. A row owned by someone else is
    /// reported exactly like a missing row unless the viewer is an admin, so
    /// callers cannot probe for other users' data.
    pub async fn fetch_for(
        &self,
        id: i64,
        viewer_id: i64,
        is_admin: bool,
    ) -> Result<T, DatabaseError> {
        let record = self.fetch_any(id).await?;
        if record.owner_id() != viewer_id && !is_admin {
            return Err(DatabaseError::NotFound(format!(
                "Record {} not found in {}",
                id,
                T::TABLE
            )));
        }
        Ok(record)
    }

    /// Fetch by id alone (admin paths).
    pub async fn fetch_any(&self, id: i64) -> Result<T, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", T::TABLE);
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                DatabaseError::NotFound(format!("Record {} not found in {}", id, T::TABLE))
            })
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
