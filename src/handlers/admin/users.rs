use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::{User, UserResponse};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::AppState;

/// GET /admin/users - every account, hashes excluded.
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(&state.pool)
        .await
        .map_err(DatabaseError::from)?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// DELETE /admin/users/:id - remove the account and everything it owns.
///
/// Cascade policy: playlists go first (membership rows cascade with them),
/// then albums, then artists, then the user row, all in one transaction.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let user = fetch_user(&state, id).await?;

    let mut tx = state.pool.begin().await.map_err(DatabaseError::from)?;

    sqlx::query("DELETE FROM playlists WHERE owner_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;
    sqlx::query("DELETE FROM albums WHERE owner_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;
    sqlx::query("DELETE FROM artists WHERE owner_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

    tx.commit().await.map_err(DatabaseError::from)?;

    tracing::info!("Admin deleted user {} and their collection", user.username);

    Ok(Json(json!({
        "message": format!("User {} deleted", user.username)
    })))
}

/// PUT /admin/users/:id/promote - idempotent: promoting an admin is a no-op.
pub async fn promote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    set_admin_flag(&state, id, true).await
}

/// PUT /admin/users/:id/demote - idempotent; demoting the last admin is
/// permitted and locks the console until the flag is restored in the store.
pub async fn demote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    set_admin_flag(&state, id, false).await
}

async fn set_admin_flag(
    state: &AppState,
    id: i64,
    is_admin: bool,
) -> Result<Json<UserResponse>, ApiError> {
    fetch_user(state, id).await?;

    sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
        .bind(is_admin)
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(DatabaseError::from)?;

    let user = fetch_user(state, id).await?;
    Ok(Json(user.into()))
}

async fn fetch_user(state: &AppState, id: i64) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))
}
