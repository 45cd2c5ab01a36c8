use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::database::models::{Artist, ArtistPayload};
use crate::database::repository::Repository;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

/// POST /artists - add an artist to the caller's collection.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ArtistPayload>,
) -> Result<(StatusCode, Json<Artist>), ApiError> {
    payload.validate()?;

    let result = sqlx::query("INSERT INTO artists (name, genre, owner_id) VALUES (?, ?, ?)")
        .bind(payload.name.trim())
        .bind(&payload.genre)
        .bind(user.id)
        .execute(&state.pool)
        .await
        .map_err(DatabaseError::from)?;

    let artist = Repository::<Artist>::new(state.pool.clone())
        .fetch_any(result.last_insert_rowid())
        .await?;

    Ok((StatusCode::CREATED, Json(artist)))
}

/// GET /artists - the caller's artists.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Artist>>, ApiError> {
    let artists = Repository::<Artist>::new(state.pool.clone())
        .list_owned(user.id)
        .await?;
    Ok(Json(artists))
}

/// GET /artists/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Artist>, ApiError> {
    let artist = Repository::<Artist>::new(state.pool.clone())
        .fetch_for(id, user.id, user.is_admin)
        .await?;
    Ok(Json(artist))
}

/// PUT /artists/:id - full-payload replace.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ArtistPayload>,
) -> Result<Json<Artist>, ApiError> {
    let repo = Repository::<Artist>::new(state.pool.clone());
    repo.fetch_for(id, user.id, user.is_admin).await?;

    payload.validate()?;

    sqlx::query("UPDATE artists SET name = ?, genre = ? WHERE id = ?")
        .bind(payload.name.trim())
        .bind(&payload.genre)
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(DatabaseError::from)?;

    Ok(Json(repo.fetch_any(id).await?))
}

/// DELETE /artists/:id - rejected while dependent albums exist.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let repo = Repository::<Artist>::new(state.pool.clone());
    let artist = repo.fetch_for(id, user.id, user.is_admin).await?;

    let dependents: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM albums WHERE artist_id = ?")
            .bind(id)
            .fetch_one(&state.pool)
            .await
            .map_err(DatabaseError::from)?;
    if dependents > 0 {
        return Err(ApiError::conflict(format!(
            "Artist has {} dependent album(s); delete them first",
            dependents
        )));
    }

    repo.delete(id).await?;

    Ok(Json(json!({
        "message": format!("Artist {} deleted successfully", artist.name)
    })))
}
