use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::database::models::{Album, AlbumPayload, Artist};
use crate::database::repository::Repository;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

/// POST /albums - add an album, optionally attached to one of the caller's
/// artists.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AlbumPayload>,
) -> Result<(StatusCode, Json<Album>), ApiError> {
    payload.validate()?;
    check_artist_reference(&state, &user, payload.artist_id).await?;

    let result = sqlx::query(
        "INSERT INTO albums (title, release_year, artist_id, owner_id) VALUES (?, ?, ?, ?)",
    )
    .bind(payload.title.trim())
    .bind(payload.release_year)
    .bind(payload.artist_id)
    .bind(user.id)
    .execute(&state.pool)
    .await
    .map_err(DatabaseError::from)?;

    let album = Repository::<Album>::new(state.pool.clone())
        .fetch_any(result.last_insert_rowid())
        .await?;

    Ok((StatusCode::CREATED, Json(album)))
}

/// GET /albums - the caller's albums.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Album>>, ApiError> {
    let albums = Repository::<Album>::new(state.pool.clone())
        .list_owned(user.id)
        .await?;
    Ok(Json(albums))
}

/// GET /albums/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Album>, ApiError> {
    let album = Repository::<Album>::new(state.pool.clone())
        .fetch_for(id, user.id, user.is_admin)
        .await?;
    Ok(Json(album))
}

/// PUT /albums/:id - full-payload replace.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<AlbumPayload>,
) -> Result<Json<Album>, ApiError> {
    let repo = Repository::<Album>::new(state.pool.clone());
    repo.fetch_for(id, user.id, user.is_admin).await?;

    payload.validate()?;
    check_artist_reference(&state, &user, payload.artist_id).await?;

    sqlx::query("UPDATE albums SET title = ?, release_year = ?, artist_id = ? WHERE id = ?")
        .bind(payload.title.trim())
        .bind(payload.release_year)
        .bind(payload.artist_id)
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(DatabaseError::from)?;

    Ok(Json(repo.fetch_any(id).await?))
}

/// DELETE /albums/:id - playlist membership rows cascade away.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let repo = Repository::<Album>::new(state.pool.clone());
    let album = repo.fetch_for(id, user.id, user.is_admin).await?;

    repo.delete(id).await?;

    Ok(Json(json!({
        "message": format!("Album {} deleted successfully", album.title)
    })))
}

/// A referenced artist must exist and be visible to the caller; anything
/// else is a validation failure on the payload.
async fn check_artist_reference(
    state: &AppState,
    user: &CurrentUser,
    artist_id: Option<i64>,
) -> Result<(), ApiError> {
    let Some(artist_id) = artist_id else {
        return Ok(());
    };

    match Repository::<Artist>::new(state.pool.clone())
        .fetch_for(artist_id, user.id, user.is_admin)
        .await
    {
        Ok(_) => Ok(()),
        Err(DatabaseError::NotFound(_)) => Err(ApiError::validation_error(
            format!("Referenced artist {} not found", artist_id),
            None,
        )),
        Err(other) => Err(other.into()),
    }
}
