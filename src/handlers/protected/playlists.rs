use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::database::models::{Album, Playlist, PlaylistPayload, PlaylistResponse};
use crate::database::repository::Repository;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

/// POST /playlists - create a playlist with an optional set of album
/// references.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PlaylistPayload>,
) -> Result<(StatusCode, Json<PlaylistResponse>), ApiError> {
    payload.validate()?;
    let album_ids = payload.unique_album_ids();
    check_album_references(&state, &user, &album_ids).await?;

    let mut tx = state.pool.begin().await.map_err(DatabaseError::from)?;

    let playlist_id =
        sqlx::query("INSERT INTO playlists (name, description, owner_id) VALUES (?, ?, ?)")
            .bind(payload.name.trim())
            .bind(&payload.description)
            .bind(user.id)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from)?
            .last_insert_rowid();

    for album_id in &album_ids {
        sqlx::query("INSERT INTO playlist_tracks (playlist_id, album_id) VALUES (?, ?)")
            .bind(playlist_id)
            .bind(album_id)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from)?;
    }

    tx.commit().await.map_err(DatabaseError::from)?;

    let playlist = Repository::<Playlist>::new(state.pool.clone())
        .fetch_any(playlist_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaylistResponse::new(playlist, album_ids)),
    ))
}

/// GET /playlists - the caller's playlists with their album references.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<PlaylistResponse>>, ApiError> {
    let playlists = Repository::<Playlist>::new(state.pool.clone())
        .list_owned(user.id)
        .await?;

    let mut responses = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        let album_ids = load_album_ids(&state.pool, playlist.id).await?;
        responses.push(PlaylistResponse::new(playlist, album_ids));
    }
    Ok(Json(responses))
}

/// GET /playlists/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let playlist = Repository::<Playlist>::new(state.pool.clone())
        .fetch_for(id, user.id, user.is_admin)
        .await?;
    let album_ids = load_album_ids(&state.pool, playlist.id).await?;
    Ok(Json(PlaylistResponse::new(playlist, album_ids)))
}

/// PUT /playlists/:id - full replace, membership set included.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PlaylistPayload>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let repo = Repository::<Playlist>::new(state.pool.clone());
    repo.fetch_for(id, user.id, user.is_admin).await?;

    payload.validate()?;
    let album_ids = payload.unique_album_ids();
    check_album_references(&state, &user, &album_ids).await?;

    let mut tx = state.pool.begin().await.map_err(DatabaseError::from)?;

    sqlx::query("UPDATE playlists SET name = ?, description = ? WHERE id = ?")
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

    for album_id in &album_ids {
        sqlx::query("INSERT INTO playlist_tracks (playlist_id, album_id) VALUES (?, ?)")
            .bind(id)
            .bind(album_id)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from)?;
    }

    tx.commit().await.map_err(DatabaseError::from)?;

    let playlist = repo.fetch_any(id).await?;
    Ok(Json(PlaylistResponse::new(playlist, album_ids)))
}

/// DELETE /playlists/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let repo = Repository::<Playlist>::new(state.pool.clone());
    let playlist = repo.fetch_for(id, user.id, user.is_admin).await?;

    repo.delete(id).await?;

    Ok(Json(json!({
        "message": format!("Playlist {} deleted successfully", playlist.name)
    })))
}

async fn load_album_ids(pool: &SqlitePool, playlist_id: i64) -> Result<Vec<i64>, ApiError> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT album_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY rowid",
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::from)?;
    Ok(ids)
}

/// Every referenced album must exist and be visible to the caller.
async fn check_album_references(
    state: &AppState,
    user: &CurrentUser,
    album_ids: &[i64],
) -> Result<(), ApiError> {
    let repo = Repository::<Album>::new(state.pool.clone());
    for &album_id in album_ids {
        match repo.fetch_for(album_id, user.id, user.is_admin).await {
            Ok(_) => {}
            Err(DatabaseError::NotFound(_)) => {
                return Err(ApiError::validation_error(
                    format!("Referenced album {} not found", album_id),
                    None,
                ));
            }
            Err(other) => return Err(other.into()),
        }
    }
    Ok(())
}
