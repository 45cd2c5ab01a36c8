use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::Artist;
use crate::database::repository::Repository;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::AppState;

/// GET /admin/artists - all artists regardless of owner.
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Artist>>, ApiError> {
    let artists = Repository::<Artist>::new(state.pool.clone()).list_all().await?;
    Ok(Json(artists))
}

/// DELETE /admin/artists/:id - same dependent-album policy as the owner
/// endpoint: rejected while albums still reference the artist.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let repo = Repository::<Artist>::new(state.pool.clone());
    let artist = repo.fetch_any(id).await?;

    let dependents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM albums WHERE artist_id = ?")
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

    tracing::info!("Admin deleted artist {}", artist.name);

    Ok(Json(json!({
        "message": format!("Artist {} deleted", artist.name)
    })))
}
