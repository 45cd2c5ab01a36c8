use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

use crate::database::repository::Owned;
use crate::error::ApiError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

impl Owned for Playlist {
    const TABLE: &'static str = "playlists";

    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaylistPayload {
    pub name: String,
    pub description: Option<String>,
    /// Album references; PUT replaces the whole set.
    #[serde(default)]
    pub album_ids: Vec<i64>,
}

impl PlaylistPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();

        let name = self.name.trim();
        if name.is_empty() || name.len() > 200 {
            field_errors.insert(
                "name".to_string(),
                "Name must be between 1 and 200 characters".to_string(),
            );
        }
        if let Some(description) = &self.description {
            if description.len() > 1000 {
                field_errors.insert(
                    "description".to_string(),
                    "Description must be at most 1000 characters".to_string(),
                );
            }
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(
                "Invalid playlist input",
                Some(field_errors),
            ))
        }
    }

    /// Membership set with duplicates collapsed, first occurrence wins.
    pub fn unique_album_ids(&self) -> Vec<i64> {
        let mut seen = Vec::with_capacity(self.album_ids.len());
        for &id in &self.album_ids {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }
}

/// Playlist plus its album references, as returned by the API.
#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub album_ids: Vec<i64>,
}

impl PlaylistResponse {
    pub fn new(playlist: Playlist, album_ids: Vec<i64>) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            owner_id: playlist.owner_id,
            album_ids,
        }
    }
}
