use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

use crate::database::repository::Owned;
use crate::error::ApiError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub genre: Option<String>,
    pub owner_id: i64,
}

impl Owned for Artist {
    const TABLE: &'static str = "artists";

    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

/// Create and full-replace update share one payload shape.
#[derive(Debug, Deserialize)]
pub struct ArtistPayload {
    pub name: String,
    pub genre: Option<String>,
}

impl ArtistPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();

        let name = self.name.trim();
        if name.is_empty() || name.len() > 200 {
            field_errors.insert(
                "name".to_string(),
                "Name must be between 1 and 200 characters".to_string(),
            );
        }
        if let Some(genre) = &self.genre {
            if genre.trim().is_empty() || genre.len() > 100 {
                field_errors.insert(
                    "genre".to_string(),
                    "Genre must be between 1 and 100 characters".to_string(),
                );
            }
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(
                "Invalid artist input",
                Some(field_errors),
            ))
        }
    }
}
