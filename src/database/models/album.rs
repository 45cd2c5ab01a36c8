use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

use crate::database::repository::Owned;
use crate::error::ApiError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub release_year: i64,
    pub artist_id: Option<i64>,
    pub owner_id: i64,
}

impl Owned for Album {
    const TABLE: &'static str = "albums";

    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

#[derive(Debug, Deserialize)]
pub struct AlbumPayload {
    pub title: String,
    pub release_year: i64,
    pub artist_id: Option<i64>,
}

impl AlbumPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();

        let title = self.title.trim();
        if title.is_empty() || title.len() > 200 {
            field_errors.insert(
                "title".to_string(),
                "Title must be between 1 and 200 characters".to_string(),
            );
        }
        if self.release_year <= 1900 || self.release_year >= 2100 {
            field_errors.insert(
                "release_year".to_string(),
                "Release year must be between 1901 and 2099".to_string(),
            );
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(
                "Invalid album input",
                Some(field_errors),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str, year: i64) -> AlbumPayload {
        AlbumPayload {
            title: title.to_string(),
            release_year: year,
            artist_id: None,
        }
    }

    #[test]
    fn validates_title_and_year_bounds() {
        assert!(payload("Abbey Road", 1969).validate().is_ok());
        assert!(payload("", 1969).validate().is_err());
        assert!(payload("Too Early", 1900).validate().is_err());
        assert!(payload("Too Late", 2100).validate().is_err());
    }
}
