use axum::{extract::State, http::StatusCode, Json};

use crate::auth;
use crate::database::models::{RegisterRequest, User, UserResponse};
use crate::database::{self, DatabaseError};
use crate::error::ApiError;
use crate::AppState;

/// POST /register - create a user account.
///
/// A registration with username exactly "admin" is created with the admin
/// flag set; the UNIQUE constraint on username means at most one such
/// account exists at a time.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate()?;

    let hashed_password = auth::hash_password(&payload.password)?;
    let is_admin = payload.username == "admin";

    let result = sqlx::query(
        "INSERT INTO users (username, email, hashed_password, is_admin) VALUES (?, ?, ?, ?)",
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&hashed_password)
    .bind(is_admin)
    .execute(&state.pool)
    .await
    .map_err(map_duplicate)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.pool)
        .await
        .map_err(DatabaseError::from)?;

    tracing::info!("Registered user {} (admin: {})", user.username, user.is_admin);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Duplicates surface as store-level UNIQUE violations, never as a
/// check-then-insert race.
fn map_duplicate(err: sqlx::Error) -> ApiError {
    if database::is_unique_violation(&err) {
        let taken = if err.to_string().contains("users.username") {
            "Username already registered"
        } else {
            "Email already registered"
        };
        ApiError::validation_error(taken, None)
    } else {
        DatabaseError::from(err).into()
    }
}
