use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{self, Claims};
use crate::database::models::User;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /login - verify credentials and issue a bearer token.
///
/// Unknown username and wrong password produce the same response, so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(&form.username)
        .fetch_optional(&state.pool)
        .await
        .map_err(DatabaseError::from)?;

    let user = match user {
        Some(u) if auth::verify_password(&form.password, &u.hashed_password) => u,
        _ => {
            tracing::warn!("Failed login attempt for username {}", form.username);
            return Err(ApiError::unauthorized("Invalid username or password"));
        }
    };

    let claims = Claims::new(user.id, state.config.security.token_expiry_mins);
    let access_token = auth::generate_token(&claims, &state.config.security.jwt_secret)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
