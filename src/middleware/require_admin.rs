use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::CurrentUser;
use crate::error::ApiError;

/// Role gate for the admin console. Must be layered inside `jwt_auth`, which
/// puts the resolved user into the request extensions.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !user.is_admin {
        tracing::warn!("User {} denied access to admin route", user.username);
        return Err(ApiError::forbidden("Administrator privileges required"));
    }

    Ok(next.run(request).await)
}
