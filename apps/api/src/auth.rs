//! Caller identity resolution.
//!
//! Sessions are resolved upstream; by the time a request reaches this service
//! the user id travels in a trusted header (`x-user-id` unless configured).

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::errors::AppError;
use crate::models::user::Owner;
use crate::state::AppState;

pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for Owner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = header_value(&parts.headers, &state.config.auth_user_header)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let mut owner = Owner::new(user_id);
        owner.name = header_value(&parts.headers, USER_NAME_HEADER);
        owner.email = header_value(&parts.headers, USER_EMAIL_HEADER);
        Ok(owner)
    }
}
