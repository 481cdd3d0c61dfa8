use super::error::ApiError;
use super::AppState;
use axum::{
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use serde::Deserialize;
use std::sync::Arc;

/// Passes when the `Authorization: Basic` header carries the app password.
pub struct Authorized;

/// Passes when the `auth` query parameter carries `base64(user:password)`.
/// Used by report links that are opened directly in a browser.
pub struct QueryAuthorized;

#[derive(Debug, Deserialize)]
struct AuthQuery {
    auth: Option<String>,
}

impl FromRequestParts<Arc<AppState>> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        state.verifier.verify_header(header)?;
        Ok(Authorized)
    }
}

impl FromRequestParts<Arc<AppState>> for QueryAuthorized {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) =
            Query::<AuthQuery>::try_from_uri(&parts.uri).map_err(|_| ApiError::Unauthorized)?;
        let token = query.auth.ok_or(ApiError::Unauthorized)?;

        state.verifier.verify_token(&token)?;
        Ok(QueryAuthorized)
    }
}
