use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::db::models::User;
use crate::error::BudgetError;
use crate::identity::resolve_user;
use crate::router::BudgetState;

/// Pull the bearer token out of `Authorization: Bearer <token>`.
pub async fn bearer_token(parts: &mut Parts, state: &BudgetState) -> Result<String, BudgetError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| BudgetError::Unauthorized(rejection.to_string()))?;
    let token = bearer.token().trim();
    if token.is_empty() {
        return Err(BudgetError::Unauthorized("empty bearer token".to_string()));
    }
    Ok(token.to_string())
}

/// The authenticated caller. Extracting it verifies the bearer token and
/// resolves (or first creates) the local user row.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<BudgetState> for CurrentUser {
    type Rejection = BudgetError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &BudgetState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        let user = resolve_user(state.identity.as_ref(), &state.storage, &token).await?;
        Ok(Self(user))
    }
}
