use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::BudgetError;
use crate::validation::{Validate, ValidationErrors};

/// JSON body parsed as `T` and checked; handlers receive `T::Valid`.
/// Malformed bodies are reported as a validation failure on `body`.
pub struct ValidJson<T: Validate>(pub T::Valid);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = BudgetError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationErrors::single("body", rejection.body_text()))?;
        Ok(Self(body.validate()?))
    }
}

/// Query string parsed as `T` and checked, reported on `query` when malformed.
pub struct ValidQuery<T: Validate>(pub T::Valid);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = BudgetError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationErrors::single("query", rejection.body_text()))?;
        Ok(Self(query.validate()?))
    }
}

/// Path parameters parsed as `T`, reported on `path` when they do not parse.
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = BudgetError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationErrors::single("path", rejection.body_text()))?;
        Ok(Self(value))
    }
}
