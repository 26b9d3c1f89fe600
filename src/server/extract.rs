use crate::error::CellhubError;
use axum::{
    Form,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Form body extractor whose rejection renders as a 422 `{"detail": ...}`.
///
/// Missing fields and non-integer ids end up here rather than in the handlers.
pub struct ValidForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = CellhubError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(ValidForm(value)),
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "form rejected");
                Err(rejection.into())
            }
        }
    }
}

/// Path parameter extractor whose rejection renders as a 422 `{"detail": ...}`.
pub struct ValidPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = CellhubError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ValidPath(value)),
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "path rejected");
                Err(rejection.into())
            }
        }
    }
}
