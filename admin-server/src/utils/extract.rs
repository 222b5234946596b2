//! Request body extractor with the unified error envelope

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, FromRequest, Json, Request};
use http::header::CONTENT_TYPE;
use shared::{AppError, ErrorCode};

/// Request body decoded from JSON or from `application/x-www-form-urlencoded`
///
/// Rejections become an [`AppError`] (400, `InvalidFormat`). Form values are
/// flat strings; nested documents need JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            return match Form::<T>::from_request(req, state).await {
                Ok(Form(value)) => Ok(AppJson(value)),
                Err(rejection) => Err(AppError::with_message(
                    ErrorCode::InvalidFormat,
                    rejection.body_text(),
                )),
            };
        }

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                rejection.body_text(),
            )),
        }
    }
}
