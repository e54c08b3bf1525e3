// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON request bodies.
//!
//! [`ApiJson`] wraps axum's `Json` extractor so a body that fails to parse
//! or does not match the request type is answered with the same JSON error
//! shape as every other rejected request.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::HttpError;

/// A JSON request body of type `T`.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(body_error(&rejection)),
        }
    }
}

/// Malformed or mistyped bodies are the client's fault and answer 400.
/// Transport failures keep the status axum assigns them.
fn body_error(rejection: &JsonRejection) -> HttpError {
    let status: StatusCode = match rejection {
        JsonRejection::JsonDataError(_)
        | JsonRejection::JsonSyntaxError(_)
        | JsonRejection::MissingJsonContentType(_) => StatusCode::BAD_REQUEST,
        _ => rejection.status(),
    };
    warn!(status = status.as_u16(), error = %rejection.body_text(), "Request body rejected");
    HttpError {
        status,
        message: rejection.body_text(),
    }
}
