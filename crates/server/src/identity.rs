// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin identity extraction.
//!
//! The upstream proxy authenticates administrators and forwards their login
//! in a configurable header. Admin routes take [`AdminIdentity`] as an
//! extractor, so a request without the header never reaches a handler.

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use vantrip_api::AuthenticatedAdmin;

use crate::{AppState, HttpError};

/// The administrator making the request.
pub struct AdminIdentity(pub AuthenticatedAdmin);

impl FromRequestParts<AppState> for AdminIdentity {
    type Rejection = IdentityError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value: Option<&str> = parts
            .headers
            .get(&state.identity_header)
            .map(HeaderValue::to_str)
            .transpose()
            .map_err(|_| {
                warn!(header = %state.identity_header, "Identity header is not valid text");
                IdentityError::InvalidHeader
            })?;

        let admin: AuthenticatedAdmin = AuthenticatedAdmin::from_identity(value).map_err(|e| {
            debug!(header = %state.identity_header, "No admin identity on request");
            IdentityError::Missing(e.to_string())
        })?;

        debug!(login = admin.login(), "Admin identity accepted");
        Ok(Self(admin))
    }
}

/// Why an admin request was refused.
#[derive(Debug)]
pub enum IdentityError {
    /// The header is absent or blank.
    Missing(String),
    /// The header holds bytes that are not visible ASCII.
    InvalidHeader,
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::Missing(reason) => reason,
            Self::InvalidHeader => String::from("Identity header is not valid text"),
        };
        HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}
