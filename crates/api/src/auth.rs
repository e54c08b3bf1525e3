// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin identity.
//!
//! Authentication happens upstream: a trusted proxy forwards the login of
//! the signed-in administrator in a request header. This module only turns
//! that value into an [`AuthenticatedAdmin`] or refuses it.

use crate::error::AuthError;

/// An administrator identified by the upstream identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    login: String,
}

impl AuthenticatedAdmin {
    /// Builds an admin identity from the forwarded identity value.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw header value, if the header was present
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the value is absent or blank.
    pub fn from_identity(value: Option<&str>) -> Result<Self, AuthError> {
        let login: &str = value.map(str::trim).unwrap_or_default();
        if login.is_empty() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("no authenticated administrator identity"),
            });
        }
        Ok(Self {
            login: login.to_string(),
        })
    }

    /// The administrator's login as forwarded by the identity provider.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }
}
