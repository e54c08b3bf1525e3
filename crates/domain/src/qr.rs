// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! QR payload and image reference.
//!
//! The payload is a JSON snapshot of the ticket at issuance. Rendering is
//! delegated to an external image service; only its URL is built here.

use crate::error::DomainError;
use crate::types::Money;
use serde::{Deserialize, Serialize};

/// Default external renderer.
pub const DEFAULT_QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Default rendered edge length in pixels.
pub const DEFAULT_QR_SIZE: u16 = 200;

/// Snapshot encoded into a ticket's QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    pub ticket_number: String,
    pub passenger_name: String,
    pub seat_number: String,
    pub trip_id: i64,
    pub route: String,
    /// ISO 8601 calendar date.
    pub trip_date: String,
    pub total_fare: Money,
    /// RFC 3339 timestamp.
    pub issued_at: String,
}

impl QrPayload {
    /// Serializes the payload to the compact JSON stored on the ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::QrPayloadError(e.to_string()))
    }
}

/// Builds the URL of a rendered QR image for a stored payload.
#[must_use]
pub fn qr_image_url(service_url: &str, size: u16, payload_json: &str) -> String {
    let separator: char = if service_url.contains('?') { '&' } else { '?' };
    format!(
        "{service_url}{separator}size={size}x{size}&data={}",
        urlencoding::encode(payload_json)
    )
}
