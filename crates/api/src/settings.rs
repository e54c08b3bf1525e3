// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vantrip_domain::{DEFAULT_QR_SERVICE_URL, DEFAULT_QR_SIZE, qr_image_url};

/// Where ticket QR images are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrSettings {
    /// Base URL of the QR rendering service.
    pub service_url: String,
    /// Edge length of the rendered image in pixels.
    pub size: u16,
}

impl QrSettings {
    /// Returns the image URL that renders `payload_json`.
    #[must_use]
    pub fn image_url(&self, payload_json: &str) -> String {
        qr_image_url(&self.service_url, self.size, payload_json)
    }
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_QR_SERVICE_URL.to_string(),
            size: DEFAULT_QR_SIZE,
        }
    }
}
