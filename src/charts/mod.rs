//! Chart renderers.
//!
//! Reports hand their tables to one of the renderers here and get back a
//! [`ChartPayload`]. The route layer returns the payload as JSON without
//! caring which kind it is.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use crate::error::ReportError;

pub mod declarative;
pub mod raster;

// ---

/// Serialized, renderer-specific form of a report table.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPayload {
    /// Encoded image. Sent as `{"image": <base64>, "mime": ..}`.
    Image { mime: &'static str, bytes: Vec<u8> },
    /// Declarative chart description, sent verbatim.
    DeclarativeSpec(Value),
}

impl ChartPayload {
    pub fn to_json(&self) -> Value {
        match self {
            ChartPayload::Image { mime, bytes } => json!({
                "image": STANDARD.encode(bytes),
                "mime": mime,
            }),
            ChartPayload::DeclarativeSpec(spec) => spec.clone(),
        }
    }
}

impl IntoResponse for ChartPayload {
    fn into_response(self) -> Response {
        match self {
            ChartPayload::DeclarativeSpec(spec) => Json(spec).into_response(),
            image => Json(image.to_json()).into_response(),
        }
    }
}

pub(crate) fn render_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_image_payload_is_base64() {
        // ---
        let payload = ChartPayload::Image {
            mime: "image/svg+xml",
            bytes: b"<svg/>".to_vec(),
        };
        let value = payload.to_json();

        assert_eq!(value["mime"], "image/svg+xml");
        let decoded = STANDARD.decode(value["image"].as_str().unwrap()).unwrap();
        assert_eq!(decoded, b"<svg/>");
    }

    #[test]
    fn test_declarative_payload_is_verbatim() {
        // ---
        let spec = json!({"mark": "bar", "data": {"values": []}});
        assert_eq!(ChartPayload::DeclarativeSpec(spec.clone()).to_json(), spec);
    }
}
