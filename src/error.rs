//! Structured error types for tablix.
//!
//! The layout arithmetic itself never fails; these cover host input that can.

/// All errors that can occur while configuring or driving a tablix layout.
#[derive(Debug, thiserror::Error)]
pub enum TablixError {
    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Viewport with a non-finite or negative extent.
    #[error("Invalid viewport: {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    /// Device pixel ratio that is not a positive finite number.
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f64),

    /// JSON decoding error for configuration or host documents.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A resize event arrived while no resize gesture was active.
    #[error("No resize gesture in progress")]
    NoActiveResize,

    /// A resize gesture targeted a column that is not currently realized.
    #[error("Column {0} is not realized")]
    UnrealizedColumn(usize),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TablixError>;

impl From<String> for TablixError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for TablixError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TablixError> for wasm_bindgen::JsValue {
    fn from(e: TablixError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
