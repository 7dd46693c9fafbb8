use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed with status {0}")]
    Status(u16),
    #[error("catalog response is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog request failed: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dock size must be at least one pixel, got {0}")]
    InvalidSize(u32),
    #[error("dock margin must be a non-negative number, got {0}")]
    InvalidMargin(f64),
    #[error("invalid widget options: {0}")]
    Parse(#[from] serde_json::Error),
}
