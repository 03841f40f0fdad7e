// thumbsmith/src/core/mod.rs
use crate::engine::{GlobalTransform, ThumbnailSpec};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image operation failed: {0}")]
    ImageOp(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),
}

pub type Result<T> = std::result::Result<T, ThumbError>;

/// Everything one batch run needs, built up-front and passed in explicitly.
/// There is no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Source image, decoded once and shared across all pipelines.
    pub source: PathBuf,
    /// Pre-transform applied to the shared source before fan-out.
    pub global: GlobalTransform,
    /// One entry per thumbnail variant.
    pub specs: Vec<ThumbnailSpec>,
    /// Upper bound on tasks in flight. Zero means the default bound.
    pub max_concurrency: usize,
}

impl RunConfig {
    pub const DEFAULT_CONCURRENCY: usize = 8;

    pub fn new(source: PathBuf, specs: Vec<ThumbnailSpec>) -> Self {
        Self {
            source,
            global: GlobalTransform::default(),
            specs,
            max_concurrency: Self::DEFAULT_CONCURRENCY,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.specs.is_empty() {
            return Err(ThumbError::InvalidParameter(
                "At least one thumbnail spec is required".to_string(),
            ));
        }

        if self.max_concurrency > 512 {
            return Err(ThumbError::InvalidParameter(
                "Concurrency bound too large (max 512)".to_string(),
            ));
        }

        for spec in &self.specs {
            spec.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::TransformStep;

    #[test]
    fn empty_spec_list_is_rejected() {
        let config = RunConfig::new(PathBuf::from("image.png"), vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_concurrency_is_eight() {
        let spec = ThumbnailSpec::new("thumbs/t", vec![TransformStep::fit(10, 10, None)]);
        let config = RunConfig::new(PathBuf::from("image.png"), vec![spec]);
        assert_eq!(config.max_concurrency, 8);
        assert!(config.validate().is_ok());
    }
}
