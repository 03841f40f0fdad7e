mod cli;
mod core;
mod engine;
mod geometry;
mod ops;
mod strategy;
mod utils;

pub use cli::{Cli, Commands, GenerateArgs};
pub use core::{Result, RunConfig, ThumbError};
pub use engine::pipeline;
pub use engine::{BatchResult, BatchScheduler, GlobalTransform, TaskOutcome, TaskReport, ThumbnailSpec};
pub use geometry::{
    Anchor, Axis, CanonicalRect, GravitySelector, HAlign, RectSpec, ResolutionError, VAlign,
};
pub use ops::{ImageOps, RasterOps, ResizeMode};
pub use strategy::{
    EncodeFormat, ExtractRegion, FillColor, Interpolation, QualityPreset, ResampleKernel, Rotation,
    TransformStep,
};
pub use utils::{format_file_size, get_image_info, replace_extension};

pub mod prelude {
    pub use crate::{
        Anchor, BatchResult, BatchScheduler, GlobalTransform, GravitySelector, ImageOps,
        QualityPreset, RasterOps, RectSpec, RunConfig, ThumbnailSpec, TransformStep,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
