// thumbsmith/src/ops/mod.rs
//! Raster operation boundary.
//!
//! [`ImageOps`] is the seam between the declarative transform model and
//! actual pixel work. The production implementation is [`RasterOps`],
//! backed by the `image` crate (plus `oxipng` for PNG output). Everything
//! above this trait is backend-agnostic, which also keeps the scheduler
//! testable against a recording mock.

mod raster;

pub use raster::RasterOps;

use crate::core::Result;
use crate::geometry::{Anchor, CanonicalRect};
use crate::strategy::{EncodeFormat, FillColor, QualityPreset, Rotation};
use image::DynamicImage;

/// How a resize maps the source onto the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Aspect-preserving, covers the whole box; one axis may overshoot.
    Cover,
    /// Aspect-preserving, fits inside the box; result may be smaller.
    Within,
    /// Exactly the requested dimensions, aspect ratio ignored.
    Exact,
}

/// Pixel-level capabilities consumed by the pipeline executor.
///
/// Operations take the working image by reference and return a new handle;
/// callers own their working handles exclusively and the shared decoded
/// source is never mutated. Invalid geometry fails with
/// [`ThumbError::ImageOp`](crate::ThumbError::ImageOp), which the scheduler
/// surfaces as a single task's failure.
pub trait ImageOps: Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage>;

    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        mode: ResizeMode,
        quality: QualityPreset,
    ) -> Result<DynamicImage>;

    /// Crop an oversized image down to `width x height`, keeping the part
    /// selected by the anchor.
    fn crop_to_anchor(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        anchor: Anchor,
    ) -> Result<DynamicImage>;

    /// Center the image on a `width x height` canvas filled with `fill`.
    fn pad_to_size(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        fill: FillColor,
    ) -> Result<DynamicImage>;

    fn extract_rect(&self, image: &DynamicImage, rect: CanonicalRect) -> Result<DynamicImage>;

    fn rotate(&self, image: &DynamicImage, rotation: Rotation) -> Result<DynamicImage>;

    fn encode(&self, image: &DynamicImage, format: EncodeFormat, level: u8) -> Result<Vec<u8>>;
}
