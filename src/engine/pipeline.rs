// thumbsmith/src/engine/pipeline.rs
use crate::core::Result;
use crate::geometry::RectSpec;
use crate::ops::{ImageOps, ResizeMode};
use crate::strategy::{EncodeFormat, ExtractRegion, TransformStep};
use image::DynamicImage;

/// Pre-transform shared by every variant in a run: an optional extract
/// region and an optional rotation. Applied exactly once to the shared
/// source before fan-out.
#[derive(Debug, Clone, Default)]
pub struct GlobalTransform {
    /// `None` means no extraction was requested; a present but
    /// under-determined spec is kept distinct and becomes a lenient
    /// identity step.
    pub extract: Option<RectSpec>,
    /// Degrees; snapped to quarter turns at build time. Zero means no
    /// rotation was requested.
    pub rotation: i64,
}

impl GlobalTransform {
    pub fn is_noop(&self) -> bool {
        self.steps().is_empty()
    }

    /// Materialize the shared pre-steps: extraction first, rotation second.
    pub fn steps(&self) -> Vec<TransformStep> {
        let mut pre = Vec::new();
        if let Some(spec) = &self.extract {
            if !spec.is_empty() {
                pre.push(TransformStep::extract(spec));
            }
        }
        if self.rotation != 0 {
            pre.push(TransformStep::rotate(self.rotation));
        }
        pre
    }
}

/// Assemble the full step list for one variant: shared pre-steps, then the
/// variant's own steps in declared order.
pub fn build(global: &GlobalTransform, spec_steps: &[TransformStep]) -> Vec<TransformStep> {
    let mut steps = global.steps();
    steps.extend_from_slice(spec_steps);
    steps
}

/// Apply the geometric steps of a pipeline, threading the working image
/// through each one. Encode steps are recorded, not applied; the last one
/// wins, matching format-call chaining.
pub fn apply_geometry(
    ops: &dyn ImageOps,
    source: &DynamicImage,
    steps: &[TransformStep],
) -> Result<(DynamicImage, Option<(EncodeFormat, u8)>)> {
    let mut working = source.clone();
    let mut encode = None;

    for step in steps {
        working = match *step {
            TransformStep::Crop {
                width,
                height,
                anchor,
                quality,
            } => {
                let covered = ops.resize(&working, width, height, ResizeMode::Cover, quality)?;
                ops.crop_to_anchor(&covered, width, height, anchor)?
            }
            TransformStep::Fit {
                width,
                height,
                quality,
            } => ops.resize(&working, width, height, ResizeMode::Within, quality)?,
            TransformStep::Stretch {
                width,
                height,
                quality,
            } => ops.resize(&working, width, height, ResizeMode::Exact, quality)?,
            TransformStep::Embed {
                width,
                height,
                fill,
                quality,
            } => {
                let fitted = ops.resize(&working, width, height, ResizeMode::Within, quality)?;
                ops.pad_to_size(&fitted, width, height, fill)?
            }
            TransformStep::Extract(ExtractRegion::Region(rect)) => {
                ops.extract_rect(&working, rect)?
            }
            // Lenient skip: the extraction was requested with an
            // under-determined rectangle.
            TransformStep::Extract(ExtractRegion::Invalid) => working,
            TransformStep::Rotate(rotation) if rotation.is_identity() => working,
            TransformStep::Rotate(rotation) => ops.rotate(&working, rotation)?,
            TransformStep::Encode { format, level } => {
                encode = Some((format, level));
                working
            }
        };
    }

    Ok((working, encode))
}

/// Run a full pipeline to encoded bytes. `fallback` supplies the output
/// format when no encode step was declared (derived from the output file
/// extension by the caller).
pub fn execute(
    ops: &dyn ImageOps,
    source: &DynamicImage,
    steps: &[TransformStep],
    fallback: EncodeFormat,
) -> Result<Vec<u8>> {
    let (image, encode) = apply_geometry(ops, source, steps)?;
    let (format, level) = encode.unwrap_or((fallback, fallback.default_level()));
    ops.encode(&image, format, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Anchor;
    use crate::ops::RasterOps;
    use crate::strategy::{FillColor, QualityPreset};
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 130, 140, 255]),
        ))
    }

    #[test]
    fn global_steps_come_first_extract_before_rotate() {
        let global = GlobalTransform {
            extract: Some(RectSpec {
                left: Some(0),
                top: Some(0),
                width: Some(8),
                height: Some(8),
                ..Default::default()
            }),
            rotation: 90,
        };
        let per_spec = [TransformStep::fit(4, 4, None)];
        let steps = build(&global, &per_spec);

        assert_eq!(steps.len(), 3);
        assert!(matches!(
            steps[0],
            TransformStep::Extract(ExtractRegion::Region(_))
        ));
        assert!(matches!(steps[1], TransformStep::Rotate(_)));
        assert_eq!(steps[2], per_spec[0]);
    }

    #[test]
    fn unrequested_global_transform_adds_nothing() {
        let global = GlobalTransform::default();
        assert!(global.is_noop());
        assert_eq!(build(&global, &[]).len(), 0);
    }

    #[test]
    fn empty_extract_spec_is_not_a_request() {
        // `Some(empty)` mirrors configuring an empty coordinate table:
        // nothing to do, so no step, not even a lenient identity one.
        let global = GlobalTransform {
            extract: Some(RectSpec::default()),
            rotation: 0,
        };
        assert!(global.is_noop());
    }

    #[test]
    fn invalid_extract_step_leaves_image_unchanged() {
        let ops = RasterOps::new();
        let source = solid(10, 6);
        let steps = [TransformStep::extract(&RectSpec {
            left: Some(1),
            ..Default::default()
        })];
        let (out, encode) = apply_geometry(&ops, &source, &steps).unwrap();
        assert_eq!((out.width(), out.height()), (10, 6));
        assert!(encode.is_none());
    }

    #[test]
    fn crop_produces_exact_dimensions() {
        let ops = RasterOps::new();
        let source = solid(64, 48);
        let steps = [TransformStep::crop(Anchor::Center, 20, 10, None)];
        let (out, _) = apply_geometry(&ops, &source, &steps).unwrap();
        assert_eq!((out.width(), out.height()), (20, 10));
    }

    #[test]
    fn embed_pads_to_exact_dimensions() {
        let ops = RasterOps::new();
        let source = solid(64, 16);
        let steps = [TransformStep::embed(FillColor::BLACK, 32, 32, None)];
        let (out, _) = apply_geometry(&ops, &source, &steps).unwrap();
        assert_eq!((out.width(), out.height()), (32, 32));
        // Fitted content is 32x8, so the top row is fill.
        assert_eq!(out.to_rgba8().get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn last_encode_step_wins() {
        let ops = RasterOps::new();
        let source = solid(8, 8);
        let steps = [
            TransformStep::png(5),
            TransformStep::fit(4, 4, Some(QualityPreset::NEAREST)),
            TransformStep::jpeg(80),
        ];
        let (_, encode) = apply_geometry(&ops, &source, &steps).unwrap();
        assert_eq!(encode, Some((EncodeFormat::Jpeg, 80)));
    }

    #[test]
    fn execute_falls_back_to_the_callers_format() {
        let ops = RasterOps::new();
        let source = solid(8, 8);
        let bytes = execute(
            &ops,
            &source,
            &[TransformStep::stretch(4, 6, None)],
            EncodeFormat::Png,
        )
        .unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn step_failure_propagates() {
        let ops = RasterOps::new();
        let source = solid(8, 8);
        let steps = [TransformStep::extract(&RectSpec {
            left: Some(0),
            top: Some(0),
            width: Some(100),
            height: Some(100),
            ..Default::default()
        })];
        assert!(apply_geometry(&ops, &source, &steps).is_err());
    }
}
