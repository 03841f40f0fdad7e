// thumbsmith/src/strategy/mod.rs
//
// The transform step catalog. Steps are plain data: a tagged enum built by
// the constructors below and interpreted against the raster backend by the
// pipeline executor. Every resize-family constructor takes an optional
// quality preset and falls back to the general-purpose default.

use crate::geometry::{Anchor, CanonicalRect, RectSpec};

/// Resampling kernel used when scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleKernel {
    Nearest,
    Cubic,
    Lanczos2,
    Lanczos3,
}

/// Interpolation method paired with the kernel. Passed through to the
/// raster backend unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    Bicubic,
    Nohalo,
}

/// A paired kernel/interpolation choice for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityPreset {
    pub kernel: ResampleKernel,
    pub interpolation: Interpolation,
}

impl QualityPreset {
    /// General-purpose default used whenever a step omits the preset.
    pub const DEFAULT: Self = Self {
        kernel: ResampleKernel::Lanczos2,
        interpolation: Interpolation::Bicubic,
    };
    pub const NEAREST: Self = Self {
        kernel: ResampleKernel::Nearest,
        interpolation: Interpolation::Nearest,
    };
    pub const CUBIC: Self = Self {
        kernel: ResampleKernel::Cubic,
        interpolation: Interpolation::Bicubic,
    };
    pub const BEST: Self = Self {
        kernel: ResampleKernel::Lanczos3,
        interpolation: Interpolation::Nohalo,
    };
}

impl Default for QualityPreset {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// RGBA fill used by embed padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl FillColor {
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    pub const TRANSPARENT: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 0,
    };
}

/// Target encoding format. Fixed list; both paths force the named format
/// regardless of the source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeFormat {
    Jpeg,
    Png,
}

impl EncodeFormat {
    pub fn extension(self) -> &'static str {
        match self {
            EncodeFormat::Jpeg => "jpg",
            EncodeFormat::Png => "png",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(EncodeFormat::Jpeg),
            "png" => Some(EncodeFormat::Png),
            _ => None,
        }
    }

    /// jpeg quality 95 / png compression 8 when the caller gives none.
    pub fn default_level(self) -> u8 {
        match self {
            EncodeFormat::Jpeg => 95,
            EncodeFormat::Png => 8,
        }
    }

    /// Clamp an encode parameter into the format's legal range. Out-of-range
    /// values are clamped, not rejected.
    pub fn clamp_level(self, level: u8) -> u8 {
        match self {
            EncodeFormat::Jpeg => level.clamp(1, 100),
            EncodeFormat::Png => level.clamp(1, 9),
        }
    }
}

/// A rotation snapped to a quarter turn, kept in `[0, 360)`.
///
/// A zero rotation is still a step: "rotate by 0" appears in the pipeline
/// (and applies as identity) whereas "no rotation requested" produces no
/// step at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(u16);

impl Rotation {
    /// Normalize into `[0, 360)` and round to the nearest quarter turn.
    pub fn from_degrees(degrees: i64) -> Self {
        let normalized = degrees.rem_euclid(360) as f64;
        let snapped = ((normalized / 90.0).round() as u16 * 90) % 360;
        Rotation(snapped)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    pub fn is_identity(self) -> bool {
        self.0 == 0
    }
}

/// Outcome of an extract request.
///
/// `Invalid` records that a region was asked for but its spec was
/// under-determined; the step then applies as identity. The lenient
/// skip is deliberate and kept distinguishable from not requesting an
/// extraction in the first place (which yields no step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractRegion {
    Region(CanonicalRect),
    Invalid,
}

/// One transform applied to a working image. Pure data; executed in order
/// by the pipeline, each step consuming the previous step's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformStep {
    /// Resize to cover the box, then crop at the anchor. Exact `w x h` out.
    Crop {
        width: u32,
        height: u32,
        anchor: Anchor,
        quality: QualityPreset,
    },
    /// Aspect-preserving resize inside the box. Result may be smaller.
    Fit {
        width: u32,
        height: u32,
        quality: QualityPreset,
    },
    /// Resize to exactly `w x h`, ignoring aspect ratio.
    Stretch {
        width: u32,
        height: u32,
        quality: QualityPreset,
    },
    /// Fit inside the box, then pad with the fill color to exact `w x h`.
    Embed {
        width: u32,
        height: u32,
        fill: FillColor,
        quality: QualityPreset,
    },
    /// Cut a region out of the working image.
    Extract(ExtractRegion),
    /// Quarter-turn rotation.
    Rotate(Rotation),
    /// Force the output encoding. Only the last encode step in a pipeline
    /// takes effect, matching "last format call wins" chaining.
    Encode { format: EncodeFormat, level: u8 },
}

impl TransformStep {
    pub fn crop(anchor: Anchor, width: u32, height: u32, quality: Option<QualityPreset>) -> Self {
        TransformStep::Crop {
            width,
            height,
            anchor,
            quality: quality.unwrap_or_default(),
        }
    }

    pub fn fit(width: u32, height: u32, quality: Option<QualityPreset>) -> Self {
        TransformStep::Fit {
            width,
            height,
            quality: quality.unwrap_or_default(),
        }
    }

    pub fn stretch(width: u32, height: u32, quality: Option<QualityPreset>) -> Self {
        TransformStep::Stretch {
            width,
            height,
            quality: quality.unwrap_or_default(),
        }
    }

    pub fn embed(fill: FillColor, width: u32, height: u32, quality: Option<QualityPreset>) -> Self {
        TransformStep::Embed {
            width,
            height,
            fill,
            quality: quality.unwrap_or_default(),
        }
    }

    /// Build an extract step from a flexible rectangle spec. Never fails:
    /// an under-determined spec produces an identity step.
    pub fn extract(spec: &RectSpec) -> Self {
        match spec.resolve() {
            Ok(rect) => TransformStep::Extract(ExtractRegion::Region(rect)),
            Err(err) => {
                log::debug!("skipping extraction, {err}");
                TransformStep::Extract(ExtractRegion::Invalid)
            }
        }
    }

    pub fn rotate(degrees: i64) -> Self {
        TransformStep::Rotate(Rotation::from_degrees(degrees))
    }

    pub fn jpeg(quality: u8) -> Self {
        TransformStep::Encode {
            format: EncodeFormat::Jpeg,
            level: EncodeFormat::Jpeg.clamp_level(quality),
        }
    }

    pub fn png(compression: u8) -> Self {
        TransformStep::Encode {
            format: EncodeFormat::Png,
            level: EncodeFormat::Png.clamp_level(compression),
        }
    }

    /// True for steps that leave the working image untouched.
    pub fn is_identity(&self) -> bool {
        match self {
            TransformStep::Extract(ExtractRegion::Invalid) => true,
            TransformStep::Rotate(rotation) => rotation.is_identity(),
            _ => false,
        }
    }
}
