// thumbsmith/src/geometry/rect.rs
use std::fmt;
use thiserror::Error;

/// Axis that failed to resolve. Carried by [`ResolutionError`] so callers
/// can log which half of the rectangle was under-determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// The rectangle parameters do not pin down both axes. This is a
/// recoverable condition: extraction treats it as "no region", never as
/// a run failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rectangle is under-determined on the {axis} axis")]
pub struct ResolutionError {
    pub axis: Axis,
}

/// A rectangle given in any of several interchangeable parameterizations.
///
/// Accepted aliases for the same logical field:
/// - left   = x1 = x
/// - top    = y1 = y
/// - right  = x2
/// - bottom = y2
///
/// Each axis must be determined by two coordinates, or by one coordinate
/// plus the matching extent. When multiple aliases are present, the more
/// specific name wins (`left` over `x1` over `x`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RectSpec {
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub x1: Option<u32>,
    pub y1: Option<u32>,
    pub x2: Option<u32>,
    pub y2: Option<u32>,
    pub left: Option<u32>,
    pub top: Option<u32>,
    pub right: Option<u32>,
    pub bottom: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl RectSpec {
    /// True when no field is set at all, i.e. no extraction was requested.
    /// Distinct from an under-determined spec, which sets some fields but
    /// still fails to resolve.
    pub fn is_empty(&self) -> bool {
        *self == RectSpec::default()
    }

    /// Normalize into a canonical `{left, top, width, height}` rectangle.
    pub fn resolve(&self) -> Result<CanonicalRect, ResolutionError> {
        let (left, width) = resolve_axis(
            self.left.or(self.x1).or(self.x),
            self.right.or(self.x2),
            self.width,
        )
        .ok_or(ResolutionError {
            axis: Axis::Horizontal,
        })?;

        let (top, height) = resolve_axis(
            self.top.or(self.y1).or(self.y),
            self.bottom.or(self.y2),
            self.height,
        )
        .ok_or(ResolutionError {
            axis: Axis::Vertical,
        })?;

        Ok(CanonicalRect {
            left,
            top,
            width,
            height,
        })
    }
}

/// One axis of the resolution algorithm. Returns `(origin, extent)`.
///
/// - both coordinates known: swap if inverted, extent defaults to the span
///   unless a non-zero extent was given explicitly
/// - far coordinate plus extent: origin is derived backwards
/// - near coordinate plus extent: taken as-is
/// - anything else: under-determined
fn resolve_axis(lo: Option<u32>, hi: Option<u32>, extent: Option<u32>) -> Option<(u32, u32)> {
    match (lo, hi, extent) {
        (Some(lo), Some(hi), ext) => {
            let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
            Some((lo, ext.filter(|&e| e != 0).unwrap_or(hi - lo)))
        }
        (None, Some(hi), Some(ext)) => Some((hi.saturating_sub(ext), ext)),
        (Some(lo), None, Some(ext)) => Some((lo, ext)),
        _ => None,
    }
}

/// Canonical rectangle. Derived once from a [`RectSpec`]; whether it lies
/// within the source image is checked later at the raster boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: u32, top: u32, width: u32, height: u32) -> CanonicalRect {
        CanonicalRect {
            left,
            top,
            width,
            height,
        }
    }

    #[test]
    fn two_points_resolve() {
        let spec = RectSpec {
            x: Some(0),
            y: Some(0),
            x2: Some(100),
            y2: Some(50),
            ..Default::default()
        };
        assert_eq!(spec.resolve().unwrap(), rect(0, 0, 100, 50));
    }

    #[test]
    fn far_corner_plus_extent_resolves_backwards() {
        let spec = RectSpec {
            right: Some(100),
            width: Some(40),
            bottom: Some(80),
            height: Some(30),
            ..Default::default()
        };
        assert_eq!(spec.resolve().unwrap(), rect(60, 50, 40, 30));
    }

    #[test]
    fn origin_plus_extent_resolves_directly() {
        let spec = RectSpec {
            left: Some(10),
            top: Some(20),
            width: Some(30),
            height: Some(40),
            ..Default::default()
        };
        assert_eq!(spec.resolve().unwrap(), rect(10, 20, 30, 40));
    }

    #[test]
    fn alias_combinations_match_canonical_form() {
        let canonical = RectSpec {
            left: Some(5),
            top: Some(6),
            width: Some(10),
            height: Some(12),
            ..Default::default()
        };
        let via_points = RectSpec {
            x1: Some(5),
            y1: Some(6),
            x2: Some(15),
            y2: Some(18),
            ..Default::default()
        };
        let via_generic = RectSpec {
            x: Some(5),
            y: Some(6),
            width: Some(10),
            height: Some(12),
            ..Default::default()
        };
        let expected = canonical.resolve().unwrap();
        assert_eq!(via_points.resolve().unwrap(), expected);
        assert_eq!(via_generic.resolve().unwrap(), expected);
    }

    #[test]
    fn specific_alias_wins_over_generic() {
        let spec = RectSpec {
            x: Some(99),
            left: Some(1),
            width: Some(10),
            y: Some(99),
            top: Some(2),
            height: Some(10),
            ..Default::default()
        };
        assert_eq!(spec.resolve().unwrap(), rect(1, 2, 10, 10));
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let spec = RectSpec {
            left: Some(100),
            right: Some(40),
            top: Some(80),
            bottom: Some(20),
            ..Default::default()
        };
        assert_eq!(spec.resolve().unwrap(), rect(40, 20, 60, 60));
    }

    #[test]
    fn explicit_extent_beats_derived_span() {
        let spec = RectSpec {
            left: Some(0),
            right: Some(100),
            width: Some(25),
            top: Some(0),
            bottom: Some(100),
            height: Some(25),
            ..Default::default()
        };
        assert_eq!(spec.resolve().unwrap(), rect(0, 0, 25, 25));
    }

    #[test]
    fn empty_spec_is_under_determined() {
        let spec = RectSpec::default();
        assert!(spec.is_empty());
        let err = spec.resolve().unwrap_err();
        assert_eq!(err.axis, Axis::Horizontal);
    }

    #[test]
    fn missing_vertical_axis_fails_vertically() {
        let spec = RectSpec {
            left: Some(0),
            width: Some(10),
            top: Some(5),
            ..Default::default()
        };
        let err = spec.resolve().unwrap_err();
        assert_eq!(err.axis, Axis::Vertical);
        assert!(!spec.is_empty());
    }
}
