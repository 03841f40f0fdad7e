// thumbsmith/src/geometry/gravity.rs

/// Horizontal gravity axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical gravity axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// One of the 9 named crop anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    NorthWest,
    North,
    NorthEast,
    West,
    #[default]
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Anchor {
    /// Resolve a 2-axis gravity pair to its anchor.
    pub fn from_axes(horizontal: HAlign, vertical: VAlign) -> Self {
        match (vertical, horizontal) {
            (VAlign::Top, HAlign::Left) => Anchor::NorthWest,
            (VAlign::Top, HAlign::Center) => Anchor::North,
            (VAlign::Top, HAlign::Right) => Anchor::NorthEast,
            (VAlign::Middle, HAlign::Left) => Anchor::West,
            (VAlign::Middle, HAlign::Center) => Anchor::Center,
            (VAlign::Middle, HAlign::Right) => Anchor::East,
            (VAlign::Bottom, HAlign::Left) => Anchor::SouthWest,
            (VAlign::Bottom, HAlign::Center) => Anchor::South,
            (VAlign::Bottom, HAlign::Right) => Anchor::SouthEast,
        }
    }

    /// Decompose back into the gravity pair.
    pub fn axes(self) -> (HAlign, VAlign) {
        match self {
            Anchor::NorthWest => (HAlign::Left, VAlign::Top),
            Anchor::North => (HAlign::Center, VAlign::Top),
            Anchor::NorthEast => (HAlign::Right, VAlign::Top),
            Anchor::West => (HAlign::Left, VAlign::Middle),
            Anchor::Center => (HAlign::Center, VAlign::Middle),
            Anchor::East => (HAlign::Right, VAlign::Middle),
            Anchor::SouthWest => (HAlign::Left, VAlign::Bottom),
            Anchor::South => (HAlign::Center, VAlign::Bottom),
            Anchor::SouthEast => (HAlign::Right, VAlign::Bottom),
        }
    }

    /// Origin of an anchored `target`-sized crop inside a `source`-sized
    /// image. Assumes `source >= target` on both axes; the raster boundary
    /// rejects anything else before calling this.
    pub fn crop_origin(self, source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
        let (h, v) = self.axes();
        let slack_x = source.0.saturating_sub(target.0);
        let slack_y = source.1.saturating_sub(target.1);
        let x = match h {
            HAlign::Left => 0,
            HAlign::Center => slack_x / 2,
            HAlign::Right => slack_x,
        };
        let y = match v {
            VAlign::Top => 0,
            VAlign::Middle => slack_y / 2,
            VAlign::Bottom => slack_y,
        };
        (x, y)
    }
}

/// A 2-axis gravity pair. Both axis orders are accepted as construction
/// sugar and must agree: `GravitySelector::new(h, v)` and
/// `GravitySelector::v_major(v, h)` resolve to the same anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GravitySelector {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl GravitySelector {
    pub fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Vertical-axis-first spelling of [`GravitySelector::new`].
    pub fn v_major(vertical: VAlign, horizontal: HAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn anchor(self) -> Anchor {
        Anchor::from_axes(self.horizontal, self.vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HORIZONTALS: [HAlign; 3] = [HAlign::Left, HAlign::Center, HAlign::Right];
    const VERTICALS: [VAlign; 3] = [VAlign::Top, VAlign::Middle, VAlign::Bottom];

    #[test]
    fn matrix_is_symmetric_under_axis_order() {
        for h in HORIZONTALS {
            for v in VERTICALS {
                assert_eq!(
                    GravitySelector::new(h, v).anchor(),
                    GravitySelector::v_major(v, h).anchor(),
                    "axis order must not matter for ({h:?}, {v:?})"
                );
            }
        }
    }

    #[test]
    fn all_nine_anchors_are_distinct() {
        let mut seen = Vec::new();
        for h in HORIZONTALS {
            for v in VERTICALS {
                let anchor = Anchor::from_axes(h, v);
                assert!(!seen.contains(&anchor));
                seen.push(anchor);
            }
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn axes_round_trip() {
        for h in HORIZONTALS {
            for v in VERTICALS {
                let anchor = Anchor::from_axes(h, v);
                assert_eq!(anchor.axes(), (h, v));
            }
        }
    }

    #[test]
    fn default_selector_is_center() {
        assert_eq!(GravitySelector::default().anchor(), Anchor::Center);
    }

    #[test]
    fn crop_origin_per_corner() {
        let source = (100, 60);
        let target = (40, 20);
        assert_eq!(Anchor::NorthWest.crop_origin(source, target), (0, 0));
        assert_eq!(Anchor::Center.crop_origin(source, target), (30, 20));
        assert_eq!(Anchor::SouthEast.crop_origin(source, target), (60, 40));
        assert_eq!(Anchor::West.crop_origin(source, target), (0, 20));
        assert_eq!(Anchor::South.crop_origin(source, target), (30, 40));
    }
}
