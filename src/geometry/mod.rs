// thumbsmith/src/geometry/mod.rs
mod gravity;
mod rect;

pub use gravity::{Anchor, GravitySelector, HAlign, VAlign};
pub use rect::{Axis, CanonicalRect, RectSpec, ResolutionError};
