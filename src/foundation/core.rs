pub use kurbo::{Point, Rect};

/// Version sentinel written into every header record.
///
/// Readers compare the header's version field against this value bit for bit to detect the
/// producer's byte order.
pub const FORMAT_VERSION: f32 = 2.0;

/// Position of an entry in a buffer's image table.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ImageId(pub u32);

/// A single coordinate pair as stored in Point-class records.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pt {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Pt {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Pt> for Point {
    fn from(p: Pt) -> Self {
        Point::new(f64::from(p.x), f64::from(p.y))
    }
}

/// Four floats as stored in Line-class records.
///
/// The meaning of the fields depends on the opcode: two corners for lines, clips and filled
/// rectangles, `(cx, cy, r, fill)` for circles, and `(id, _, width, height)` for images.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    /// First x value.
    pub x0: f32,
    /// First y value.
    pub y0: f32,
    /// Second x value.
    pub x1: f32,
    /// Second y value.
    pub y1: f32,
}

impl Quad {
    /// Create a quad.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Normalized rectangle spanned by the two corners.
    pub fn rect(self) -> Rect {
        Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
        .abs()
    }

    /// Image id carried by an image record, if `x0` holds a usable index.
    pub fn image_id(self) -> Option<ImageId> {
        let v = self.x0;
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f32 {
            Some(ImageId(v as u32))
        } else {
            None
        }
    }
}

/// Line style values carried by `LineStyle` records.
pub mod line_style {
    /// Continuous line.
    pub const SOLID: i32 = 0;
    /// Long dashes.
    pub const DASHED: i32 = 1;
    /// Dots.
    pub const DOTTED: i32 = 2;
    /// Alternating dash and dot.
    pub const DASH_DOT: i32 = 3;

    /// Dash pattern (on/off lengths in device units) for a style value.
    ///
    /// Unknown styles draw solid.
    pub fn dash_pattern(style: i32) -> &'static [f32] {
        match style {
            DASHED => &[6.0, 3.0],
            DOTTED => &[1.0, 3.0],
            DASH_DOT => &[6.0, 3.0, 1.0, 3.0],
            _ => &[],
        }
    }
}

/// Text justification values carried by `Justification` records.
pub mod justify {
    /// Anchor at the start of the string.
    pub const LEFT: i32 = 0;
    /// Anchor at the middle of the string.
    pub const CENTER: i32 = 1;
    /// Anchor at the end of the string.
    pub const RIGHT: i32 = 2;
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
