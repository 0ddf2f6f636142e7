//! Tagged records of the event log and their binary codec.
//!
//! Every record is one opcode byte followed by the fixed payload of its [`OpClass`], and for the
//! two variadic classes a run of trailing bytes whose length is declared in the payload.

pub(crate) mod codec;
pub(crate) mod order;
pub(crate) mod reader;

use crate::foundation::core::{Pt, Quad};

/// Record tag byte.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// Format version and device resolution.
    Header = 0,
    /// Move the pen.
    MoveTo = 1,
    /// Draw from the pen to a point.
    LineTo = 2,
    /// Single point.
    Point = 3,
    /// Standalone line segment.
    Line = 4,
    /// Clip rectangle.
    Clip = 5,
    /// Circle, outlined or filled.
    Circle = 6,
    /// Filled rectangle.
    FilledRect = 7,
    /// Raster image placed at the pen.
    Image = 8,
    /// Foreground color.
    Color = 9,
    /// Background color.
    Background = 10,
    /// Line style.
    LineStyle = 11,
    /// Line width.
    LineWidth = 12,
    /// Text orientation.
    Orientation = 13,
    /// Text justification.
    Justification = 14,
    /// Group open/close.
    Group = 15,
    /// Graphics state save/restore.
    Save = 16,
    /// Timestamp mode switch.
    Timestamp = 17,
    /// Font name and size.
    Font = 18,
    /// Text string.
    Text = 19,
    /// Literal PostScript fragment.
    PsRef = 20,
    /// Open polyline.
    Poly = 21,
    /// Filled polygon.
    FilledPoly = 22,
}

impl Opcode {
    /// All opcodes in tag order.
    pub const ALL: [Opcode; 23] = [
        Opcode::Header,
        Opcode::MoveTo,
        Opcode::LineTo,
        Opcode::Point,
        Opcode::Line,
        Opcode::Clip,
        Opcode::Circle,
        Opcode::FilledRect,
        Opcode::Image,
        Opcode::Color,
        Opcode::Background,
        Opcode::LineStyle,
        Opcode::LineWidth,
        Opcode::Orientation,
        Opcode::Justification,
        Opcode::Group,
        Opcode::Save,
        Opcode::Timestamp,
        Opcode::Font,
        Opcode::Text,
        Opcode::PsRef,
        Opcode::Poly,
        Opcode::FilledPoly,
    ];

    /// Decode a tag byte.
    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Payload shape of this opcode.
    pub fn class(self) -> OpClass {
        match self {
            Opcode::Header => OpClass::Header,
            Opcode::MoveTo | Opcode::LineTo | Opcode::Point => OpClass::Point,
            Opcode::Line | Opcode::Clip | Opcode::Circle | Opcode::FilledRect | Opcode::Image => {
                OpClass::Line
            }
            Opcode::Color
            | Opcode::Background
            | Opcode::LineStyle
            | Opcode::LineWidth
            | Opcode::Orientation
            | Opcode::Justification
            | Opcode::Group
            | Opcode::Save
            | Opcode::Timestamp => OpClass::Attr,
            Opcode::Font | Opcode::Text | Opcode::PsRef => OpClass::Text,
            Opcode::Poly | Opcode::FilledPoly => OpClass::PointList,
        }
    }

    /// Command name used by the text backends.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Header => "setwindow",
            Opcode::MoveTo => "moveto",
            Opcode::LineTo => "lineto",
            Opcode::Point => "point",
            Opcode::Line => "line",
            Opcode::Clip => "setcliprect",
            Opcode::Circle => "circle",
            Opcode::FilledRect => "filledrect",
            Opcode::Image => "image",
            Opcode::Color => "setcolor",
            Opcode::Background => "setbackground",
            Opcode::LineStyle => "setlinestyle",
            Opcode::LineWidth => "setlinewidth",
            Opcode::Orientation => "setorientation",
            Opcode::Justification => "setjustification",
            Opcode::Group => "group",
            Opcode::Save => "gsave",
            Opcode::Timestamp => "timestamp",
            Opcode::Font => "setfont",
            Opcode::Text => "text",
            Opcode::PsRef => "psref",
            Opcode::Poly => "polyline",
            Opcode::FilledPoly => "filledpoly",
        }
    }
}

/// Payload layout shared by a family of opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    /// `version:f32, width:f32, height:f32`.
    Header,
    /// `x:f32, y:f32`.
    Point,
    /// `x0:f32, y0:f32, x1:f32, y1:f32`.
    Line,
    /// `value:i32`.
    Attr,
    /// `x:f32, y:f32, length:i32` then `length` bytes.
    Text,
    /// `count:i32` then `count` f32 values.
    PointList,
}

impl OpClass {
    /// Size of the fixed payload in bytes, excluding the tag byte.
    pub const fn fixed_size(self) -> usize {
        match self {
            OpClass::Header => 12,
            OpClass::Point => 8,
            OpClass::Line => 16,
            OpClass::Attr => 4,
            OpClass::Text => 12,
            OpClass::PointList => 4,
        }
    }
}

/// One decoded entry of the event log.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// Format version and device resolution.
    Header {
        /// Version sentinel, [`crate::FORMAT_VERSION`] when written by this crate.
        version: f32,
        /// Device width in pixels.
        width: f32,
        /// Device height in pixels.
        height: f32,
    },
    /// Move the pen.
    MoveTo(Pt),
    /// Draw from the pen to a point.
    LineTo(Pt),
    /// Single point.
    Point(Pt),
    /// Line segment between two corners.
    Line(Quad),
    /// Clip rectangle.
    Clip(Quad),
    /// Circle as `(cx, cy, radius, fill)` where `fill` is `1.0` for filled circles.
    Circle(Quad),
    /// Filled rectangle between two corners.
    FilledRect(Quad),
    /// Image as `(id, reserved, width, height)`, placed with its lower-left corner at the pen.
    Image(Quad),
    /// Foreground color value.
    Color(i32),
    /// Background color value.
    Background(i32),
    /// Line style value.
    LineStyle(i32),
    /// Line width.
    LineWidth(i32),
    /// Text rotation in degrees.
    Orientation(i32),
    /// Text justification value.
    Justification(i32),
    /// Non-zero opens a group, zero closes the innermost one.
    Group(i32),
    /// Non-zero saves the graphics state, zero restores it.
    Save(i32),
    /// Non-zero enables timestamp prefixes for the following records, zero disables them.
    Timestamp(i32),
    /// Font selection.
    ///
    /// The wire form has a reserved second coordinate that is written as 0 and ignored on decode,
    /// so a non-zero value from another producer is not preserved.
    Font {
        /// Font size.
        size: f32,
        /// Font name.
        name: String,
    },
    /// Text drawn at a position.
    Text {
        /// Anchor x.
        x: f32,
        /// Anchor y.
        y: f32,
        /// String contents.
        text: String,
    },
    /// Literal PostScript fragment anchored at a position.
    PsRef {
        /// Anchor x.
        x: f32,
        /// Anchor y.
        y: f32,
        /// Fragment contents.
        text: String,
    },
    /// Open polyline as flat `x y` pairs.
    Poly(Vec<f32>),
    /// Filled polygon as flat `x y` pairs.
    FilledPoly(Vec<f32>),
}

impl Record {
    /// Build a header record carrying the current format version.
    pub fn header(width: f32, height: f32) -> Self {
        Record::Header {
            version: crate::foundation::core::FORMAT_VERSION,
            width,
            height,
        }
    }

    /// Tag of this record.
    pub fn opcode(&self) -> Opcode {
        match self {
            Record::Header { .. } => Opcode::Header,
            Record::MoveTo(_) => Opcode::MoveTo,
            Record::LineTo(_) => Opcode::LineTo,
            Record::Point(_) => Opcode::Point,
            Record::Line(_) => Opcode::Line,
            Record::Clip(_) => Opcode::Clip,
            Record::Circle(_) => Opcode::Circle,
            Record::FilledRect(_) => Opcode::FilledRect,
            Record::Image(_) => Opcode::Image,
            Record::Color(_) => Opcode::Color,
            Record::Background(_) => Opcode::Background,
            Record::LineStyle(_) => Opcode::LineStyle,
            Record::LineWidth(_) => Opcode::LineWidth,
            Record::Orientation(_) => Opcode::Orientation,
            Record::Justification(_) => Opcode::Justification,
            Record::Group(_) => Opcode::Group,
            Record::Save(_) => Opcode::Save,
            Record::Timestamp(_) => Opcode::Timestamp,
            Record::Font { .. } => Opcode::Font,
            Record::Text { .. } => Opcode::Text,
            Record::PsRef { .. } => Opcode::PsRef,
            Record::Poly(_) => Opcode::Poly,
            Record::FilledPoly(_) => Opcode::FilledPoly,
        }
    }

    /// Records that put marks on the output.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            Record::Line(_)
                | Record::Circle(_)
                | Record::FilledRect(_)
                | Record::Poly(_)
                | Record::FilledPoly(_)
                | Record::Text { .. }
                | Record::Image(_)
        )
    }

    /// Records that only change tracked drawing state.
    ///
    /// Group, save and timestamp records are deliberately excluded.
    pub fn is_state_change(&self) -> bool {
        matches!(
            self,
            Record::Color(_)
                | Record::Background(_)
                | Record::LineStyle(_)
                | Record::LineWidth(_)
                | Record::Orientation(_)
                | Record::Justification(_)
                | Record::Font { .. }
                | Record::Clip(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/mod.rs"]
mod tests;
