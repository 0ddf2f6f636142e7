use crate::foundation::core::{Point, Rect, justify, line_style};
use crate::record::Record;

/// Font selection.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Font name.
    pub name: String,
    /// Font size.
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            name: "Helvetica".to_string(),
            size: 12.0,
        }
    }
}

/// Drawing attributes that survive across primitives and are saved by `gsave`.
#[derive(Clone, Debug, PartialEq)]
pub struct Attrs {
    /// Foreground color value.
    pub color: i32,
    /// Background color value.
    pub background: i32,
    /// Line style value.
    pub line_style: i32,
    /// Line width.
    pub line_width: i32,
    /// Text rotation in degrees.
    pub orientation: i32,
    /// Text justification value.
    pub justification: i32,
    /// Current font.
    pub font: FontSpec,
    /// Clip rectangle; `None` clips to the window.
    pub clip: Option<Rect>,
}

impl Default for Attrs {
    fn default() -> Self {
        Self {
            color: 1,
            background: 0,
            line_style: line_style::SOLID,
            line_width: 1,
            orientation: 0,
            justification: justify::LEFT,
            font: FontSpec::default(),
            clip: None,
        }
    }
}

/// Tracked state of a graphics context.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsState {
    /// Current attributes.
    pub attrs: Attrs,
    /// Window bounds in user coordinates.
    pub window: Rect,
    /// Pen position set by the last move, line or point.
    pub pen: Point,
    saved: Vec<Attrs>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}

impl GraphicsState {
    /// Default state for a device of the given resolution.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            attrs: Attrs::default(),
            window: window_for(width, height),
            pen: Point::ZERO,
            saved: Vec::new(),
        }
    }

    /// Depth of the `gsave` stack.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Apply the state effect of one record.
    ///
    /// A restore with nothing saved is ignored.
    pub fn apply(&mut self, rec: &Record) {
        let a = &mut self.attrs;
        match rec {
            Record::Header { width, height, .. } => self.window = window_for(*width, *height),
            Record::MoveTo(p) | Record::LineTo(p) | Record::Point(p) => self.pen = (*p).into(),
            Record::Clip(q) => a.clip = Some(q.rect()),
            Record::Color(v) => a.color = *v,
            Record::Background(v) => a.background = *v,
            Record::LineStyle(v) => a.line_style = *v,
            Record::LineWidth(v) => a.line_width = *v,
            Record::Orientation(v) => a.orientation = *v,
            Record::Justification(v) => a.justification = *v,
            Record::Font { size, name } => {
                a.font = FontSpec {
                    name: name.clone(),
                    size: *size,
                }
            }
            Record::Save(v) if *v != 0 => self.saved.push(self.attrs.clone()),
            Record::Save(_) => {
                if let Some(prev) = self.saved.pop() {
                    self.attrs = prev;
                }
            }
            Record::Line(_)
            | Record::Circle(_)
            | Record::FilledRect(_)
            | Record::Image(_)
            | Record::Group(_)
            | Record::Timestamp(_)
            | Record::Text { .. }
            | Record::PsRef { .. }
            | Record::Poly(_)
            | Record::FilledPoly(_) => {}
        }
    }

    /// Records that reproduce the current attributes from scratch.
    ///
    /// Used as the self-describing prefix of a freshly reset log.
    pub fn prefix_records(&self) -> Vec<Record> {
        let a = &self.attrs;
        vec![
            Record::Font {
                size: a.font.size,
                name: a.font.name.clone(),
            },
            Record::Color(a.color),
            Record::LineStyle(a.line_style),
            Record::LineWidth(a.line_width),
            Record::Orientation(a.orientation),
            Record::Justification(a.justification),
        ]
    }
}

/// Window covering every pixel of a `width` x `height` device.
pub fn window_for(width: f32, height: f32) -> Rect {
    Rect::new(
        0.0,
        0.0,
        f64::from(width) - 1.0,
        f64::from(height) - 1.0,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/context/state.rs"]
mod tests;
