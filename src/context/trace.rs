use crate::buffer::images::ImageEntry;
use crate::context::DrawTarget;
use crate::context::state::GraphicsState;
use crate::foundation::core::{Pt, Quad, Rect};
use crate::foundation::error::GbufResult;
use crate::record::Record;

/// Reference device that logs every primitive call and tracks the resulting state.
///
/// Useful for tests and for inspecting what a playback would do without rendering.
#[derive(Clone, Debug)]
pub struct TraceDevice {
    width: f32,
    height: f32,
    state: GraphicsState,
    calls: Vec<String>,
}

impl TraceDevice {
    /// Create a device of the given resolution.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            state: GraphicsState::new(width, height),
            calls: Vec::new(),
        }
    }

    /// Calls received so far, one formatted line each.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Forget recorded calls, keeping the state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// State after the calls received so far.
    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    fn note(&mut self, call: String, rec: Option<Record>) -> GbufResult<()> {
        if let Some(rec) = rec {
            self.state.apply(&rec);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl DrawTarget for TraceDevice {
    fn resolution(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn window(&self) -> Rect {
        self.state.window
    }

    fn set_window(&mut self, window: Rect) -> GbufResult<()> {
        self.state.window = window;
        self.note(
            format!(
                "set_window {} {} {} {}",
                window.x0, window.y0, window.x1, window.y1
            ),
            None,
        )
    }

    fn move_to(&mut self, x: f32, y: f32) -> GbufResult<()> {
        self.note(format!("move_to {x} {y}"), Some(Record::MoveTo(Pt::new(x, y))))
    }

    fn line_to(&mut self, x: f32, y: f32) -> GbufResult<()> {
        self.note(format!("line_to {x} {y}"), Some(Record::LineTo(Pt::new(x, y))))
    }

    fn point(&mut self, x: f32, y: f32) -> GbufResult<()> {
        self.note(format!("point {x} {y}"), Some(Record::Point(Pt::new(x, y))))
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()> {
        self.note(format!("line {x0} {y0} {x1} {y1}"), None)
    }

    fn circle(&mut self, x: f32, y: f32, r: f32, filled: bool) -> GbufResult<()> {
        self.note(format!("circle {x} {y} {r} {filled}"), None)
    }

    fn filled_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()> {
        self.note(format!("filled_rect {x0} {y0} {x1} {y1}"), None)
    }

    fn polyline(&mut self, coords: &[f32]) -> GbufResult<()> {
        self.note(format!("polyline {coords:?}"), None)
    }

    fn filled_poly(&mut self, coords: &[f32]) -> GbufResult<()> {
        self.note(format!("filled_poly {coords:?}"), None)
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) -> GbufResult<()> {
        self.note(format!("draw_text {x} {y} {text:?}"), None)
    }

    fn set_font(&mut self, name: &str, size: f32) -> GbufResult<()> {
        self.note(
            format!("set_font {name:?} {size}"),
            Some(Record::Font {
                size,
                name: name.to_string(),
            }),
        )
    }

    fn set_color(&mut self, color: i32) -> GbufResult<()> {
        self.note(format!("set_color {color}"), Some(Record::Color(color)))
    }

    fn set_background(&mut self, color: i32) -> GbufResult<()> {
        self.note(format!("set_background {color}"), Some(Record::Background(color)))
    }

    fn set_line_style(&mut self, style: i32) -> GbufResult<()> {
        self.note(format!("set_line_style {style}"), Some(Record::LineStyle(style)))
    }

    fn set_line_width(&mut self, width: i32) -> GbufResult<()> {
        self.note(format!("set_line_width {width}"), Some(Record::LineWidth(width)))
    }

    fn set_orientation(&mut self, degrees: i32) -> GbufResult<()> {
        self.note(
            format!("set_orientation {degrees}"),
            Some(Record::Orientation(degrees)),
        )
    }

    fn set_justification(&mut self, just: i32) -> GbufResult<()> {
        self.note(
            format!("set_justification {just}"),
            Some(Record::Justification(just)),
        )
    }

    fn set_clip_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()> {
        self.note(
            format!("set_clip_rect {x0} {y0} {x1} {y1}"),
            Some(Record::Clip(Quad::new(x0, y0, x1, y1))),
        )
    }

    fn gsave(&mut self) -> GbufResult<()> {
        self.note("gsave".to_string(), Some(Record::Save(1)))
    }

    fn grestore(&mut self) -> GbufResult<()> {
        self.note("grestore".to_string(), Some(Record::Save(0)))
    }

    fn place_image(&mut self, image: &ImageEntry, dest: Rect) -> GbufResult<()> {
        self.note(
            format!(
                "place_image {}x{}x{} at {} {} {} {}",
                image.width, image.height, image.depth, dest.x0, dest.y0, dest.x1, dest.y1
            ),
            None,
        )
    }

    fn begin_group(&mut self, id: i32) -> GbufResult<()> {
        self.note(format!("begin_group {id}"), None)
    }

    fn end_group(&mut self) -> GbufResult<()> {
        self.note("end_group".to_string(), None)
    }

    fn ps_ref(&mut self, x: f32, y: f32, text: &str) -> GbufResult<()> {
        self.note(format!("ps_ref {x} {y} {text:?}"), None)
    }
}
