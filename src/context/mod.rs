//! Graphics-context primitive API, the recording context, and a reference device.

pub(crate) mod recording;
pub(crate) mod state;
pub(crate) mod trace;

use crate::buffer::images::ImageEntry;
use crate::foundation::core::Rect;
use crate::foundation::error::GbufResult;

/// Primitive entry points of a live renderer.
///
/// Capture drives a [`DrawTarget`] and logs the same calls; playback drives one from a log.
/// Coordinates are in the target's window (user) space.
pub trait DrawTarget {
    /// Device size in pixels.
    fn resolution(&self) -> (f32, f32);
    /// Current window bounds.
    fn window(&self) -> Rect;
    /// Replace the window bounds.
    fn set_window(&mut self, window: Rect) -> GbufResult<()>;

    /// Move the pen.
    fn move_to(&mut self, x: f32, y: f32) -> GbufResult<()>;
    /// Draw from the pen to `(x, y)`.
    fn line_to(&mut self, x: f32, y: f32) -> GbufResult<()>;
    /// Draw a single point.
    fn point(&mut self, x: f32, y: f32) -> GbufResult<()>;
    /// Draw a line segment.
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()>;
    /// Draw a circle.
    fn circle(&mut self, x: f32, y: f32, r: f32, filled: bool) -> GbufResult<()>;
    /// Fill the rectangle between two corners.
    fn filled_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()>;
    /// Stroke an open polyline given as flat `x y` pairs.
    fn polyline(&mut self, coords: &[f32]) -> GbufResult<()>;
    /// Fill a polygon given as flat `x y` pairs.
    fn filled_poly(&mut self, coords: &[f32]) -> GbufResult<()>;
    /// Draw text anchored at `(x, y)` using the current font, orientation and justification.
    fn draw_text(&mut self, x: f32, y: f32, text: &str) -> GbufResult<()>;

    /// Select a font.
    fn set_font(&mut self, name: &str, size: f32) -> GbufResult<()>;
    /// Set the foreground color.
    fn set_color(&mut self, color: i32) -> GbufResult<()>;
    /// Set the background color.
    fn set_background(&mut self, color: i32) -> GbufResult<()>;
    /// Set the line style.
    fn set_line_style(&mut self, style: i32) -> GbufResult<()>;
    /// Set the line width.
    fn set_line_width(&mut self, width: i32) -> GbufResult<()>;
    /// Set the text orientation in degrees.
    fn set_orientation(&mut self, degrees: i32) -> GbufResult<()>;
    /// Set the text justification.
    fn set_justification(&mut self, just: i32) -> GbufResult<()>;
    /// Clip subsequent drawing to a rectangle.
    fn set_clip_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()>;
    /// Push the drawing attributes.
    fn gsave(&mut self) -> GbufResult<()>;
    /// Pop the drawing attributes.
    fn grestore(&mut self) -> GbufResult<()>;

    /// Draw a raster image into `dest`.
    fn place_image(&mut self, image: &ImageEntry, dest: Rect) -> GbufResult<()>;

    /// Open a group of related primitives.
    fn begin_group(&mut self, _id: i32) -> GbufResult<()> {
        Ok(())
    }

    /// Close the innermost group.
    fn end_group(&mut self) -> GbufResult<()> {
        Ok(())
    }

    /// Insert a literal PostScript fragment. Most devices ignore it.
    fn ps_ref(&mut self, _x: f32, _y: f32, _text: &str) -> GbufResult<()> {
        Ok(())
    }
}
