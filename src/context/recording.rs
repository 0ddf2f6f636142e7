use std::path::Path;

use crate::buffer::event_buffer::{EventBuffer, RecorderOpts};
use crate::buffer::images::{ImageData, ImageEntry};
use crate::clean::pass::clean;
use crate::context::DrawTarget;
use crate::context::state::GraphicsState;
use crate::foundation::core::{ImageId, Point, Pt, Quad, Rect};
use crate::foundation::error::{GbufError, GbufResult};
use crate::playback::{PlaybackOpts, PlaybackStats, play};
use crate::record::Record;

/// A graphics context that draws on a device and logs every primitive into its own event buffer.
///
/// The context is the only owner of its buffer; all mutation goes through `&mut self`.
#[derive(Debug)]
pub struct Context<D: DrawTarget> {
    device: D,
    state: GraphicsState,
    buffer: EventBuffer,
    replaying: bool,
}

impl<D: DrawTarget> Context<D> {
    /// Wrap `device` and start recording.
    ///
    /// The log begins with a header for the device resolution and the default attributes.
    pub fn new(device: D, opts: RecorderOpts) -> GbufResult<Self> {
        let (w, h) = device.resolution();
        let mut ctx = Self {
            state: GraphicsState::new(w, h),
            buffer: EventBuffer::new(opts, w, h)?,
            device,
            replaying: false,
        };
        ctx.record_prefix()?;
        Ok(ctx)
    }

    /// Clear the log and the image table, then re-record the current attributes.
    #[tracing::instrument(skip(self))]
    pub fn reset_recording(&mut self) -> GbufResult<()> {
        let (w, h) = self.device.resolution();
        self.buffer.reset(w, h)?;
        self.record_prefix()
    }

    fn record_prefix(&mut self) -> GbufResult<()> {
        if !self.buffer.is_recording() {
            return Ok(());
        }
        for rec in self.state.prefix_records() {
            self.buffer.append(&rec)?;
        }
        Ok(())
    }

    /// Resume logging.
    pub fn enable_recording(&mut self) {
        self.buffer.enable();
    }

    /// Stop logging; drawing still reaches the device.
    pub fn disable_recording(&mut self) {
        self.buffer.disable();
    }

    /// `true` when primitives are being logged.
    pub fn is_recording(&self) -> bool {
        self.buffer.is_recording() && !self.replaying
    }

    /// Turn timestamp prefixes on or off for subsequently recorded primitives.
    pub fn set_timestamps(&mut self, on: bool) -> GbufResult<()> {
        self.log(Record::Timestamp(i32::from(on)))
    }

    /// The event buffer.
    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    /// Tracked state.
    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    /// The wrapped device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The wrapped device, mutably. Calls made directly on it are not logged.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Tear the context down, returning the device and the log.
    pub fn into_parts(self) -> (D, EventBuffer) {
        (self.device, self.buffer)
    }

    /// Copy pixels into the image table.
    pub fn add_image(&mut self, data: ImageData<'_>) -> GbufResult<ImageId> {
        self.buffer.add_image(data)
    }

    /// Look up an image.
    pub fn find_image(&self, id: ImageId) -> Option<&ImageEntry> {
        self.buffer.find_image(id)
    }

    /// Replace an image's pixels; records that refer to `id` draw the new pixels on replay.
    pub fn replace_image(&mut self, id: ImageId, data: ImageData<'_>) -> GbufResult<()> {
        self.buffer.replace_image(id, data)
    }

    /// Draw image `id` with its lower-left corner at the pen, scaled to `width` x `height`.
    pub fn draw_image(&mut self, id: ImageId, width: f32, height: f32) -> GbufResult<()> {
        if self.buffer.find_image(id).is_none() {
            return Err(GbufError::MissingImage(id));
        }
        self.log(Record::Image(Quad::new(id.0 as f32, 0.0, width, height)))?;
        let pen = self.state.pen;
        let dest = Rect::new(
            pen.x,
            pen.y,
            pen.x + f64::from(width),
            pen.y + f64::from(height),
        );
        let entry = self.buffer.images().get(id)?;
        self.device.place_image(entry, dest)
    }

    /// Rewrite the log with redundant records removed.
    ///
    /// The log is only replaced when the rewrite succeeds.
    pub fn clean(&mut self) -> GbufResult<()> {
        let mut fresh = clean(self.buffer.bytes(), self.buffer.opts())?;
        if !self.buffer.is_recording() {
            fresh.disable();
        }
        self.buffer.hand_images_to(&mut fresh);
        self.buffer = fresh;
        Ok(())
    }

    /// Replay this context's own log onto its device without logging it again.
    pub fn redraw(&mut self, opts: PlaybackOpts) -> GbufResult<PlaybackStats> {
        let buffer = std::mem::take(&mut self.buffer);
        self.replaying = true;
        let res = play(buffer.bytes(), buffer.images(), self, opts);
        self.replaying = false;
        self.buffer = buffer;
        res
    }

    /// Write the raw log to `path`.
    pub fn save_log(&self, path: impl AsRef<Path>) -> GbufResult<()> {
        self.buffer.save(path)
    }

    /// Replace the log with one read from `path`, keeping the current image table.
    pub fn load_log(&mut self, path: impl AsRef<Path>) -> GbufResult<()> {
        let mut loaded = EventBuffer::load(path, self.buffer.opts())?;
        if !self.buffer.is_recording() {
            loaded.disable();
        }
        self.buffer.hand_images_to(&mut loaded);
        self.buffer = loaded;
        Ok(())
    }

    fn log(&mut self, rec: Record) -> GbufResult<()> {
        self.state.apply(&rec);
        if self.is_recording() {
            self.buffer.append(&rec)?;
        }
        Ok(())
    }
}

impl<D: DrawTarget> DrawTarget for Context<D> {
    fn resolution(&self) -> (f32, f32) {
        self.device.resolution()
    }

    fn window(&self) -> Rect {
        self.state.window
    }

    fn set_window(&mut self, window: Rect) -> GbufResult<()> {
        self.state.window = window;
        self.device.set_window(window)
    }

    fn move_to(&mut self, x: f32, y: f32) -> GbufResult<()> {
        self.log(Record::MoveTo(Pt::new(x, y)))?;
        self.device.move_to(x, y)
    }

    fn line_to(&mut self, x: f32, y: f32) -> GbufResult<()> {
        self.log(Record::LineTo(Pt::new(x, y)))?;
        self.device.line_to(x, y)
    }

    fn point(&mut self, x: f32, y: f32) -> GbufResult<()> {
        self.log(Record::Point(Pt::new(x, y)))?;
        self.device.point(x, y)
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()> {
        self.log(Record::Line(Quad::new(x0, y0, x1, y1)))?;
        self.device.line(x0, y0, x1, y1)
    }

    fn circle(&mut self, x: f32, y: f32, r: f32, filled: bool) -> GbufResult<()> {
        let fill = if filled { 1.0 } else { 0.0 };
        self.log(Record::Circle(Quad::new(x, y, r, fill)))?;
        self.device.circle(x, y, r, filled)
    }

    fn filled_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()> {
        self.log(Record::FilledRect(Quad::new(x0, y0, x1, y1)))?;
        self.device.filled_rect(x0, y0, x1, y1)
    }

    fn polyline(&mut self, coords: &[f32]) -> GbufResult<()> {
        check_pairs(coords)?;
        self.log(Record::Poly(coords.to_vec()))?;
        self.device.polyline(coords)
    }

    fn filled_poly(&mut self, coords: &[f32]) -> GbufResult<()> {
        check_pairs(coords)?;
        self.log(Record::FilledPoly(coords.to_vec()))?;
        self.device.filled_poly(coords)
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) -> GbufResult<()> {
        self.log(Record::Text {
            x,
            y,
            text: text.to_string(),
        })?;
        self.device.draw_text(x, y, text)
    }

    fn set_font(&mut self, name: &str, size: f32) -> GbufResult<()> {
        self.log(Record::Font {
            size,
            name: name.to_string(),
        })?;
        self.device.set_font(name, size)
    }

    fn set_color(&mut self, color: i32) -> GbufResult<()> {
        self.log(Record::Color(color))?;
        self.device.set_color(color)
    }

    fn set_background(&mut self, color: i32) -> GbufResult<()> {
        self.log(Record::Background(color))?;
        self.device.set_background(color)
    }

    fn set_line_style(&mut self, style: i32) -> GbufResult<()> {
        self.log(Record::LineStyle(style))?;
        self.device.set_line_style(style)
    }

    fn set_line_width(&mut self, width: i32) -> GbufResult<()> {
        self.log(Record::LineWidth(width))?;
        self.device.set_line_width(width)
    }

    fn set_orientation(&mut self, degrees: i32) -> GbufResult<()> {
        self.log(Record::Orientation(degrees))?;
        self.device.set_orientation(degrees)
    }

    fn set_justification(&mut self, just: i32) -> GbufResult<()> {
        self.log(Record::Justification(just))?;
        self.device.set_justification(just)
    }

    fn set_clip_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> GbufResult<()> {
        self.log(Record::Clip(Quad::new(x0, y0, x1, y1)))?;
        self.device.set_clip_rect(x0, y0, x1, y1)
    }

    fn gsave(&mut self) -> GbufResult<()> {
        self.log(Record::Save(1))?;
        self.device.gsave()
    }

    fn grestore(&mut self) -> GbufResult<()> {
        self.log(Record::Save(0))?;
        self.device.grestore()
    }

    /// Draws `image` into `dest`.
    ///
    /// While recording, the pixels are copied into this context's image table so the log stays
    /// self-contained, and a move to the destination corner is logged when the pen is elsewhere.
    fn place_image(&mut self, image: &ImageEntry, dest: Rect) -> GbufResult<()> {
        if self.is_recording() {
            let id = self.buffer.add_image(ImageData {
                width: image.width,
                height: image.height,
                depth: image.depth,
                pixels: &image.pixels,
            })?;
            let corner = Point::new(dest.x0, dest.y0);
            if self.state.pen != corner {
                self.log(Record::MoveTo(Pt::new(dest.x0 as f32, dest.y0 as f32)))?;
            }
            self.log(Record::Image(Quad::new(
                id.0 as f32,
                0.0,
                dest.width() as f32,
                dest.height() as f32,
            )))?;
        }
        self.device.place_image(image, dest)
    }

    fn begin_group(&mut self, id: i32) -> GbufResult<()> {
        if id == 0 {
            return Err(GbufError::validation("group ids must be non-zero"));
        }
        self.log(Record::Group(id))?;
        self.device.begin_group(id)
    }

    fn end_group(&mut self) -> GbufResult<()> {
        self.log(Record::Group(0))?;
        self.device.end_group()
    }

    fn ps_ref(&mut self, x: f32, y: f32, text: &str) -> GbufResult<()> {
        self.log(Record::PsRef {
            x,
            y,
            text: text.to_string(),
        })?;
        self.device.ps_ref(x, y, text)
    }
}

fn check_pairs(coords: &[f32]) -> GbufResult<()> {
    if coords.len() % 2 != 0 {
        return Err(GbufError::validation(
            "point lists must hold whole x/y pairs",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/context/recording.rs"]
mod tests;
