//! Replays a log against a live [`DrawTarget`].

use std::time::{Duration, Instant};

use crate::buffer::images::ImageTable;
use crate::context::DrawTarget;
use crate::context::state::window_for;
use crate::foundation::core::{ImageId, Point, Rect};
use crate::foundation::error::{GbufError, GbufResult};
use crate::record::Record;
use crate::record::reader::decode_all;

/// Options for [`play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOpts {
    pub(crate) honor_timestamps: bool,
}

impl Default for PlaybackOpts {
    fn default() -> Self {
        Self {
            honor_timestamps: true,
        }
    }
}

impl PlaybackOpts {
    /// Return options that do (or do not) sleep to reproduce recorded timing.
    pub fn with_timestamps(mut self, honor: bool) -> Self {
        self.honor_timestamps = honor;
        self
    }
}

/// Summary of a completed playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Records applied to the target.
    pub records: usize,
    /// Image records skipped because their id was not in the image table.
    pub skipped_images: usize,
}

/// Replay `bytes` against `target`.
///
/// The whole log is decoded before anything is applied, so a decode error leaves the target
/// untouched. The target's window is restored afterwards whether or not playback succeeds.
#[tracing::instrument(skip_all, fields(len = bytes.len()))]
pub fn play<T: DrawTarget + ?Sized>(
    bytes: &[u8],
    images: &ImageTable,
    target: &mut T,
    opts: PlaybackOpts,
) -> GbufResult<PlaybackStats> {
    let events = decode_all(bytes)?;

    let saved_window = target.window();
    let started = Instant::now();
    let mut pen = Point::ZERO;
    let mut stats = PlaybackStats::default();

    let mut run = || -> GbufResult<()> {
        for ev in &events {
            if opts.honor_timestamps
                && let Some(stamp) = ev.stamp
            {
                wait_until(started, stamp);
            }
            match dispatch(target, &ev.record, images, pen) {
                Ok(()) => stats.records += 1,
                Err(GbufError::MissingImage(id)) => {
                    tracing::debug!(offset = ev.offset, image = id.0, "skipping missing image");
                    stats.skipped_images += 1;
                }
                Err(e) => return Err(e),
            }
            if let Record::MoveTo(p) | Record::LineTo(p) | Record::Point(p) = &ev.record {
                pen = (*p).into();
            }
        }
        Ok(())
    };
    let res = run();

    target.set_window(saved_window)?;
    res.map(|()| stats)
}

fn wait_until(started: Instant, stamp_ms: i32) {
    let Ok(ms) = u64::try_from(stamp_ms) else {
        return;
    };
    let due = Duration::from_millis(ms);
    let elapsed = started.elapsed();
    if due > elapsed {
        std::thread::sleep(due - elapsed);
    }
}

/// Invoke the primitive that corresponds to one record.
///
/// Image records draw at the pen position; an id missing from `images` yields
/// [`GbufError::MissingImage`] without touching the target.
pub(crate) fn dispatch<T: DrawTarget + ?Sized>(
    target: &mut T,
    rec: &Record,
    images: &ImageTable,
    pen: Point,
) -> GbufResult<()> {
    match rec {
        Record::Header { width, height, .. } => target.set_window(window_for(*width, *height)),
        Record::MoveTo(p) => target.move_to(p.x, p.y),
        Record::LineTo(p) => target.line_to(p.x, p.y),
        Record::Point(p) => target.point(p.x, p.y),
        Record::Line(q) => target.line(q.x0, q.y0, q.x1, q.y1),
        Record::Clip(q) => target.set_clip_rect(q.x0, q.y0, q.x1, q.y1),
        Record::Circle(q) => target.circle(q.x0, q.y0, q.x1, q.y1 != 0.0),
        Record::FilledRect(q) => target.filled_rect(q.x0, q.y0, q.x1, q.y1),
        Record::Image(q) => {
            // Ids that are not a whole non-negative number can never be in the table.
            let id = q
                .image_id()
                .ok_or(GbufError::MissingImage(ImageId(u32::MAX)))?;
            let entry = images.get(id)?;
            let dest = Rect::new(
                pen.x,
                pen.y,
                pen.x + f64::from(q.x1),
                pen.y + f64::from(q.y1),
            );
            target.place_image(entry, dest)
        }
        Record::Color(v) => target.set_color(*v),
        Record::Background(v) => target.set_background(*v),
        Record::LineStyle(v) => target.set_line_style(*v),
        Record::LineWidth(v) => target.set_line_width(*v),
        Record::Orientation(v) => target.set_orientation(*v),
        Record::Justification(v) => target.set_justification(*v),
        Record::Group(0) => target.end_group(),
        Record::Group(v) => target.begin_group(*v),
        Record::Save(0) => target.grestore(),
        Record::Save(_) => target.gsave(),
        Record::Timestamp(_) => Ok(()),
        Record::Font { size, name } => target.set_font(name, *size),
        Record::Text { x, y, text } => target.draw_text(*x, *y, text),
        Record::PsRef { x, y, text } => target.ps_ref(*x, *y, text),
        Record::Poly(v) => target.polyline(v),
        Record::FilledPoly(v) => target.filled_poly(v),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/mod.rs"]
mod tests;
