use std::path::Path;
use std::time::{Duration, Instant};

use crate::buffer::images::{ImageData, ImageEntry, ImageTable};
use crate::foundation::core::ImageId;
use crate::foundation::error::{GbufError, GbufResult};
use crate::record::codec;
use crate::record::order::ByteOrder;
use crate::record::reader::{RecordReader, stamping_after};
use crate::record::{Opcode, Record};

/// Default growth step of an event buffer, in bytes.
pub const DEFAULT_GROW_INCREMENT: usize = 4096;

/// Options for recording into an [`EventBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderOpts {
    pub(crate) grow_increment: usize,
    pub(crate) byte_order: ByteOrder,
}

impl Default for RecorderOpts {
    fn default() -> Self {
        Self {
            grow_increment: DEFAULT_GROW_INCREMENT,
            byte_order: ByteOrder::native(),
        }
    }
}

impl RecorderOpts {
    /// Return options with a different growth step (at least one byte).
    pub fn with_grow_increment(mut self, bytes: usize) -> Self {
        self.grow_increment = bytes.max(1);
        self
    }

    /// Return options that write fields in `order` instead of native order.
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Growth step in bytes.
    pub fn grow_increment(&self) -> usize {
        self.grow_increment
    }

    /// Byte order used for written fields.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

/// Append-only event log plus the image table its image records refer to.
///
/// The written bytes always form a complete sequence of records: a record is encoded in full
/// before any of it is committed.
#[derive(Debug, Default)]
pub struct EventBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    opts: RecorderOpts,
    images: ImageTable,
    recording: bool,
    empty: bool,
    stamping: bool,
    stamp_origin: Option<Instant>,
}

impl EventBuffer {
    /// Create a recording buffer whose header carries the device resolution.
    pub fn new(opts: RecorderOpts, width: f32, height: f32) -> GbufResult<Self> {
        let mut buf = Self::blank(opts);
        buf.reset(width, height)?;
        Ok(buf)
    }

    /// Recording buffer holding no records at all, not even a header.
    pub(crate) fn blank(opts: RecorderOpts) -> Self {
        Self {
            opts,
            recording: true,
            empty: true,
            ..Self::default()
        }
    }

    /// Wrap an existing log, checking that it decodes completely.
    ///
    /// Records appended later are written in the byte order the log ends in, so a foreign log
    /// stays readable; `opts` only decides the order of a log without a header. The timestamp
    /// clock resumes from the last stamp found in `bytes`.
    ///
    /// The image table starts empty; image records in `bytes` resolve against images added later.
    pub fn from_bytes(bytes: Vec<u8>, opts: RecorderOpts) -> GbufResult<Self> {
        let mut stamping = false;
        let mut empty = true;
        let mut headed = false;
        let mut last_stamp = None;
        let mut reader = RecordReader::new(&bytes);
        for ev in reader.by_ref() {
            let ev = ev?;
            stamping = stamping_after(&ev.record, stamping);
            empty &= !marks_output(&ev.record);
            headed |= matches!(ev.record, Record::Header { .. });
            last_stamp = ev.stamp.or(last_stamp);
        }
        let opts = if headed {
            opts.with_byte_order(reader.order())
        } else {
            opts
        };
        if opts.byte_order != ByteOrder::native() {
            tracing::debug!(order = ?opts.byte_order, "appending in foreign byte order");
        }
        let stamp_origin = last_stamp
            .map(origin_for)
            .or_else(|| stamping.then(Instant::now));
        let capacity = bytes.len();
        Ok(Self {
            bytes,
            capacity,
            opts,
            images: ImageTable::new(),
            recording: true,
            empty,
            stamping,
            stamp_origin,
        })
    }

    /// Load a raw log written by [`EventBuffer::save`].
    pub fn load(path: impl AsRef<Path>, opts: RecorderOpts) -> GbufResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes, opts)
    }

    /// Write the raw log bytes. Images are not part of the file.
    pub fn save(&self, path: impl AsRef<Path>) -> GbufResult<()> {
        std::fs::write(path.as_ref(), self.bytes())?;
        Ok(())
    }

    /// Discard every record and image, then write a fresh header.
    ///
    /// Recording stays enabled or disabled as it was; timestamp prefixes are switched off.
    pub fn reset(&mut self, width: f32, height: f32) -> GbufResult<()> {
        self.bytes.clear();
        self.images.clear();
        self.empty = true;
        self.stamping = false;
        self.stamp_origin = None;
        self.push(&Record::header(width, height), None)
    }

    /// Resume logging primitive calls.
    pub fn enable(&mut self) {
        self.recording = true;
    }

    /// Stop logging primitive calls; the existing log is kept.
    pub fn disable(&mut self) {
        self.recording = false;
    }

    /// `true` when primitive calls are being logged.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// `true` until something that marks the output has been recorded since the last reset.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// `true` while appended records receive timestamp prefixes.
    pub fn is_stamping(&self) -> bool {
        self.stamping
    }

    /// Append one record, stamping it with the elapsed time when timestamps are on.
    pub fn append(&mut self, rec: &Record) -> GbufResult<()> {
        self.push(rec, None)
    }

    /// Append one record with an explicit timestamp prefix value.
    ///
    /// `stamp` is only written when timestamp mode is on; `None` falls back to the clock. A written
    /// explicit stamp moves the clock so that later records continue from it.
    pub(crate) fn push(&mut self, rec: &Record, stamp: Option<i32>) -> GbufResult<()> {
        let order = self.opts.byte_order;
        let mut encoded = Vec::with_capacity(4 + codec::encoded_len(rec));
        if self.stamping {
            let ms = stamp.unwrap_or_else(|| self.elapsed_ms());
            encoded.extend_from_slice(&order.i32_bytes(ms));
        }
        codec::encode(rec, order, &mut encoded);

        self.ensure(encoded.len())?;
        self.bytes.extend_from_slice(&encoded);

        if self.stamping
            && let Some(ms) = stamp
        {
            self.stamp_origin = Some(origin_for(ms));
        }
        self.stamping = stamping_after(rec, self.stamping);
        if self.stamping && self.stamp_origin.is_none() {
            self.stamp_origin = Some(Instant::now());
        }
        if marks_output(rec) {
            self.empty = false;
        }
        Ok(())
    }

    fn elapsed_ms(&self) -> i32 {
        self.stamp_origin
            .map(|t| t.elapsed().as_millis().min(i32::MAX as u128) as i32)
            .unwrap_or(0)
    }

    fn ensure(&mut self, extra: usize) -> GbufResult<()> {
        let needed = self.bytes.len() + extra;
        if needed <= self.capacity {
            return Ok(());
        }
        let step = self.opts.grow_increment.max(1);
        let mut cap = self.capacity;
        while cap < needed {
            cap += step;
        }
        self.bytes
            .try_reserve_exact(cap - self.bytes.len())
            .map_err(|_| GbufError::AllocationFailure { requested: cap })?;
        tracing::debug!(from = self.capacity, to = cap, "grew event buffer");
        self.capacity = cap;
        Ok(())
    }

    /// The recorded log.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write cursor: number of bytes recorded.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Logical capacity, always a whole number of growth steps past the initial size.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Options this buffer records with.
    pub fn opts(&self) -> RecorderOpts {
        self.opts
    }

    /// Image table referenced by image records.
    pub fn images(&self) -> &ImageTable {
        &self.images
    }

    /// Copy pixel data into the image table.
    pub fn add_image(&mut self, data: ImageData<'_>) -> GbufResult<ImageId> {
        self.images.add(data)
    }

    /// Look up an image.
    pub fn find_image(&self, id: ImageId) -> Option<&ImageEntry> {
        self.images.find(id)
    }

    /// Replace an image's pixels.
    pub fn replace_image(&mut self, id: ImageId, data: ImageData<'_>) -> GbufResult<()> {
        self.images.replace(id, data)
    }

    /// Give this buffer's images to `other`, leaving this table empty.
    pub(crate) fn hand_images_to(&mut self, other: &mut EventBuffer) {
        other.images = std::mem::take(&mut self.images);
    }
}

/// Clock origin for which `stamp` milliseconds have already elapsed.
fn origin_for(stamp: i32) -> Instant {
    let now = Instant::now();
    let ms = u64::try_from(stamp).unwrap_or(0);
    now.checked_sub(Duration::from_millis(ms)).unwrap_or(now)
}

fn marks_output(rec: &Record) -> bool {
    rec.is_drawing() || matches!(rec.opcode(), Opcode::LineTo | Opcode::Point)
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/event_buffer.rs"]
mod tests;
