//! Retained-mode recorder for 2D vector graphics.
//!
//! A [`Context`] forwards primitive drawing calls to a live [`DrawTarget`] and appends each call
//! to an [`EventBuffer`] as a compact binary record. The log can be replayed with [`play`],
//! shrunk with [`clean`], or translated to ASCII, PostScript, PDF, XFig or JSON with [`export`].
//! Logs written on a machine of the other byte order are detected from the header and read
//! transparently.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod clean;
mod context;
mod encode;
mod foundation;
mod playback;
mod record;

pub use buffer::event_buffer::{DEFAULT_GROW_INCREMENT, EventBuffer, RecorderOpts};
pub use buffer::images::{ImageData, ImageEntry, ImageTable};
pub use clean::pass::clean;
pub use context::DrawTarget;
pub use context::recording::Context;
pub use context::state::{Attrs, FontSpec, GraphicsState, window_for};
pub use context::trace::TraceDevice;
pub use encode::{
    Format, JsonOpts, PdfOpts, PsDialect, PsOpts, export, export_to_file, to_ascii, to_fig,
    to_json, to_pdf, to_postscript,
};
pub use foundation::color::{PALETTE_LEN, nearest, palette, rgb, rgb_unit};
pub use foundation::core::{FORMAT_VERSION, ImageId, Point, Pt, Quad, Rect, justify, line_style};
pub use foundation::error::{GbufError, GbufResult};
pub use playback::{PlaybackOpts, PlaybackStats, play};
pub use record::codec::{
    decode as decode_record, encode as encode_record, encode_to_vec, encoded_len,
};
pub use record::order::ByteOrder;
pub use record::reader::{Event, RecordReader, decode_all};
pub use record::{OpClass, Opcode, Record};
