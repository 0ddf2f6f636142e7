//! Backend encoders: translate a log into another vector format without replaying it.
//!
//! Every backend shares one decode discipline. The whole log is decoded before anything is
//! emitted, so a `Truncated`, `UnknownOpcode` or `UnsupportedVersion` failure produces no output.
//! Image records whose id is missing from the image table are skipped.

pub(crate) mod ascii;
pub(crate) mod bracket;
pub(crate) mod fig;
pub(crate) mod json;
pub(crate) mod pdf;
pub(crate) mod postscript;

use std::borrow::Cow;
use std::path::Path;

use crate::buffer::images::{ImageEntry, ImageTable};
use crate::foundation::core::{ImageId, Quad};
use crate::foundation::error::{GbufError, GbufResult};
use crate::record::Record;
use crate::record::reader::Event;

pub use ascii::to_ascii;
pub use fig::to_fig;
pub use json::{JsonOpts, to_json};
pub use pdf::{PdfOpts, to_pdf};
pub use postscript::{PsDialect, PsOpts, to_postscript};

/// Page size used when a log carries no header.
pub(crate) const FALLBACK_PAGE: (f32, f32) = (640.0, 480.0);

/// Output formats produced by [`export`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// One line of text per record.
    Ascii,
    /// Encapsulated PostScript.
    PostScript,
    /// PostScript in the Illustrator operator dialect.
    Illustrator,
    /// PDF document.
    Pdf,
    /// XFig 2.1 drawing.
    Fig,
    /// JSON array of commands.
    Json,
}

impl Format {
    /// Every format, in declaration order.
    pub const ALL: [Format; 6] = [
        Format::Ascii,
        Format::PostScript,
        Format::Illustrator,
        Format::Pdf,
        Format::Fig,
        Format::Json,
    ];

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Ascii => "txt",
            Format::PostScript => "eps",
            Format::Illustrator => "ai",
            Format::Pdf => "pdf",
            Format::Fig => "fig",
            Format::Json => "json",
        }
    }

    /// Guess a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "ps" => Some(Format::PostScript),
            _ => Self::ALL.into_iter().find(|f| f.extension() == ext),
        }
    }
}

/// Encode `bytes` into `format` with default options.
pub fn export(bytes: &[u8], images: &ImageTable, format: Format) -> GbufResult<Vec<u8>> {
    Ok(match format {
        Format::Ascii => to_ascii(bytes)?.into_bytes(),
        Format::PostScript => to_postscript(bytes, images, PsOpts::default())?.into_bytes(),
        Format::Illustrator => {
            let opts = PsOpts::default().with_dialect(PsDialect::Illustrator);
            to_postscript(bytes, images, opts)?.into_bytes()
        }
        Format::Pdf => to_pdf(bytes, images, PdfOpts::default())?,
        Format::Fig => to_fig(bytes, images)?.into_bytes(),
        Format::Json => to_json(bytes, images, JsonOpts::default())?.into_bytes(),
    })
}

/// Encode `bytes` into `format` and write the result to `path`.
///
/// The file is only created once encoding has succeeded.
pub fn export_to_file(
    bytes: &[u8],
    images: &ImageTable,
    format: Format,
    path: impl AsRef<Path>,
) -> GbufResult<()> {
    let out = export(bytes, images, format)?;
    std::fs::write(path.as_ref(), out)?;
    Ok(())
}

/// One backend's per-record emission.
pub(crate) trait Emit {
    /// Emit one record. Returning [`GbufError::MissingImage`] skips the record.
    fn emit(&mut self, ev: &Event, images: &ImageTable) -> GbufResult<()>;
}

/// Feed decoded events to a backend in order.
pub(crate) fn run<E: Emit>(events: &[Event], images: &ImageTable, out: &mut E) -> GbufResult<()> {
    for ev in events {
        match out.emit(ev, images) {
            Ok(()) => {}
            Err(GbufError::MissingImage(id)) => {
                tracing::debug!(offset = ev.offset, image = id.0, "skipping missing image");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Device size from the first header, or [`FALLBACK_PAGE`].
pub(crate) fn page_size(events: &[Event]) -> (f32, f32) {
    events
        .iter()
        .find_map(|ev| match ev.record {
            Record::Header { width, height, .. } => Some((width, height)),
            _ => None,
        })
        .unwrap_or(FALLBACK_PAGE)
}

/// Image table entry named by an image record.
pub(crate) fn image_entry<'a>(images: &'a ImageTable, q: &Quad) -> GbufResult<&'a ImageEntry> {
    // Ids that are not a whole non-negative number can never be in the table.
    let id = q.image_id().ok_or(GbufError::MissingImage(ImageId(u32::MAX)))?;
    images.get(id)
}

/// Pixel bytes without alpha: gray and RGB images as stored, RGBA reduced to RGB.
pub(crate) fn color_channels(img: &ImageEntry) -> GbufResult<Cow<'_, [u8]>> {
    if img.depth != 4 {
        return Ok(Cow::Borrowed(&img.pixels));
    }
    let rgba = image::RgbaImage::from_raw(img.width, img.height, img.pixels.clone())
        .ok_or_else(|| GbufError::validation("image pixel data does not match its size"))?;
    Ok(Cow::Owned(
        image::DynamicImage::ImageRgba8(rgba).to_rgb8().into_raw(),
    ))
}

/// Channels per pixel of [`color_channels`].
pub(crate) fn color_depth(img: &ImageEntry) -> u8 {
    if img.depth == 1 { 1 } else { 3 }
}

/// Escape `"[]{}\` with a backslash.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '"' | '[' | ']' | '{' | '}' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mod.rs"]
mod tests;
