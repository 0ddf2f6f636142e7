use base64::Engine as _;
use serde::Serialize;
use serde_json::{Value, json};

use crate::buffer::images::ImageTable;
use crate::encode::bracket::Bracket;
use crate::encode::{Emit, image_entry, run};
use crate::foundation::error::GbufResult;
use crate::record::Record;
use crate::record::reader::{Event, decode_all};

/// Options for [`to_json`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonOpts {
    pub(crate) pretty: bool,
}

impl JsonOpts {
    /// Return options that do (or do not) indent the output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

#[derive(Serialize)]
struct Command {
    cmd: &'static str,
    args: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stamp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImagePayload>,
}

#[derive(Serialize)]
struct ImagePayload {
    width: u32,
    height: u32,
    depth: u8,
    /// Base64 of the raw pixel bytes.
    data: String,
}

/// Render a log as a JSON array of `{cmd, args}` objects.
///
/// Image commands carry their destination rectangle (from the pen position) as
/// `[id, x0, y0, x1, y1]` and embed the pixels base64-encoded.
#[tracing::instrument(skip_all, fields(len = bytes.len()))]
pub fn to_json(bytes: &[u8], images: &ImageTable, opts: JsonOpts) -> GbufResult<String> {
    let events = decode_all(bytes)?;
    let mut w = JsonWriter::default();
    run(&events, images, &mut w)?;
    let out = if opts.pretty {
        serde_json::to_string_pretty(&w.commands)?
    } else {
        serde_json::to_string(&w.commands)?
    };
    Ok(out)
}

#[derive(Default)]
struct JsonWriter {
    commands: Vec<Command>,
    bracket: Bracket,
}

impl Emit for JsonWriter {
    fn emit(&mut self, ev: &Event, images: &ImageTable) -> GbufResult<()> {
        let rec = &ev.record;
        let pen = self.bracket.pen();
        self.bracket.step(rec);

        let mut image = None;
        let args = match rec {
            Record::Header {
                version,
                width,
                height,
            } => vec![json!(version), json!(width), json!(height)],
            Record::MoveTo(p) | Record::LineTo(p) | Record::Point(p) => {
                vec![json!(p.x), json!(p.y)]
            }
            Record::Image(q) => {
                let img = image_entry(images, q)?;
                image = Some(ImagePayload {
                    width: img.width,
                    height: img.height,
                    depth: img.depth,
                    data: base64::engine::general_purpose::STANDARD.encode(&img.pixels),
                });
                vec![
                    json!(q.x0 as u32),
                    json!(pen.x),
                    json!(pen.y),
                    json!(pen.x + q.x1),
                    json!(pen.y + q.y1),
                ]
            }
            Record::Line(q) | Record::Clip(q) | Record::Circle(q) | Record::FilledRect(q) => {
                vec![json!(q.x0), json!(q.y0), json!(q.x1), json!(q.y1)]
            }
            Record::Color(v)
            | Record::Background(v)
            | Record::LineStyle(v)
            | Record::LineWidth(v)
            | Record::Orientation(v)
            | Record::Justification(v)
            | Record::Group(v)
            | Record::Save(v)
            | Record::Timestamp(v) => vec![json!(v)],
            Record::Font { size, name } => vec![json!(name), json!(size)],
            Record::Text { x, y, text } | Record::PsRef { x, y, text } => {
                vec![json!(x), json!(y), json!(text)]
            }
            Record::Poly(v) | Record::FilledPoly(v) => v.iter().map(|c| json!(c)).collect(),
        };

        self.commands.push(Command {
            cmd: rec.opcode().name(),
            args,
            stamp: ev.stamp,
            image,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/json.rs"]
mod tests;
