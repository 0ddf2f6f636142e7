use crate::buffer::images::ImageTable;
use crate::encode::{Emit, escape, run};
use crate::foundation::error::GbufResult;
use crate::record::Record;
use crate::record::reader::{Event, decode_all};

/// Render a log as text, one line per record.
///
/// Coordinates print with two decimals and strings are quoted with `"[]{}\` escaped. Records
/// that carry a timestamp are prefixed with `@<ms> `.
#[tracing::instrument(skip_all, fields(len = bytes.len()))]
pub fn to_ascii(bytes: &[u8]) -> GbufResult<String> {
    let events = decode_all(bytes)?;
    let mut w = AsciiWriter::default();
    run(&events, &ImageTable::new(), &mut w)?;
    Ok(w.out)
}

#[derive(Default)]
struct AsciiWriter {
    out: String,
}

impl Emit for AsciiWriter {
    fn emit(&mut self, ev: &Event, _images: &ImageTable) -> GbufResult<()> {
        if let Some(ms) = ev.stamp {
            self.out.push_str(&format!("@{ms} "));
        }
        self.out.push_str(&line(&ev.record));
        self.out.push('\n');
        Ok(())
    }
}

fn line(rec: &Record) -> String {
    let name = rec.opcode().name();
    match rec {
        Record::Header { width, height, .. } => {
            format!("{name} 0 0 {:.2} {:.2}", width - 1.0, height - 1.0)
        }
        Record::MoveTo(p) | Record::LineTo(p) | Record::Point(p) => {
            format!("{name} {:.2} {:.2}", p.x, p.y)
        }
        Record::Circle(q) => format!(
            "{name} {:.2} {:.2} {:.2} {}",
            q.x0,
            q.y0,
            q.x1,
            u8::from(q.y1 != 0.0)
        ),
        Record::Image(q) => format!("{name} {} {:.2} {:.2}", q.x0, q.x1, q.y1),
        Record::Line(q) | Record::Clip(q) | Record::FilledRect(q) => {
            format!("{name} {:.2} {:.2} {:.2} {:.2}", q.x0, q.y0, q.x1, q.y1)
        }
        Record::Save(0) => "grestore".to_string(),
        Record::Save(_) => "gsave".to_string(),
        Record::Color(v)
        | Record::Background(v)
        | Record::LineStyle(v)
        | Record::LineWidth(v)
        | Record::Orientation(v)
        | Record::Justification(v)
        | Record::Group(v)
        | Record::Timestamp(v) => format!("{name} {v}"),
        Record::Font { size, name: font } => format!("{name} \"{}\" {size:.2}", escape(font)),
        Record::Text { x, y, text } | Record::PsRef { x, y, text } => {
            format!("{name} {x:.2} {y:.2} \"{}\"", escape(text))
        }
        Record::Poly(v) | Record::FilledPoly(v) => {
            let coords: Vec<String> = v.iter().map(|c| format!("{c:.2}")).collect();
            format!("{name} {} [{}]", v.len() / 2, coords.join(" "))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ascii.rs"]
mod tests;
