use crate::buffer::images::ImageTable;
use crate::context::state::GraphicsState;
use crate::encode::bracket::{Bracket, PathOpen};
use crate::encode::{Emit, image_entry, page_size, run};
use crate::foundation::color::nearest;
use crate::foundation::core::{Pt, Quad, justify, line_style};
use crate::foundation::error::GbufResult;
use crate::record::Record;
use crate::record::reader::{Event, decode_all};

/// The eight predefined Fig colors, by Fig color number.
const FIG_COLORS: [[u8; 3]; 8] = [
    [0, 0, 0],
    [0, 0, 255],
    [0, 255, 0],
    [0, 255, 255],
    [255, 0, 0],
    [255, 0, 255],
    [255, 255, 0],
    [255, 255, 255],
];

/// Area fill value for a shape filled with its full pen color.
const SOLID_FILL: i32 = 21;

const TERMINATOR: &str = " 9999 9999\n";

/// Render a log as an XFig 2.1 drawing.
///
/// Coordinates keep their device units with the y axis flipped against the first header's
/// height. Polylines are streamed point by point and end with a `9999 9999` terminator.
#[tracing::instrument(skip_all, fields(len = bytes.len()))]
pub fn to_fig(bytes: &[u8], images: &ImageTable) -> GbufResult<String> {
    let events = decode_all(bytes)?;
    let (w, h) = page_size(&events);
    let mut fig = FigWriter::new(w, h);
    run(&events, images, &mut fig)?;
    Ok(fig.finish())
}

struct FigWriter {
    out: String,
    height: f32,
    bracket: Bracket,
    want: GraphicsState,
}

impl FigWriter {
    fn new(width: f32, height: f32) -> Self {
        Self {
            out: "#FIG 2.1\n80 2\n".to_string(),
            height,
            bracket: Bracket::default(),
            want: GraphicsState::new(width, height),
        }
    }

    fn xy(&self, x: f32, y: f32) -> String {
        format!(" {} {}", x.round() as i64, (self.height - y).round() as i64)
    }

    fn color(&self) -> usize {
        nearest(self.want.attrs.color, &FIG_COLORS)
    }

    /// Fig line style number and dash length.
    fn style(&self) -> (i32, f32) {
        match self.want.attrs.line_style {
            line_style::DASHED | line_style::DASH_DOT => (1, 4.0),
            line_style::DOTTED => (2, 3.0),
            _ => (0, 0.0),
        }
    }

    /// Header line of a polyline object, leaving the cursor where points go.
    fn polyline_head(&mut self, sub_type: i32, area_fill: i32) {
        let (style, style_val) = self.style();
        let s = format!(
            "2 {sub_type} {style} {} {} 0 0 {area_fill} {style_val:.3} 0 0 0\n\t",
            self.want.attrs.line_width.max(1),
            self.color(),
        );
        self.out.push_str(&s);
    }

    fn points(&mut self, coords: &[f32]) {
        for p in coords.chunks_exact(2) {
            let s = self.xy(p[0], p[1]);
            self.out.push_str(&s);
        }
    }

    fn close(&mut self, open: PathOpen) {
        if open != PathOpen::None {
            self.out.push_str(TERMINATOR);
        }
    }

    fn polygon(&mut self, coords: &[f32]) {
        self.polyline_head(3, SOLID_FILL);
        self.points(coords);
        if coords.len() >= 2 {
            self.points(&coords[..2]);
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        let a = &self.want.attrs;
        let sub_type = match a.justification {
            justify::CENTER => 1,
            justify::RIGHT => 2,
            _ => 0,
        };
        let size = a.font.size.round().max(1.0) as i64;
        let angle = (a.orientation as f32).to_radians();
        let length = (0.5 * a.font.size * text.chars().count() as f32).round() as i64;
        let escaped = text.replace('\\', "\\\\");
        let s = format!(
            "4 {sub_type} 0 {size} 0 {} 0 {angle:.3} 4 {size} {length}{} {escaped}\u{1}\n",
            self.color(),
            self.xy(x, y),
        );
        self.out.push_str(&s);
    }

    fn finish(mut self) -> String {
        let step = self.bracket.close();
        self.close(step.close);
        self.out
    }
}

impl Emit for FigWriter {
    fn emit(&mut self, ev: &Event, images: &ImageTable) -> GbufResult<()> {
        let rec = &ev.record;
        let pen = self.bracket.pen();
        let step = self.bracket.step(rec);
        self.close(step.close);
        self.want.apply(rec);

        match rec {
            Record::LineTo(p) => {
                if let Some(b) = step.begin {
                    self.polyline_head(1, 0);
                    let s = self.xy(b.x, b.y);
                    self.out.push_str(&s);
                }
                let s = self.xy(p.x, p.y);
                self.out.push_str(&s);
            }
            Record::Point(p) => {
                self.polyline_head(1, 0);
                self.points(&[p.x, p.y, p.x, p.y]);
                self.out.push_str(TERMINATOR);
            }
            Record::Line(q) => {
                self.polyline_head(1, 0);
                self.points(&[q.x0, q.y0, q.x1, q.y1]);
                self.out.push_str(TERMINATOR);
            }
            Record::Poly(v) => {
                if v.len() >= 2 {
                    self.polyline_head(1, 0);
                    self.points(v);
                    self.out.push_str(TERMINATOR);
                }
            }
            Record::FilledPoly(v) => self.polygon(v),
            Record::FilledRect(q) => {
                self.polygon(&[q.x0, q.y0, q.x1, q.y0, q.x1, q.y1, q.x0, q.y1]);
            }
            Record::Circle(q) => {
                let (style, style_val) = self.style();
                let fill = if q.y1 != 0.0 { SOLID_FILL } else { 0 };
                let r = q.x1.abs().round() as i64;
                let center = self.xy(q.x0, q.y0);
                let end = self.xy(q.x0 + q.x1.abs(), q.y0);
                let s = format!(
                    "1 3 {style} {} {} 0 0 {fill} {style_val:.3} 1 0.000{center} {r} {r}{center}{end}\n",
                    self.want.attrs.line_width.max(1),
                    self.color(),
                );
                self.out.push_str(&s);
            }
            Record::Image(q) => picture(self, images, pen, q)?,
            Record::Text { x, y, text } => self.text(*x, *y, text),
            Record::Header { .. }
            | Record::MoveTo(_)
            | Record::Clip(_)
            | Record::Color(_)
            | Record::Background(_)
            | Record::LineStyle(_)
            | Record::LineWidth(_)
            | Record::Orientation(_)
            | Record::Justification(_)
            | Record::Group(_)
            | Record::Save(_)
            | Record::Timestamp(_)
            | Record::Font { .. } => {}
            Record::PsRef { .. } => {
                tracing::debug!(offset = ev.offset, "dropping postscript fragment");
            }
        }
        Ok(())
    }
}

/// Picture box naming `image<id>`, spanning the destination rectangle at the pen.
fn picture(fig: &mut FigWriter, images: &ImageTable, pen: Pt, q: &Quad) -> GbufResult<()> {
    image_entry(images, q)?;
    let (x0, y0, x1, y1) = (pen.x, pen.y, pen.x + q.x1, pen.y + q.y1);
    fig.out.push_str("2 5 0 1 -1 0 0 0 0.000 0 0 0\n");
    fig.out.push_str(&format!("\t0 image{}\n\t", q.x0 as u32));
    fig.points(&[x0, y0, x1, y0, x1, y1, x0, y1, x0, y0]);
    fig.out.push_str(TERMINATOR);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/fig.rs"]
mod tests;
