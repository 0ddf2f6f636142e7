use std::collections::BTreeMap;

use kurbo::{PathEl, Shape};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::buffer::images::{ImageEntry, ImageTable};
use crate::context::state::GraphicsState;
use crate::encode::bracket::{Bracket, Frames, PathOpen};
use crate::encode::{Emit, color_channels, image_entry, page_size, run};
use crate::foundation::color::rgb_unit;
use crate::foundation::core::{Point, Pt, Quad, justify, line_style};
use crate::foundation::error::GbufResult;
use crate::record::Record;
use crate::record::reader::{Event, decode_all};

/// Options for [`to_pdf`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PdfOpts {
    pub(crate) compress: bool,
}

impl Default for PdfOpts {
    fn default() -> Self {
        Self { compress: true }
    }
}

impl PdfOpts {
    /// Return options that do (or do not) Flate-compress streams.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

const STANDARD_FONTS: [&str; 14] = [
    "Courier",
    "Courier-Bold",
    "Courier-BoldOblique",
    "Courier-Oblique",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-BoldOblique",
    "Helvetica-Oblique",
    "Symbol",
    "Times-Bold",
    "Times-BoldItalic",
    "Times-Italic",
    "Times-Roman",
    "ZapfDingbats",
];

/// Average glyph advance as a fraction of the font size, used to place justified text.
const GLYPH_ADVANCE: f32 = 0.5;

/// Render a log as a single-page PDF document.
///
/// The page is sized to the first header. Clip changes are wrapped in `q`/`Q` pairs, fonts map
/// onto the standard 14 (Helvetica when unknown) and literal PostScript fragments are dropped.
#[tracing::instrument(skip_all, fields(len = bytes.len()))]
pub fn to_pdf(bytes: &[u8], images: &ImageTable, opts: PdfOpts) -> GbufResult<Vec<u8>> {
    let events = decode_all(bytes)?;
    let (w, h) = page_size(&events);
    let mut pdf = PdfWriter::new(w, h);
    run(&events, images, &mut pdf)?;
    pdf.finish(opts)
}

struct PdfWriter {
    doc: Document,
    width: f32,
    height: f32,
    ops: Vec<Operation>,
    bracket: Bracket,
    want: GraphicsState,
    frames: Frames,
    groups: usize,
    fonts: BTreeMap<&'static str, String>,
    xobjects: BTreeMap<u32, (String, ObjectId)>,
}

impl PdfWriter {
    fn new(width: f32, height: f32) -> Self {
        Self {
            doc: Document::with_version("1.5"),
            width,
            height,
            ops: Vec::new(),
            bracket: Bracket::default(),
            want: GraphicsState::new(width, height),
            frames: Frames::default(),
            groups: 0,
            fonts: BTreeMap::new(),
            xobjects: BTreeMap::new(),
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    fn close(&mut self, open: PathOpen) {
        match open {
            PathOpen::None => {}
            PathOpen::Stroking => self.op("S", vec![]),
            PathOpen::Filling => {
                self.op("h", vec![]);
                self.op("f", vec![]);
            }
        }
    }

    fn sync_color(&mut self) {
        let want = self.want.attrs.color;
        if self.frames.have.color == Some(want) {
            return;
        }
        let rgb: Vec<Object> = rgb_unit(want).into_iter().map(Object::Real).collect();
        self.op("RG", rgb.clone());
        self.op("rg", rgb);
        self.frames.have.color = Some(want);
    }

    fn sync_stroke(&mut self) {
        self.sync_color();
        let a = &self.want.attrs;
        let (width, style) = (a.line_width, a.line_style);
        if self.frames.have.line_width != Some(width) {
            self.op("w", vec![Object::Integer(i64::from(width.max(0)))]);
            self.frames.have.line_width = Some(width);
        }
        if self.frames.have.line_style != Some(style) {
            let pattern = line_style::dash_pattern(style)
                .iter()
                .copied()
                .map(Object::Real)
                .collect();
            self.op("d", vec![Object::Array(pattern), Object::Integer(0)]);
            self.frames.have.line_style = Some(style);
        }
    }

    /// Resource name of the standard font closest to `name`.
    fn font_resource(&mut self, name: &str) -> String {
        let base = STANDARD_FONTS
            .into_iter()
            .find(|f| f.eq_ignore_ascii_case(name))
            .unwrap_or("Helvetica");
        let next = self.fonts.len() + 1;
        self.fonts
            .entry(base)
            .or_insert_with(|| format!("F{next}"))
            .clone()
    }

    fn move_line(&mut self, coords: &[f32]) {
        for (i, p) in coords.chunks_exact(2).enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            self.op(op, vec![Object::Real(p[0]), Object::Real(p[1])]);
        }
    }

    fn circle(&mut self, q: &Quad) {
        let circle = kurbo::Circle::new(Point::new(f64::from(q.x0), f64::from(q.y0)), f64::from(q.x1));
        let mut last = Point::ZERO;
        for el in circle.path_elements(0.1) {
            match el {
                PathEl::MoveTo(p) => {
                    self.op("m", reals(&[p]));
                    last = p;
                }
                PathEl::LineTo(p) => {
                    self.op("l", reals(&[p]));
                    last = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    let c = kurbo::QuadBez::new(last, p1, p2).raise();
                    self.op("c", reals(&[c.p1, c.p2, c.p3]));
                    last = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    self.op("c", reals(&[p1, p2, p3]));
                    last = p3;
                }
                PathEl::ClosePath => self.op("h", vec![]),
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        self.sync_color();
        let font = self.want.attrs.font.clone();
        let res = self.font_resource(&font.name);

        let width = GLYPH_ADVANCE * font.size * text.chars().count() as f32;
        let shift = match self.want.attrs.justification {
            justify::CENTER => width / 2.0,
            justify::RIGHT => width,
            _ => 0.0,
        };
        let (sin, cos) = (self.want.attrs.orientation as f32).to_radians().sin_cos();
        let (ox, oy) = (x - shift * cos, y - shift * sin);

        self.op("BT", vec![]);
        self.op(
            "Tf",
            vec![Object::Name(res.into_bytes()), Object::Real(font.size)],
        );
        self.op(
            "Tm",
            vec![
                Object::Real(cos),
                Object::Real(sin),
                Object::Real(-sin),
                Object::Real(cos),
                Object::Real(ox),
                Object::Real(oy),
            ],
        );
        self.op("Tj", vec![Object::string_literal(text)]);
        self.op("ET", vec![]);
    }

    /// Add `img` as an image XObject once and return its resource name.
    fn xobject(&mut self, id: u32, img: &ImageEntry) -> GbufResult<String> {
        if let Some((name, _)) = self.xobjects.get(&id) {
            return Ok(name.clone());
        }
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(img.width)),
            "Height" => Object::Integer(i64::from(img.height)),
            "ColorSpace" => if img.depth == 1 { "DeviceGray" } else { "DeviceRGB" },
            "BitsPerComponent" => Object::Integer(8),
        };
        if img.depth == 4 {
            let alpha: Vec<u8> = img.pixels.chunks_exact(4).map(|p| p[3]).collect();
            if alpha.iter().all(|a| *a == 0 || *a == 255) {
                let mask = Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => Object::Integer(i64::from(img.width)),
                        "Height" => Object::Integer(i64::from(img.height)),
                        "ImageMask" => true,
                        "BitsPerComponent" => Object::Integer(1),
                    },
                    pack_mask(&alpha, img.width as usize),
                );
                dict.set("Mask", self.doc.add_object(mask));
            } else {
                let smask = Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => Object::Integer(i64::from(img.width)),
                        "Height" => Object::Integer(i64::from(img.height)),
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => Object::Integer(8),
                    },
                    alpha,
                );
                dict.set("SMask", self.doc.add_object(smask));
            }
        }
        let stream = Stream::new(dict, color_channels(img)?.into_owned());
        let obj = self.doc.add_object(stream);
        let name = format!("Im{}", self.xobjects.len());
        self.xobjects.insert(id, (name.clone(), obj));
        Ok(name)
    }

    fn image(&mut self, images: &ImageTable, pen: Pt, q: &Quad) -> GbufResult<()> {
        let img = image_entry(images, q)?;
        let id = q.x0 as u32;
        let name = self.xobject(id, img)?;
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![
                Object::Real(q.x1),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(q.y1),
                Object::Real(pen.x),
                Object::Real(pen.y),
            ],
        );
        self.op("Do", vec![Object::Name(name.into_bytes())]);
        self.op("Q", vec![]);
        Ok(())
    }

    fn finish(mut self, opts: PdfOpts) -> GbufResult<Vec<u8>> {
        let step = self.bracket.close();
        self.close(step.close);
        for _ in 0..self.groups {
            self.op("EMC", vec![]);
        }
        for _ in 0..self.frames.unwind() {
            self.op("Q", vec![]);
        }

        let mut doc = self.doc;
        let content = Content {
            operations: self.ops,
        }
        .encode()?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let mut fonts = Dictionary::new();
        for (base, res) in &self.fonts {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => *base,
            });
            fonts.set(res.as_str(), font_id);
        }
        let mut xobjects = Dictionary::new();
        for (name, obj) in self.xobjects.values() {
            xobjects.set(name.as_str(), *obj);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.width),
                Object::Real(self.height),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        if opts.compress {
            doc.compress();
        }

        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        Ok(out)
    }
}

impl Emit for PdfWriter {
    fn emit(&mut self, ev: &Event, images: &ImageTable) -> GbufResult<()> {
        let rec = &ev.record;
        let pen = self.bracket.pen();
        let step = self.bracket.step(rec);
        self.close(step.close);
        self.want.apply(rec);

        match rec {
            Record::Header { .. } | Record::MoveTo(_) | Record::Timestamp(_) => {}
            Record::LineTo(p) => {
                if let Some(b) = step.begin {
                    self.sync_stroke();
                    self.op("m", vec![Object::Real(b.x), Object::Real(b.y)]);
                }
                self.op("l", vec![Object::Real(p.x), Object::Real(p.y)]);
            }
            Record::Point(p) => {
                self.sync_color();
                self.op(
                    "re",
                    vec![
                        Object::Real(p.x),
                        Object::Real(p.y),
                        Object::Real(1.0),
                        Object::Real(1.0),
                    ],
                );
                self.op("f", vec![]);
            }
            Record::Line(q) => {
                self.sync_stroke();
                self.move_line(&[q.x0, q.y0, q.x1, q.y1]);
                self.op("S", vec![]);
            }
            Record::Circle(q) => {
                let filled = q.y1 != 0.0;
                if filled {
                    self.sync_color();
                } else {
                    self.sync_stroke();
                }
                self.circle(q);
                self.op(if filled { "f" } else { "S" }, vec![]);
            }
            Record::FilledRect(q) => {
                self.sync_color();
                self.move_line(&[q.x0, q.y0, q.x1, q.y0, q.x1, q.y1, q.x0, q.y1]);
            }
            Record::FilledPoly(v) => {
                self.sync_color();
                self.move_line(v);
            }
            Record::Poly(v) => {
                if v.len() >= 2 {
                    self.sync_stroke();
                    self.move_line(v);
                    self.op("S", vec![]);
                }
            }
            Record::Image(q) => self.image(images, pen, q)?,
            Record::Clip(q) => {
                if self.frames.clip() {
                    self.op("Q", vec![]);
                }
                let r = q.rect();
                self.op("q", vec![]);
                self.op(
                    "re",
                    vec![
                        Object::Real(r.x0 as f32),
                        Object::Real(r.y0 as f32),
                        Object::Real(r.width() as f32),
                        Object::Real(r.height() as f32),
                    ],
                );
                self.op("W", vec![]);
                self.op("n", vec![]);
            }
            Record::Save(0) => {
                for _ in 0..self.frames.restore() {
                    self.op("Q", vec![]);
                }
            }
            Record::Save(_) => {
                self.frames.save();
                self.op("q", vec![]);
            }
            Record::Group(0) => {
                if self.groups > 0 {
                    self.groups -= 1;
                    self.op("EMC", vec![]);
                }
            }
            Record::Group(_) => {
                self.groups += 1;
                self.op("BMC", vec![Object::Name(b"Group".to_vec())]);
            }
            Record::Text { x, y, text } => self.text(*x, *y, text),
            Record::PsRef { .. } => {
                tracing::debug!(offset = ev.offset, "dropping postscript fragment");
            }
            Record::Color(_)
            | Record::Background(_)
            | Record::LineStyle(_)
            | Record::LineWidth(_)
            | Record::Orientation(_)
            | Record::Justification(_)
            | Record::Font { .. } => {}
        }
        Ok(())
    }
}

fn reals(points: &[Point]) -> Vec<Object> {
    points
        .iter()
        .flat_map(|p| [Object::Real(p.x as f32), Object::Real(p.y as f32)])
        .collect()
}

/// Pack an alpha channel into a 1-bit stencil, rows padded to whole bytes. Opaque pixels are 0.
fn pack_mask(alpha: &[u8], width: usize) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    let row_bytes = width.div_ceil(8);
    let mut out = Vec::with_capacity(row_bytes * (alpha.len() / width));
    for row in alpha.chunks_exact(width) {
        let mut packed = vec![0u8; row_bytes];
        for (i, a) in row.iter().enumerate() {
            if *a == 0 {
                packed[i / 8] |= 0x80 >> (i % 8);
            }
        }
        out.extend_from_slice(&packed);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pdf.rs"]
mod tests;
