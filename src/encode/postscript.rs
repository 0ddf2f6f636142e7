use crate::buffer::images::{ImageEntry, ImageTable};
use crate::context::state::GraphicsState;
use crate::encode::bracket::{Bracket, Frames, PathOpen};
use crate::encode::{Emit, color_channels, color_depth, image_entry, page_size, run};
use crate::foundation::color::{PALETTE_LEN, palette, rgb_unit};
use crate::foundation::core::{Pt, Quad, justify, line_style};
use crate::foundation::error::GbufResult;
use crate::record::Record;
use crate::record::reader::{Event, decode_all};

/// Operator vocabulary of the emitted PostScript.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PsDialect {
    /// Plain PostScript operators.
    #[default]
    PostScript,
    /// The short Illustrator operators (`m L S f q Q w d Xa u U`), defined in the prologue.
    Illustrator,
}

/// Options for [`to_postscript`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PsOpts {
    pub(crate) dialect: PsDialect,
}

impl PsOpts {
    /// Return options that emit `dialect`.
    pub fn with_dialect(mut self, dialect: PsDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Operator dialect.
    pub fn dialect(&self) -> PsDialect {
        self.dialect
    }
}

struct Ops {
    moveto: &'static str,
    lineto: &'static str,
    stroke: &'static str,
    fill: &'static str,
    gsave: &'static str,
    grestore: &'static str,
    width: &'static str,
    dash: &'static str,
    rgb: &'static str,
}

const PS_OPS: Ops = Ops {
    moveto: "moveto",
    lineto: "lineto",
    stroke: "stroke",
    fill: "fill",
    gsave: "gsave",
    grestore: "grestore",
    width: "setlinewidth",
    dash: "setdash",
    rgb: "setrgbcolor",
};

const AI_OPS: Ops = Ops {
    moveto: "m",
    lineto: "L",
    stroke: "S",
    fill: "f",
    gsave: "q",
    grestore: "Q",
    width: "w",
    dash: "d",
    rgb: "Xa",
};

const TEXT_PROCS: &str = "\
/gbuf_tl { gsave translate rotate 0 0 moveto show grestore } bind def
/gbuf_tc { gsave translate rotate dup stringwidth pop 2 div neg 0 moveto show grestore } bind def
/gbuf_tr { gsave translate rotate dup stringwidth pop neg 0 moveto show grestore } bind def
";

const AI_PROCS: &str = "\
/m { moveto } bind def
/L { lineto } bind def
/S { stroke } bind def
/f { fill } bind def
/q { gsave } bind def
/Q { grestore } bind def
/w { setlinewidth } bind def
/d { setdash } bind def
/Xa { setrgbcolor } bind def
/u { } def
/U { } def
";

/// Render a log as Encapsulated PostScript.
///
/// The bounding box comes from the first header. Color, line and font changes are emitted
/// lazily, just before the first primitive that uses them.
#[tracing::instrument(skip_all, fields(len = bytes.len(), dialect = ?opts.dialect))]
pub fn to_postscript(bytes: &[u8], images: &ImageTable, opts: PsOpts) -> GbufResult<String> {
    let events = decode_all(bytes)?;
    let (w, h) = page_size(&events);
    let mut ps = PsWriter::new(opts.dialect, w, h);
    run(&events, images, &mut ps)?;
    Ok(ps.finish())
}

struct PsWriter {
    dialect: PsDialect,
    ops: &'static Ops,
    out: String,
    bracket: Bracket,
    want: GraphicsState,
    frames: Frames,
}

impl PsWriter {
    fn new(dialect: PsDialect, width: f32, height: f32) -> Self {
        let ops = match dialect {
            PsDialect::PostScript => &PS_OPS,
            PsDialect::Illustrator => &AI_OPS,
        };
        let mut out = String::new();
        out.push_str("%!PS-Adobe-3.0 EPSF-3.0\n%%Creator: gbuf\n");
        out.push_str(&format!(
            "%%BoundingBox: 0 0 {} {}\n",
            width.ceil() as i64,
            height.ceil() as i64
        ));
        out.push_str("%%EndComments\n%%BeginProlog\n");
        out.push_str(TEXT_PROCS);
        out.push_str("/gbuf_pal [");
        for [r, g, b] in palette() {
            out.push_str(&format!(
                " [{} {} {}]",
                unit(*r),
                unit(*g),
                unit(*b)
            ));
        }
        out.push_str(" ] def\n");
        out.push_str("/gbuf_c { gbuf_pal exch get aload pop setrgbcolor } bind def\n");
        if dialect == PsDialect::Illustrator {
            out.push_str(AI_PROCS);
        }
        out.push_str("%%EndProlog\n");

        Self {
            dialect,
            ops,
            out,
            bracket: Bracket::default(),
            want: GraphicsState::new(width, height),
            frames: Frames::default(),
        }
    }

    fn line(&mut self, s: &str) {
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn close(&mut self, open: PathOpen) {
        match open {
            PathOpen::None => {}
            PathOpen::Stroking => self.line(self.ops.stroke),
            PathOpen::Filling => {
                let s = format!("closepath {}", self.ops.fill);
                self.line(&s);
            }
        }
    }

    fn sync_color(&mut self) {
        let want = self.want.attrs.color;
        if self.frames.have.color == Some(want) {
            return;
        }
        let s = if self.dialect == PsDialect::PostScript && want < PALETTE_LEN {
            let index = if want < 0 { 1 } else { want };
            format!("{index} gbuf_c")
        } else {
            let [r, g, b] = rgb_unit(want);
            format!("{r:.3} {g:.3} {b:.3} {}", self.ops.rgb)
        };
        self.line(&s);
        self.frames.have.color = Some(want);
    }

    fn sync_stroke(&mut self) {
        self.sync_color();
        let a = &self.want.attrs;
        let (width, style) = (a.line_width, a.line_style);
        if self.frames.have.line_width != Some(width) {
            let s = format!("{} {}", width.max(0), self.ops.width);
            self.line(&s);
            self.frames.have.line_width = Some(width);
        }
        if self.frames.have.line_style != Some(style) {
            let pattern: Vec<String> = line_style::dash_pattern(style)
                .iter()
                .map(|v| v.to_string())
                .collect();
            let s = format!("[{}] 0 {}", pattern.join(" "), self.ops.dash);
            self.line(&s);
            self.frames.have.line_style = Some(style);
        }
    }

    fn sync_font(&mut self) {
        let font = &self.want.attrs.font;
        if self.frames.have.font.as_ref() == Some(font) {
            return;
        }
        let s = format!(
            "/{} findfont {:.2} scalefont setfont",
            ps_name(&font.name),
            font.size
        );
        let font = font.clone();
        self.line(&s);
        self.frames.have.font = Some(font);
    }

    fn path(&mut self, coords: &[f32]) {
        let mut pts = coords.chunks_exact(2);
        if let Some(p) = pts.next() {
            let mut s = format!("newpath {:.2} {:.2} {}", p[0], p[1], self.ops.moveto);
            for p in pts {
                s.push_str(&format!(" {:.2} {:.2} {}", p[0], p[1], self.ops.lineto));
            }
            self.line(&s);
        } else {
            self.line("newpath");
        }
    }

    fn image(&mut self, img: &ImageEntry, pen: Pt, q: &Quad) -> GbufResult<()> {
        let pixels = color_channels(img)?;
        let depth = color_depth(img);
        let (iw, ih) = (img.width, img.height);
        let mut s = format!(
            "{}\n{:.2} {:.2} translate {:.2} {:.2} scale\n",
            self.ops.gsave, pen.x, pen.y, q.x1, q.y1
        );
        s.push_str(&format!(
            "/gbuf_row {} string def\n",
            u64::from(iw) * u64::from(depth)
        ));
        s.push_str(&format!(
            "{iw} {ih} 8 [{iw} 0 0 -{ih} 0 {ih}] {{ currentfile gbuf_row readhexstring pop }} "
        ));
        s.push_str(if depth == 1 {
            "image\n"
        } else {
            "false 3 colorimage\n"
        });
        for chunk in pixels.chunks(32) {
            for b in chunk {
                s.push_str(&format!("{b:02x}"));
            }
            s.push('\n');
        }
        s.push_str(self.ops.grestore);
        self.line(&s);
        Ok(())
    }

    fn finish(mut self) -> String {
        let step = self.bracket.close();
        self.close(step.close);
        for _ in 0..self.frames.unwind() {
            self.line(self.ops.grestore);
        }
        self.out.push_str("showpage\n%%EOF\n");
        self.out
    }
}

impl Emit for PsWriter {
    fn emit(&mut self, ev: &Event, images: &ImageTable) -> GbufResult<()> {
        let rec = &ev.record;
        let pen = self.bracket.pen();
        let step = self.bracket.step(rec);
        self.close(step.close);
        self.want.apply(rec);

        match rec {
            Record::Header { width, height, .. } => {
                let s = format!("% setwindow 0 0 {:.2} {:.2}", width - 1.0, height - 1.0);
                self.line(&s);
            }
            Record::MoveTo(_) => {}
            Record::LineTo(p) => {
                if let Some(b) = step.begin {
                    self.sync_stroke();
                    let s = format!("newpath {:.2} {:.2} {}", b.x, b.y, self.ops.moveto);
                    self.line(&s);
                }
                let s = format!("{:.2} {:.2} {}", p.x, p.y, self.ops.lineto);
                self.line(&s);
            }
            Record::Point(p) => {
                self.sync_color();
                let s = format!("{:.2} {:.2} 1 1 rectfill", p.x, p.y);
                self.line(&s);
            }
            Record::Line(q) => {
                self.sync_stroke();
                self.path(&[q.x0, q.y0, q.x1, q.y1]);
                self.line(self.ops.stroke);
            }
            Record::Circle(q) => {
                let filled = q.y1 != 0.0;
                if filled {
                    self.sync_color();
                } else {
                    self.sync_stroke();
                }
                let s = format!(
                    "newpath {:.2} {:.2} {:.2} 0 360 arc {}",
                    q.x0,
                    q.y0,
                    q.x1,
                    if filled { self.ops.fill } else { self.ops.stroke }
                );
                self.line(&s);
            }
            Record::FilledRect(q) => {
                self.sync_color();
                self.path(&[q.x0, q.y0, q.x1, q.y0, q.x1, q.y1, q.x0, q.y1]);
            }
            Record::FilledPoly(v) => {
                self.sync_color();
                self.path(v);
            }
            Record::Poly(v) => {
                if v.len() >= 2 {
                    self.sync_stroke();
                    self.path(v);
                    self.line(self.ops.stroke);
                }
            }
            Record::Image(q) => {
                let img = image_entry(images, q)?;
                self.image(img, pen, q)?;
            }
            Record::Clip(q) => {
                if self.frames.clip() {
                    self.line(self.ops.grestore);
                }
                let r = q.rect();
                let s = format!(
                    "{}\n{:.2} {:.2} {:.2} {:.2} rectclip",
                    self.ops.gsave,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height()
                );
                self.line(&s);
            }
            Record::Save(0) => {
                for _ in 0..self.frames.restore() {
                    self.line(self.ops.grestore);
                }
            }
            Record::Save(_) => {
                self.frames.save();
                self.line(self.ops.gsave);
            }
            Record::Group(v) => {
                let s = match (self.dialect, *v) {
                    (PsDialect::Illustrator, 0) => "U".to_string(),
                    (PsDialect::Illustrator, _) => "u".to_string(),
                    (PsDialect::PostScript, 0) => "% end group".to_string(),
                    (PsDialect::PostScript, n) => format!("% begin group {n}"),
                };
                self.line(&s);
            }
            Record::Text { x, y, text } => {
                self.sync_color();
                self.sync_font();
                let proc = match self.want.attrs.justification {
                    justify::CENTER => "gbuf_tc",
                    justify::RIGHT => "gbuf_tr",
                    _ => "gbuf_tl",
                };
                let s = format!(
                    "({}) {} {x:.2} {y:.2} {proc}",
                    ps_string(text),
                    self.want.attrs.orientation
                );
                self.line(&s);
            }
            Record::PsRef { text, .. } => self.line(text),
            Record::Color(_)
            | Record::Background(_)
            | Record::LineStyle(_)
            | Record::LineWidth(_)
            | Record::Orientation(_)
            | Record::Justification(_)
            | Record::Font { .. }
            | Record::Timestamp(_) => {}
        }
        Ok(())
    }
}

fn unit(c: u8) -> String {
    let v = f32::from(c) / 255.0;
    format!("{v:.3}")
}

/// Font name usable as a PostScript literal name.
fn ps_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && !"()<>[]{}/%".contains(c) {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "Helvetica".to_string()
    } else {
        cleaned
    }
}

/// Contents of a PostScript string literal.
fn ps_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(char::from(b));
            }
            0x20..=0x7e => out.push(char::from(b)),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/postscript.rs"]
mod tests;
