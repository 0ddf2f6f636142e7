use super::*;
use crate::buffer::images::ImageData;
use crate::record::codec;
use crate::record::order::ByteOrder;

fn log(recs: &[Record]) -> Vec<u8> {
    let mut out = Vec::new();
    codec::encode(&Record::header(200.0, 100.0), ByteOrder::native(), &mut out);
    for r in recs {
        codec::encode(r, ByteOrder::native(), &mut out);
    }
    out
}

fn body(ps: &str) -> Vec<&str> {
    let start = ps.find("%%EndProlog\n").unwrap() + "%%EndProlog\n".len();
    ps[start..].lines().collect()
}

fn path_run(n: usize) -> Vec<Record> {
    let mut recs = vec![Record::MoveTo(Pt::new(0.0, 0.0))];
    for i in 0..n {
        recs.push(Record::LineTo(Pt::new(i as f32, 1.0)));
    }
    recs.push(Record::Color(2));
    recs.push(Record::Line(Quad::new(0.0, 0.0, 1.0, 1.0)));
    recs
}

#[test]
fn lineto_run_strokes_once() {
    for n in [1, 2, 7] {
        let ps = to_postscript(&log(&path_run(n)), &ImageTable::new(), PsOpts::default()).unwrap();
        let lines = body(&ps);
        let lineto_end = lines.iter().rposition(|l| l.ends_with(" lineto")).unwrap();
        assert_eq!(lines[lineto_end + 1], "stroke");
        assert_eq!(lines.iter().filter(|l| **l == "stroke").count(), 2, "n = {n}");
    }
}

#[test]
fn header_sets_bounding_box() {
    let ps = to_postscript(&log(&[]), &ImageTable::new(), PsOpts::default()).unwrap();
    assert!(ps.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n"));
    assert!(ps.contains("%%BoundingBox: 0 0 200 100\n"));
    assert!(ps.contains("/gbuf_tc {"));
    assert!(ps.ends_with("showpage\n%%EOF\n"));
}

#[test]
fn attributes_are_emitted_lazily() {
    let recs = [
        Record::Color(3),
        Record::Color(40),
        Record::LineStyle(1),
        Record::Line(Quad::new(0.0, 0.0, 5.0, 5.0)),
        Record::Line(Quad::new(1.0, 1.0, 5.0, 5.0)),
    ];
    let ps = to_postscript(&log(&recs), &ImageTable::new(), PsOpts::default()).unwrap();
    let lines = body(&ps);
    assert!(!lines.contains(&"3 gbuf_c"));
    assert_eq!(lines.iter().filter(|l| l.ends_with("setrgbcolor")).count(), 1);
    assert!(lines.contains(&"0.000 0.000 0.157 setrgbcolor"));
    assert!(lines.contains(&"[6 3] 0 setdash"));
}

#[test]
fn text_uses_justified_helpers() {
    let recs = [
        Record::Justification(2),
        Record::Orientation(90),
        Record::Text {
            x: 10.0,
            y: 20.0,
            text: "a(b)".to_string(),
        },
    ];
    let ps = to_postscript(&log(&recs), &ImageTable::new(), PsOpts::default()).unwrap();
    let lines = body(&ps);
    assert!(lines.contains(&"/Helvetica findfont 12.00 scalefont setfont"));
    assert!(lines.contains(&"(a\\(b\\)) 90 10.00 20.00 gbuf_tr"));
}

#[test]
fn clip_changes_are_bracketed() {
    let recs = [
        Record::Clip(Quad::new(0.0, 0.0, 10.0, 10.0)),
        Record::Clip(Quad::new(0.0, 0.0, 20.0, 20.0)),
    ];
    let ps = to_postscript(&log(&recs), &ImageTable::new(), PsOpts::default()).unwrap();
    let lines = body(&ps);
    assert_eq!(lines.iter().filter(|l| **l == "gsave").count(), 2);
    assert_eq!(lines.iter().filter(|l| **l == "grestore").count(), 2);
    assert!(lines.contains(&"0.00 0.00 20.00 20.00 rectclip"));
}

#[test]
fn illustrator_dialect_uses_short_operators() {
    let mut recs = path_run(3);
    recs.push(Record::Group(1));
    recs.push(Record::Group(0));
    let opts = PsOpts::default().with_dialect(PsDialect::Illustrator);
    let ps = to_postscript(&log(&recs), &ImageTable::new(), opts).unwrap();
    assert!(ps.contains("/Xa { setrgbcolor } bind def\n"));
    let lines = body(&ps);
    assert!(lines.contains(&"newpath 0.00 0.00 m"));
    assert!(lines.contains(&"2.00 1.00 L"));
    assert_eq!(lines.iter().filter(|l| **l == "S").count(), 2);
    assert!(lines.contains(&"u"));
    assert!(lines.contains(&"U"));
}

#[test]
fn images_are_inlined_as_hex() {
    let mut images = ImageTable::new();
    images
        .add(ImageData {
            width: 1,
            height: 1,
            depth: 4,
            pixels: &[0xff, 0x10, 0x00, 0x80],
        })
        .unwrap();
    let recs = [
        Record::MoveTo(Pt::new(5.0, 6.0)),
        Record::Image(Quad::new(0.0, 0.0, 10.0, 10.0)),
        Record::Image(Quad::new(7.0, 0.0, 10.0, 10.0)),
        Record::PsRef {
            x: 0.0,
            y: 0.0,
            text: "% verbatim".to_string(),
        },
    ];
    let ps = to_postscript(&log(&recs), &images, PsOpts::default()).unwrap();
    let lines = body(&ps);
    assert!(lines.contains(&"5.00 6.00 translate 10.00 10.00 scale"));
    assert!(lines.contains(&"ff1000"));
    assert_eq!(lines.iter().filter(|l| l.ends_with("colorimage")).count(), 1);
    assert!(lines.contains(&"% verbatim"));
}
