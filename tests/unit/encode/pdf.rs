use super::*;
use crate::buffer::images::ImageData;
use crate::record::codec;
use crate::record::order::ByteOrder;

fn log(recs: &[Record]) -> Vec<u8> {
    let mut out = Vec::new();
    codec::encode(&Record::header(300.0, 200.0), ByteOrder::native(), &mut out);
    for r in recs {
        codec::encode(r, ByteOrder::native(), &mut out);
    }
    out
}

fn operators(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let page_id = *pages.values().next().unwrap();
    let data = doc.get_page_content(page_id).unwrap();
    Content::decode(&data)
        .unwrap()
        .operations
        .into_iter()
        .map(|op| op.operator)
        .collect()
}

fn count(ops: &[String], name: &str) -> usize {
    ops.iter().filter(|o| *o == name).count()
}

#[test]
fn lineto_run_strokes_once() {
    for n in [1, 4, 9] {
        let mut recs = vec![Record::MoveTo(Pt::new(1.0, 1.0))];
        for i in 0..n {
            recs.push(Record::LineTo(Pt::new(i as f32, 2.0)));
        }
        recs.push(Record::Color(4));
        let pdf = to_pdf(&log(&recs), &ImageTable::new(), PdfOpts::default()).unwrap();
        let ops = operators(&pdf);
        assert_eq!(count(&ops, "S"), 1, "n = {n}");
        assert_eq!(count(&ops, "l"), n);
        assert_eq!(ops.last().map(String::as_str), Some("S"));
    }
}

#[test]
fn page_is_sized_from_header() {
    let pdf = to_pdf(&log(&[]), &ImageTable::new(), PdfOpts::default().with_compress(false)).unwrap();
    let doc = Document::load_mem(&pdf).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let media = page.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media.len(), 4);
    assert_eq!(media[2].as_float().unwrap(), 300.0);
    assert_eq!(media[3].as_float().unwrap(), 200.0);
}

#[test]
fn filled_shapes_close_with_fill() {
    let recs = [
        Record::FilledPoly(vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0]),
        Record::FilledRect(Quad::new(20.0, 20.0, 30.0, 30.0)),
    ];
    let pdf = to_pdf(&log(&recs), &ImageTable::new(), PdfOpts::default()).unwrap();
    let ops = operators(&pdf);
    assert_eq!(count(&ops, "f"), 2);
    assert_eq!(count(&ops, "h"), 2);
    assert_eq!(count(&ops, "S"), 0);
}

#[test]
fn clips_and_saves_stay_balanced() {
    let recs = [
        Record::Clip(Quad::new(0.0, 0.0, 50.0, 50.0)),
        Record::Save(1),
        Record::Clip(Quad::new(0.0, 0.0, 10.0, 10.0)),
        Record::Line(Quad::new(0.0, 0.0, 5.0, 5.0)),
        Record::Save(0),
        Record::Clip(Quad::new(0.0, 0.0, 100.0, 100.0)),
        Record::Group(3),
    ];
    let pdf = to_pdf(&log(&recs), &ImageTable::new(), PdfOpts::default()).unwrap();
    let ops = operators(&pdf);
    assert_eq!(count(&ops, "q"), count(&ops, "Q"));
    assert_eq!(count(&ops, "W"), 3);
    assert_eq!(count(&ops, "BMC"), count(&ops, "EMC"));
}

#[test]
fn text_selects_standard_fonts() {
    let recs = [
        Record::Font {
            size: 14.0,
            name: "times-roman".to_string(),
        },
        Record::Text {
            x: 10.0,
            y: 10.0,
            text: "hi".to_string(),
        },
        Record::Font {
            size: 14.0,
            name: "Comic Sans".to_string(),
        },
        Record::Text {
            x: 10.0,
            y: 30.0,
            text: "there".to_string(),
        },
    ];
    let pdf = to_pdf(&log(&recs), &ImageTable::new(), PdfOpts::default().with_compress(false)).unwrap();
    let doc = Document::load_mem(&pdf).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let res_id = page.get(b"Resources").unwrap().as_reference().unwrap();
    let fonts = doc
        .get_dictionary(res_id)
        .unwrap()
        .get(b"Font")
        .unwrap()
        .as_dict()
        .unwrap();
    let mut names: Vec<String> = fonts
        .iter()
        .map(|(_, v)| {
            let font = doc.get_dictionary(v.as_reference().unwrap()).unwrap();
            let base = font.get(b"BaseFont").unwrap().as_name().unwrap();
            String::from_utf8_lossy(base).into_owned()
        })
        .collect();
    names.sort();
    assert_eq!(names, ["Helvetica", "Times-Roman"]);
    assert_eq!(count(&operators(&pdf), "Tj"), 2);
}

#[test]
fn binary_alpha_becomes_a_stencil_mask() {
    let mut images = ImageTable::new();
    images
        .add(ImageData {
            width: 2,
            height: 1,
            depth: 4,
            pixels: &[255, 0, 0, 255, 0, 0, 255, 0],
        })
        .unwrap();
    let recs = [
        Record::MoveTo(Pt::new(10.0, 10.0)),
        Record::Image(Quad::new(0.0, 0.0, 20.0, 10.0)),
        Record::Image(Quad::new(0.0, 0.0, 20.0, 10.0)),
        Record::Image(Quad::new(5.0, 0.0, 20.0, 10.0)),
    ];
    let pdf = to_pdf(&log(&recs), &images, PdfOpts::default().with_compress(false)).unwrap();
    assert_eq!(count(&operators(&pdf), "Do"), 2);

    let doc = Document::load_mem(&pdf).unwrap();
    let masks: Vec<&Stream> = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| s.dict.get(b"ImageMask").is_ok())
        .collect();
    assert_eq!(masks.len(), 1);
    assert_eq!(masks[0].content, vec![0b0100_0000]);
}

#[test]
fn mask_packing_pads_rows() {
    let alpha = [255, 0, 255, 255, 255, 255, 255, 255, 0, 255, 255, 255, 255, 255, 255, 255, 255, 0];
    assert_eq!(
        pack_mask(&alpha, 9),
        vec![0b0100_0000, 0b1000_0000, 0, 0b1000_0000]
    );
}
