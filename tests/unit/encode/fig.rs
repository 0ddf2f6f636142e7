use super::*;
use crate::buffer::images::ImageData;
use crate::record::codec;
use crate::record::order::ByteOrder;

fn log(recs: &[Record]) -> Vec<u8> {
    let mut out = Vec::new();
    codec::encode(&Record::header(100.0, 100.0), ByteOrder::native(), &mut out);
    for r in recs {
        codec::encode(r, ByteOrder::native(), &mut out);
    }
    out
}

#[test]
fn lineto_run_terminates_once() {
    for n in [1, 3, 8] {
        let mut recs = vec![Record::MoveTo(Pt::new(10.0, 10.0))];
        for i in 0..n {
            recs.push(Record::LineTo(Pt::new(20.0 + i as f32, 30.0)));
        }
        recs.push(Record::Color(2));
        let fig = to_fig(&log(&recs), &ImageTable::new()).unwrap();
        assert_eq!(fig.matches("9999 9999").count(), 1, "n = {n}");
        assert!(fig.starts_with("#FIG 2.1\n80 2\n2 1 0 1 0 0 0 0 0.000 0 0 0\n\t 10 90 20 70"));
    }
}

#[test]
fn colors_map_to_nearest_fig_color() {
    let recs = [
        Record::Color(2),
        Record::LineWidth(3),
        Record::Line(Quad::new(0.0, 0.0, 10.0, 10.0)),
        Record::Color(0x00_00_F0),
        Record::LineStyle(2),
        Record::Line(Quad::new(0.0, 0.0, 10.0, 10.0)),
    ];
    let fig = to_fig(&log(&recs), &ImageTable::new()).unwrap();
    let lines: Vec<&str> = fig.lines().collect();
    assert_eq!(lines[2], "2 1 0 3 4 0 0 0 0.000 0 0 0");
    assert_eq!(lines[3], "\t 0 100 10 90 9999 9999");
    assert_eq!(lines[4], "2 1 2 3 1 0 0 0 3.000 0 0 0");
}

#[test]
fn filled_polygon_is_closed_and_filled() {
    let recs = [
        Record::FilledPoly(vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0]),
        Record::Circle(Quad::new(50.0, 50.0, 5.0, 1.0)),
    ];
    let fig = to_fig(&log(&recs), &ImageTable::new()).unwrap();
    let lines: Vec<&str> = fig.lines().collect();
    assert_eq!(lines[2], "2 3 0 1 0 0 0 21 0.000 0 0 0");
    assert_eq!(lines[3], "\t 0 100 10 100 10 90 0 100 9999 9999");
    assert_eq!(lines[4], "1 3 0 1 0 0 0 21 0.000 1 0.000 50 50 5 5 50 50 55 50");
}

#[test]
fn text_carries_justification_and_font() {
    let recs = [
        Record::Justification(1),
        Record::Text {
            x: 10.0,
            y: 20.0,
            text: "abcd".to_string(),
        },
    ];
    let fig = to_fig(&log(&recs), &ImageTable::new()).unwrap();
    assert!(fig.ends_with("4 1 0 12 0 0 0 0.000 4 12 24 10 80 abcd\u{1}\n"));
}

#[test]
fn images_become_picture_boxes() {
    let mut images = ImageTable::new();
    images
        .add(ImageData {
            width: 1,
            height: 1,
            depth: 3,
            pixels: &[1, 2, 3],
        })
        .unwrap();
    let recs = [
        Record::MoveTo(Pt::new(10.0, 10.0)),
        Record::Image(Quad::new(0.0, 0.0, 20.0, 10.0)),
        Record::Image(Quad::new(2.0, 0.0, 20.0, 10.0)),
    ];
    let fig = to_fig(&log(&recs), &images).unwrap();
    assert_eq!(fig.matches("2 5 0 1").count(), 1);
    assert!(fig.contains("\t0 image0\n\t 10 90 30 90 30 80 10 80 10 90 9999 9999\n"));
}
