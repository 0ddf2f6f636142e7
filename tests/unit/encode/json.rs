use super::*;
use crate::buffer::images::ImageData;
use crate::foundation::core::{Pt, Quad};
use crate::record::codec;
use crate::record::order::ByteOrder;

fn log(recs: &[Record]) -> Vec<u8> {
    let mut out = Vec::new();
    codec::encode(&Record::header(64.0, 32.0), ByteOrder::native(), &mut out);
    for r in recs {
        codec::encode(r, ByteOrder::native(), &mut out);
    }
    out
}

fn parse(s: &str) -> Vec<Value> {
    match serde_json::from_str(s).unwrap() {
        Value::Array(v) => v,
        other => panic!("expected an array, got {other}"),
    }
}

#[test]
fn commands_are_ordered_cmd_args_objects() {
    let recs = [
        Record::MoveTo(Pt::new(1.0, 2.0)),
        Record::Color(5),
        Record::Font {
            size: 10.0,
            name: "Courier".to_string(),
        },
    ];
    let out = parse(&to_json(&log(&recs), &ImageTable::new(), JsonOpts::default()).unwrap());
    assert_eq!(out.len(), 4);
    assert_eq!(out[0], json!({"cmd": "setwindow", "args": [2.0, 64.0, 32.0]}));
    assert_eq!(out[1], json!({"cmd": "moveto", "args": [1.0, 2.0]}));
    assert_eq!(out[2], json!({"cmd": "setcolor", "args": [5]}));
    assert_eq!(out[3], json!({"cmd": "setfont", "args": ["Courier", 10.0]}));
}

#[test]
fn images_embed_base64_pixels_at_the_pen() {
    let mut images = ImageTable::new();
    images
        .add(ImageData {
            width: 1,
            height: 2,
            depth: 1,
            pixels: &[0, 255],
        })
        .unwrap();
    let recs = [
        Record::MoveTo(Pt::new(3.0, 4.0)),
        Record::Image(Quad::new(0.0, 0.0, 10.0, 20.0)),
        Record::Image(Quad::new(1.0, 0.0, 10.0, 20.0)),
        Record::Color(1),
    ];
    let out = parse(&to_json(&log(&recs), &images, JsonOpts::default()).unwrap());
    assert_eq!(out.len(), 4);
    assert_eq!(
        out[2],
        json!({
            "cmd": "image",
            "args": [0, 3.0, 4.0, 13.0, 24.0],
            "image": {"width": 1, "height": 2, "depth": 1, "data": "AP8="}
        })
    );
    assert_eq!(out[3]["cmd"], "setcolor");
}

#[test]
fn stamps_are_included_when_present() {
    let mut bytes = log(&[Record::Timestamp(1)]);
    bytes.extend_from_slice(&ByteOrder::native().i32_bytes(12));
    codec::encode(&Record::LineWidth(2), ByteOrder::native(), &mut bytes);
    let out = parse(&to_json(&bytes, &ImageTable::new(), JsonOpts::default().with_pretty(true)).unwrap());
    assert!(out[1].get("stamp").is_none());
    assert_eq!(out[2], json!({"cmd": "setlinewidth", "args": [2], "stamp": 12}));
}
