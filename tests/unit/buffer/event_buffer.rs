use super::*;
use crate::foundation::core::{Pt, Quad};
use crate::record::reader::decode_all;

fn records(buf: &EventBuffer) -> Vec<Record> {
    decode_all(buf.bytes())
        .unwrap()
        .into_iter()
        .map(|e| e.record)
        .collect()
}

#[test]
fn new_buffer_holds_only_a_header() {
    let buf = EventBuffer::new(RecorderOpts::default(), 640.0, 480.0).unwrap();
    assert_eq!(records(&buf), vec![Record::header(640.0, 480.0)]);
    assert!(buf.is_empty());
    assert!(buf.is_recording());
    assert_eq!(buf.capacity(), DEFAULT_GROW_INCREMENT);
}

#[test]
fn capacity_grows_in_fixed_steps() {
    let opts = RecorderOpts::default().with_grow_increment(16);
    let mut buf = EventBuffer::new(opts, 10.0, 10.0).unwrap();
    assert_eq!(buf.len(), 13);
    assert_eq!(buf.capacity(), 16);

    buf.append(&Record::Poly(vec![0.0; 20])).unwrap();
    assert_eq!(buf.len(), 13 + 5 + 80);
    assert_eq!(buf.capacity() % 16, 0);
    assert!(buf.capacity() >= buf.len());
    assert!(buf.capacity() < buf.len() + 16);
}

#[test]
fn drawing_clears_empty_flag_and_reset_restores_it() {
    let mut buf = EventBuffer::new(RecorderOpts::default(), 10.0, 10.0).unwrap();
    buf.append(&Record::Color(3)).unwrap();
    buf.append(&Record::MoveTo(Pt::new(1.0, 1.0))).unwrap();
    assert!(buf.is_empty());
    buf.append(&Record::Line(Quad::new(0.0, 0.0, 1.0, 1.0))).unwrap();
    assert!(!buf.is_empty());

    buf.add_image(ImageData {
        width: 1,
        height: 1,
        depth: 1,
        pixels: &[0],
    })
    .unwrap();
    buf.reset(20.0, 30.0).unwrap();
    assert!(buf.is_empty());
    assert!(buf.images().is_empty());
    assert_eq!(records(&buf), vec![Record::header(20.0, 30.0)]);
}

#[test]
fn foreign_order_buffer_decodes() {
    let opts = RecorderOpts::default().with_byte_order(ByteOrder::native().flipped());
    let mut buf = EventBuffer::new(opts, 64.0, 32.0).unwrap();
    buf.append(&Record::LineWidth(4)).unwrap();
    assert_eq!(
        records(&buf),
        vec![Record::header(64.0, 32.0), Record::LineWidth(4)]
    );
}

#[test]
fn timestamp_mode_prefixes_following_records() {
    let mut buf = EventBuffer::new(RecorderOpts::default(), 10.0, 10.0).unwrap();
    buf.append(&Record::Timestamp(1)).unwrap();
    assert!(buf.is_stamping());
    buf.push(&Record::Color(1), Some(42)).unwrap();
    buf.push(&Record::Timestamp(0), Some(43)).unwrap();
    buf.append(&Record::Color(2)).unwrap();

    let events = decode_all(buf.bytes()).unwrap();
    let stamps: Vec<Option<i32>> = events.iter().map(|e| e.stamp).collect();
    assert_eq!(stamps, vec![None, None, Some(42), Some(43), None]);
}

#[test]
fn from_bytes_rejects_garbage_and_keeps_state() {
    assert!(EventBuffer::from_bytes(vec![0xee], RecorderOpts::default()).is_err());

    let mut src = EventBuffer::new(RecorderOpts::default(), 10.0, 10.0).unwrap();
    src.append(&Record::Timestamp(1)).unwrap();
    src.append(&Record::Point(Pt::new(1.0, 1.0))).unwrap();
    let copy = EventBuffer::from_bytes(src.bytes().to_vec(), RecorderOpts::default()).unwrap();
    assert!(copy.is_stamping());
    assert!(!copy.is_empty());
    assert_eq!(copy.bytes(), src.bytes());
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.gbuf");
    let mut buf = EventBuffer::new(RecorderOpts::default(), 100.0, 50.0).unwrap();
    buf.append(&Record::Text {
        x: 1.0,
        y: 2.0,
        text: "hi".to_string(),
    })
    .unwrap();
    buf.save(&path).unwrap();

    let loaded = EventBuffer::load(&path, RecorderOpts::default()).unwrap();
    assert_eq!(loaded.bytes(), buf.bytes());
}

#[test]
fn loaded_foreign_log_appends_in_its_own_order() {
    let foreign = ByteOrder::native().flipped();
    let opts = RecorderOpts::default().with_byte_order(foreign);
    let mut src = EventBuffer::new(opts, 64.0, 32.0).unwrap();
    src.append(&Record::MoveTo(Pt::new(1.0, 1.0))).unwrap();

    let mut buf = EventBuffer::from_bytes(src.bytes().to_vec(), RecorderOpts::default()).unwrap();
    assert_eq!(buf.opts().byte_order(), foreign);
    buf.append(&Record::LineTo(Pt::new(100.0, 200.0))).unwrap();
    assert_eq!(
        records(&buf),
        vec![
            Record::header(64.0, 32.0),
            Record::MoveTo(Pt::new(1.0, 1.0)),
            Record::LineTo(Pt::new(100.0, 200.0)),
        ]
    );
}

#[test]
fn headerless_log_keeps_requested_order() {
    let foreign = ByteOrder::native().flipped();
    let bytes = codec::encode_to_vec(&Record::Color(2), ByteOrder::native());
    let opts = RecorderOpts::default().with_byte_order(foreign);
    let buf = EventBuffer::from_bytes(bytes, opts).unwrap();
    assert_eq!(buf.opts().byte_order(), foreign);
}

#[test]
fn stamp_clock_resumes_after_rebuild() {
    let mut src = EventBuffer::new(RecorderOpts::default(), 10.0, 10.0).unwrap();
    src.append(&Record::Timestamp(1)).unwrap();
    src.push(&Record::Color(1), Some(5000)).unwrap();

    let mut buf = EventBuffer::from_bytes(src.bytes().to_vec(), RecorderOpts::default()).unwrap();
    buf.append(&Record::Color(2)).unwrap();
    let last = decode_all(buf.bytes()).unwrap().pop().unwrap();
    assert!(last.stamp.unwrap() >= 5000);

    src.append(&Record::Color(3)).unwrap();
    let last = decode_all(src.bytes()).unwrap().pop().unwrap();
    assert!(last.stamp.unwrap() >= 5000);
}
