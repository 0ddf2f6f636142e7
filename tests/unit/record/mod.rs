use super::*;

#[test]
fn tags_are_dense_and_round_trip() {
    for (i, op) in Opcode::ALL.iter().enumerate() {
        assert_eq!(*op as u8 as usize, i);
        assert_eq!(Opcode::from_u8(i as u8), Some(*op));
    }
    assert_eq!(Opcode::from_u8(23), None);
    assert_eq!(Opcode::from_u8(0xff), None);
}

#[test]
fn drawing_and_state_sets_are_disjoint() {
    let samples = [
        Record::Line(Quad::default()),
        Record::Clip(Quad::default()),
        Record::Color(1),
        Record::Font {
            size: 10.0,
            name: "Helvetica".to_string(),
        },
        Record::Text {
            x: 0.0,
            y: 0.0,
            text: "a".to_string(),
        },
        Record::Save(1),
        Record::MoveTo(Pt::new(1.0, 1.0)),
    ];
    for r in &samples {
        assert!(!(r.is_drawing() && r.is_state_change()), "{r:?}");
    }
    assert!(!Record::Save(1).is_state_change());
    assert!(!Record::Group(1).is_state_change());
    assert!(!Record::MoveTo(Pt::default()).is_drawing());
}

#[test]
fn class_sizes_match_layouts() {
    assert_eq!(Opcode::Header.class().fixed_size(), 12);
    assert_eq!(Opcode::Image.class().fixed_size(), 16);
    assert_eq!(Opcode::Timestamp.class().fixed_size(), 4);
    assert_eq!(Opcode::PsRef.class().fixed_size(), 12);
    assert_eq!(Opcode::FilledPoly.class().fixed_size(), 4);
}
