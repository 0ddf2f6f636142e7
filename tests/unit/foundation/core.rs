use super::*;

#[test]
fn image_id_requires_non_negative_integer() {
    assert_eq!(Quad::new(3.0, 0.0, 1.0, 1.0).image_id(), Some(ImageId(3)));
    assert_eq!(Quad::new(0.0, 0.0, 1.0, 1.0).image_id(), Some(ImageId(0)));
    assert_eq!(Quad::new(-1.0, 0.0, 1.0, 1.0).image_id(), None);
    assert_eq!(Quad::new(2.5, 0.0, 1.0, 1.0).image_id(), None);
    assert_eq!(Quad::new(f32::NAN, 0.0, 1.0, 1.0).image_id(), None);
}

#[test]
fn quad_rect_is_normalized() {
    let r = Quad::new(10.0, 20.0, 0.0, 5.0).rect();
    assert_eq!(r, Rect::new(0.0, 5.0, 10.0, 20.0));
}

#[test]
fn unknown_line_style_is_solid() {
    assert!(line_style::dash_pattern(42).is_empty());
    assert_eq!(line_style::dash_pattern(line_style::DOTTED), &[1.0, 3.0]);
}
