use super::*;

fn rgb(w: u32, h: u32, fill: u8) -> Vec<u8> {
    vec![fill; (w * h * 3) as usize]
}

#[test]
fn ids_are_previous_length() {
    let mut t = ImageTable::new();
    let px = rgb(2, 2, 7);
    for expected in 0..3 {
        let id = t
            .add(ImageData {
                width: 2,
                height: 2,
                depth: 3,
                pixels: &px,
            })
            .unwrap();
        assert_eq!(id, ImageId(expected));
    }
    assert_eq!(t.len(), 3);
    assert!(t.find(ImageId(3)).is_none());
    assert!(matches!(
        t.get(ImageId(3)),
        Err(GbufError::MissingImage(ImageId(3)))
    ));
}

#[test]
fn add_copies_pixels() {
    let mut t = ImageTable::new();
    let mut px = rgb(1, 1, 1);
    let id = t
        .add(ImageData {
            width: 1,
            height: 1,
            depth: 3,
            pixels: &px,
        })
        .unwrap();
    px[0] = 99;
    assert_eq!(t.find(id).unwrap().pixels, vec![1, 1, 1]);
}

#[test]
fn replace_same_shape_in_place_and_reshape() {
    let mut t = ImageTable::new();
    let id = t
        .add(ImageData {
            width: 2,
            height: 1,
            depth: 3,
            pixels: &rgb(2, 1, 0),
        })
        .unwrap();

    t.replace(
        id,
        ImageData {
            width: 2,
            height: 1,
            depth: 3,
            pixels: &rgb(2, 1, 5),
        },
    )
    .unwrap();
    assert_eq!(t.find(id).unwrap().pixels, vec![5; 6]);

    let rgba = vec![9u8; 3 * 2 * 4];
    t.replace(
        id,
        ImageData {
            width: 3,
            height: 2,
            depth: 4,
            pixels: &rgba,
        },
    )
    .unwrap();
    let e = t.find(id).unwrap();
    assert!(e.same_shape(3, 2, 4));
    assert_eq!(e.pixels.len(), 24);
}

#[test]
fn replace_missing_id_fails() {
    let mut t = ImageTable::new();
    let err = t
        .replace(
            ImageId(0),
            ImageData {
                width: 1,
                height: 1,
                depth: 1,
                pixels: &[0],
            },
        )
        .unwrap_err();
    assert!(matches!(err, GbufError::MissingImage(ImageId(0))));
}

#[test]
fn bad_dimensions_are_rejected() {
    let mut t = ImageTable::new();
    assert!(
        t.add(ImageData {
            width: 2,
            height: 2,
            depth: 3,
            pixels: &[0; 5],
        })
        .is_err()
    );
    assert!(
        t.add(ImageData {
            width: 1,
            height: 1,
            depth: 2,
            pixels: &[0; 2],
        })
        .is_err()
    );
    assert!(t.is_empty());
}
