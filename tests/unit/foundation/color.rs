use super::*;

#[test]
fn small_values_index_the_palette() {
    assert_eq!(rgb(0), [255, 255, 255]);
    assert_eq!(rgb(1), [0, 0, 0]);
    assert_eq!(rgb(2), [255, 0, 0]);
    assert_eq!(rgb(31), [245, 222, 179]);
}

#[test]
fn large_values_are_packed_rgb() {
    assert_eq!(rgb(0x12_34_56), [0x12, 0x34, 0x56]);
    assert_eq!(rgb(32), [0, 0, 32]);
}

#[test]
fn negative_values_are_black() {
    assert_eq!(rgb(-5), [0, 0, 0]);
}

#[test]
fn nearest_picks_closest_entry() {
    let table = [[0, 0, 0], [255, 0, 0], [0, 0, 255]];
    assert_eq!(nearest(2, &table), 1);
    assert_eq!(nearest(0x00_00_F0, &table), 2);
    assert_eq!(nearest(1, &table), 0);
}
