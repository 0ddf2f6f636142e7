/// Number of indexed entries in the standard palette.
pub const PALETTE_LEN: i32 = 32;

/// Standard color table used when a color value is a small index.
const PALETTE: [[u8; 3]; PALETTE_LEN as usize] = [
    [255, 255, 255], // 0 white
    [0, 0, 0],       // 1 black
    [255, 0, 0],     // 2 red
    [0, 200, 0],     // 3 green
    [0, 0, 255],     // 4 blue
    [0, 200, 200],   // 5 cyan
    [200, 0, 200],   // 6 magenta
    [230, 200, 0],   // 7 yellow
    [255, 140, 0],   // 8 orange
    [128, 0, 160],   // 9 purple
    [140, 80, 20],   // 10 brown
    [255, 150, 180], // 11 pink
    [128, 128, 128], // 12 gray
    [200, 200, 200], // 13 light gray
    [0, 100, 0],     // 14 dark green
    [0, 0, 128],     // 15 navy
    [128, 0, 0],     // 16 maroon
    [128, 128, 0],   // 17 olive
    [0, 128, 128],   // 18 teal
    [64, 64, 64],    // 19 dark gray
    [255, 215, 0],   // 20 gold
    [75, 0, 130],    // 21 indigo
    [250, 128, 114], // 22 salmon
    [173, 216, 230], // 23 light blue
    [144, 238, 144], // 24 light green
    [255, 255, 224], // 25 light yellow
    [210, 105, 30],  // 26 chocolate
    [70, 130, 180],  // 27 steel blue
    [154, 205, 50],  // 28 yellow green
    [220, 20, 60],   // 29 crimson
    [0, 191, 255],   // 30 sky blue
    [245, 222, 179], // 31 wheat
];

/// The standard palette, indexed by color value.
pub fn palette() -> &'static [[u8; 3]] {
    &PALETTE
}

/// Resolve a recorded color value to 8-bit RGB.
///
/// Values below [`PALETTE_LEN`] index the standard palette, larger values are packed `0xRRGGBB`.
/// Negative values draw black.
pub fn rgb(value: i32) -> [u8; 3] {
    if value < 0 {
        return PALETTE[1];
    }
    if value < PALETTE_LEN {
        return PALETTE[value as usize];
    }
    let v = value as u32;
    [(v >> 16) as u8, (v >> 8) as u8, v as u8]
}

/// Resolve a recorded color value to unit-range RGB.
pub fn rgb_unit(value: i32) -> [f32; 3] {
    let [r, g, b] = rgb(value);
    [
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    ]
}

/// Index of the entry in `table` closest to `value` by squared RGB distance.
pub fn nearest(value: i32, table: &[[u8; 3]]) -> usize {
    let [r, g, b] = rgb(value);
    let dist = |c: &[u8; 3]| {
        let dr = i32::from(r) - i32::from(c[0]);
        let dg = i32::from(g) - i32::from(c[1]);
        let db = i32::from(b) - i32::from(c[2]);
        dr * dr + dg * dg + db * db
    };
    table
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| dist(c))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
