//! Small image builders shared by the outline tests.
//!
//! Rows are given top to bottom as they appear in the buffer, so row `i` of
//! the picture is `y = i`. `#` is opaque, anything else transparent.

use ndarray::Array3;

fn picture_size(rows: &[&str]) -> (usize, usize) {
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    assert!(rows.iter().all(|r| r.len() == width), "ragged picture");
    (width, rows.len())
}

/// RGBA image with opaque pixels drawn in solid red.
pub fn rgba_image(rows: &[&str]) -> Array3<u8> {
    let (width, height) = picture_size(rows);
    let mut image = Array3::<u8>::zeros((height, width, 4));
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            image[[y, x, 0]] = 255;
            image[[y, x, 3]] = if ch == '#' { 255 } else { 0 };
        }
    }
    image
}

/// Single-channel alpha mask.
pub fn mask_image(rows: &[&str]) -> Array3<u8> {
    let (width, height) = picture_size(rows);
    let mut image = Array3::<u8>::zeros((height, width, 1));
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                image[[y, x, 0]] = 255;
            }
        }
    }
    image
}
