//! Raster drawing primitives for annotation overlays.
//!
//! Everything here operates directly on an [`RgbImage`] and clips to the
//! raster bounds: out-of-range pixels are silently dropped, so callers
//! never need to pre-clamp coordinates. Text uses the 8x8 bitmap glyphs
//! from `font8x8` scaled by an integer factor, which keeps text metrics
//! exact and deterministic without shipping a font file.

use font8x8::legacy::BASIC_LEGACY;
use image::RgbImage;

use crate::color::Bgr;
use crate::label::Point;

/// Glyph cell edge in pixels before scaling.
const GLYPH_SIZE: i64 = 8;

/// Set a single pixel, ignoring coordinates outside the raster.
fn put_pixel(img: &mut RgbImage, x: i64, y: i64, color: Bgr) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color.to_rgb());
    }
}

/// Draw a thick line segment by sampling along its length.
///
/// A square brush covering exactly `stroke` pixels per axis is stamped at
/// each sample (even widths hang one pixel further toward positive), with
/// two samples per pixel of segment length so the stroke has no gaps.
pub fn draw_line(img: &mut RgbImage, from: Point, to: Point, stroke: i64, color: Bgr) {
    let (x0, y0) = (from.0 as f64, from.1 as f64);
    let (x1, y1) = (to.0 as f64, to.1 as f64);

    let dx = x1 - x0;
    let dy = y1 - y0;
    let len = (dx * dx + dy * dy).sqrt();
    let steps = ((len * 2.0) as i64).max(1);
    let stroke = stroke.max(1);
    let lo = -((stroke - 1) / 2);
    let hi = stroke / 2;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let cx = (x0 + dx * t).round() as i64;
        let cy = (y0 + dy * t).round() as i64;
        for oy in lo..=hi {
            for ox in lo..=hi {
                put_pixel(img, cx + ox, cy + oy, color);
            }
        }
    }
}

/// Outline a closed polygon: every consecutive edge plus the closing edge
/// back to the first vertex.
///
/// Degenerate polygons (fewer than two vertices) draw nothing.
pub fn draw_closed_polyline(img: &mut RgbImage, vertices: &[Point], stroke: i64, color: Bgr) {
    if vertices.len() < 2 {
        return;
    }
    for pair in vertices.windows(2) {
        draw_line(img, pair[0], pair[1], stroke, color);
    }
    let first = vertices[0];
    let last = vertices[vertices.len() - 1];
    draw_line(img, last, first, stroke, color);
}

/// Fill an axis-aligned rectangle given two opposite corners in any order.
pub fn fill_rect(img: &mut RgbImage, a: Point, b: Point, color: Bgr) {
    let x_min = a.0.min(b.0);
    let x_max = a.0.max(b.0);
    let y_min = a.1.min(b.1);
    let y_max = a.1.max(b.1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            put_pixel(img, x, y, color);
        }
    }
}

/// Measured `(width, height)` of `text` at integer `scale`.
///
/// Every glyph cell advances by the same `8 * scale`, non-ASCII included,
/// so layout never depends on the characters actually present.
pub fn text_size(text: &str, scale: i64) -> (i64, i64) {
    let chars = text.chars().count() as i64;
    (chars * GLYPH_SIZE * scale, GLYPH_SIZE * scale)
}

/// Render `text` with its top-left corner at `origin`.
///
/// Characters outside the basic ASCII range render as blank cells of the
/// same advance, keeping [`text_size`] accurate for any input.
pub fn draw_text(img: &mut RgbImage, text: &str, origin: Point, scale: i64, color: Bgr) {
    let (ox, oy) = origin;

    for (index, ch) in text.chars().enumerate() {
        let code = ch as usize;
        if code >= BASIC_LEGACY.len() {
            continue;
        }
        let glyph = BASIC_LEGACY[code];
        let cell_x = ox + index as i64 * GLYPH_SIZE * scale;

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // Bit 0 is the leftmost pixel of the glyph row.
                if bits >> col & 1 == 0 {
                    continue;
                }
                let px = cell_x + col * scale;
                let py = oy + row as i64 * scale;
                fill_rect(img, (px, py), (px + scale - 1, py + scale - 1), color);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Bgr = Bgr([0, 0, 255]);

    fn blank(w: u32, h: u32) -> RgbImage {
        RgbImage::new(w, h)
    }

    #[test]
    fn horizontal_line_colors_its_pixels() {
        let mut img = blank(40, 40);
        draw_line(&mut img, (5, 20), (35, 20), 2, RED);
        assert_eq!(*img.get_pixel(20, 20), RED.to_rgb());
        assert_eq!(*img.get_pixel(5, 20), RED.to_rgb());
        assert_eq!(*img.get_pixel(35, 20), RED.to_rgb());
        // Far away from the stroke, nothing changed.
        assert_eq!(*img.get_pixel(20, 5), image::Rgb([0, 0, 0]));
    }

    #[test]
    fn stroke_covers_exactly_its_width() {
        let mut img = blank(40, 40);
        draw_line(&mut img, (5, 20), (35, 20), 2, RED);
        let painted: Vec<u32> = (0..40)
            .filter(|&y| *img.get_pixel(20, y) == RED.to_rgb())
            .collect();
        assert_eq!(painted, vec![20, 21]);

        let mut img = blank(40, 40);
        draw_line(&mut img, (5, 20), (35, 20), 1, RED);
        let painted: Vec<u32> = (0..40)
            .filter(|&y| *img.get_pixel(20, y) == RED.to_rgb())
            .collect();
        assert_eq!(painted, vec![20]);
    }

    #[test]
    fn line_clips_outside_raster() {
        let mut img = blank(10, 10);
        // Mostly out of bounds; must not panic.
        draw_line(&mut img, (-20, 5), (30, 5), 2, RED);
        assert_eq!(*img.get_pixel(5, 5), RED.to_rgb());
    }

    #[test]
    fn closed_polyline_draws_the_closing_edge() {
        let mut img = blank(50, 50);
        // Open triangle: the edge (10,40) -> (10,10) exists only via closing.
        draw_closed_polyline(&mut img, &[(10, 10), (40, 10), (10, 40)], 2, RED);
        assert_eq!(*img.get_pixel(10, 25), RED.to_rgb());
    }

    #[test]
    fn degenerate_polygon_draws_nothing() {
        let mut img = blank(10, 10);
        draw_closed_polyline(&mut img, &[(5, 5)], 2, RED);
        assert_eq!(img, blank(10, 10));
    }

    #[test]
    fn fill_rect_covers_inclusive_bounds() {
        let mut img = blank(20, 20);
        fill_rect(&mut img, (12, 15), (3, 4), RED);
        assert_eq!(*img.get_pixel(3, 4), RED.to_rgb());
        assert_eq!(*img.get_pixel(12, 15), RED.to_rgb());
        assert_eq!(*img.get_pixel(7, 10), RED.to_rgb());
        assert_eq!(*img.get_pixel(13, 15), image::Rgb([0, 0, 0]));
    }

    #[test]
    fn text_size_is_linear_in_length_and_scale() {
        assert_eq!(text_size("", 1), (0, 8));
        assert_eq!(text_size("abc", 1), (24, 8));
        assert_eq!(text_size("abc", 2), (48, 16));
        assert_eq!(text_size("Result: FAIL", 1), (96, 8));
    }

    #[test]
    fn draw_text_stays_inside_its_measured_box() {
        let mut img = blank(100, 30);
        let (w, h) = text_size("OK", 2);
        draw_text(&mut img, "OK", (10, 5), 2, RED);

        let mut hits = 0;
        for y in 0..img.height() as i64 {
            for x in 0..img.width() as i64 {
                if *img.get_pixel(x as u32, y as u32) == RED.to_rgb() {
                    assert!(x >= 10 && x < 10 + w, "pixel x={x} outside text box");
                    assert!(y >= 5 && y < 5 + h, "pixel y={y} outside text box");
                    hits += 1;
                }
            }
        }
        assert!(hits > 0, "text rendered no pixels");
    }
}
