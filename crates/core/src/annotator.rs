//! The annotation renderer: polygon outlines, color-key legend, result
//! banner, JPEG re-encode.
//!
//! [`annotate`] is a pure transformation over an in-memory byte buffer.
//! It performs no I/O, builds its class color map from scratch on every
//! call (colors are randomized per invocation, deliberately), and is safe
//! to call concurrently on independently owned inputs.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use rand::Rng;

use crate::color::{Bgr, ColorAssignment};
use crate::draw;
use crate::error::CoreError;
use crate::label::AnnotationSet;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------
// These are contract values: visual diffing against reference output
// depends on every one of them.

/// Edge length of a legend color swatch in pixels.
pub const SWATCH_SIZE: i64 = 50;

/// Vertical distance between consecutive legend swatch anchors.
pub const LEGEND_SPACING: i64 = 60;

/// Inset of overlays from the raster edges.
pub const EDGE_INSET: i64 = 10;

/// Outline stroke width in pixels.
pub const STROKE_WIDTH: i64 = 2;

/// Font scale for legend class names.
pub const LEGEND_FONT_SCALE: i64 = 2;

/// Font scale for the result banner.
pub const BANNER_FONT_SCALE: i64 = 1;

/// Margin around the banner text inside its background rectangle.
pub const BANNER_MARGIN: i64 = 10;

/// Horizontal gap between a legend swatch and its class name.
pub const LEGEND_TEXT_GAP: i64 = 5;

/// Annotate an encoded image with label outlines, a legend, and a result
/// banner, returning re-encoded JPEG bytes.
///
/// An empty annotation set is a byte-exact passthrough: the input buffer
/// is returned unchanged without decoding. Otherwise the bytes must
/// decode to a raster ([`CoreError::Decode`] if not) and the annotated
/// raster is re-encoded as JPEG at the encoder's default quality
/// ([`CoreError::Encode`] on failure).
pub fn annotate(
    image_bytes: &[u8],
    annotations: &AnnotationSet,
    result_label: &str,
) -> Result<Vec<u8>, CoreError> {
    if annotations.is_empty() {
        return Ok(image_bytes.to_vec());
    }

    let mut img = image::load_from_memory(image_bytes)
        .map_err(|e| CoreError::Decode(e.to_string()))?
        .to_rgb8();

    let mut rng = rand::rng();
    render_overlays(&mut img, annotations, result_label, &mut rng);

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .map_err(|e| CoreError::Encode(e.to_string()))?;
    Ok(out)
}

/// Draw all overlays onto a decoded raster.
///
/// Split out from [`annotate`] so the drawing logic can be exercised on
/// an un-encoded raster, where pixel assertions are exact.
fn render_overlays(
    img: &mut RgbImage,
    annotations: &AnnotationSet,
    result_label: &str,
    rng: &mut impl Rng,
) {
    let mut assignment = ColorAssignment::new();

    // Outlines. Every label fixes its class color on first sight, even
    // when it carries no drawable shape, so the class still shows up in
    // the legend.
    for label in &annotations.labels {
        let color = assignment.color_for(&label.name, rng);
        if let Some(outline) = label.outline() {
            draw::draw_closed_polyline(img, &outline, STROKE_WIDTH, color);
        }
    }

    draw_legend(img, &assignment);
    draw_banner(img, result_label);
}

/// Draw the color-key legend in the bottom-left corner.
///
/// One swatch per distinct class, stacked bottom-to-top in first-seen
/// order: swatch `i`'s bottom-left corner sits at
/// `(EDGE_INSET, height - EDGE_INSET - LEGEND_SPACING * i)`, with the
/// class name to its right, bottom-aligned with the swatch.
fn draw_legend(img: &mut RgbImage, assignment: &ColorAssignment) {
    let height = img.height() as i64;

    for (i, (name, color)) in assignment.iter().enumerate() {
        let bottom = height - EDGE_INSET - LEGEND_SPACING * i as i64;
        let top = bottom - SWATCH_SIZE;

        draw::fill_rect(
            img,
            (EDGE_INSET, top),
            (EDGE_INSET + SWATCH_SIZE, bottom),
            color,
        );

        let (_, text_height) = draw::text_size(name, LEGEND_FONT_SCALE);
        let text_x = EDGE_INSET + SWATCH_SIZE + LEGEND_TEXT_GAP;
        draw::draw_text(
            img,
            name,
            (text_x, bottom - text_height),
            LEGEND_FONT_SCALE,
            Bgr::WHITE,
        );
    }
}

/// Draw the result banner in the top-right corner: white text on an
/// opaque black background, `BANNER_MARGIN` around the text, right edge
/// `EDGE_INSET` from the raster's right edge, top `EDGE_INSET` from the
/// top.
fn draw_banner(img: &mut RgbImage, result_label: &str) {
    let width = img.width() as i64;
    let text = format!("Result: {result_label}");
    let (tw, th) = draw::text_size(&text, BANNER_FONT_SCALE);

    let bg_right = width - EDGE_INSET;
    let bg_left = bg_right - tw - 2 * BANNER_MARGIN;
    let bg_top = EDGE_INSET;
    let bg_bottom = bg_top + th + 2 * BANNER_MARGIN;

    draw::fill_rect(img, (bg_left, bg_top), (bg_right, bg_bottom), Bgr::BLACK);
    draw::draw_text(
        img,
        &text,
        (bg_left + BANNER_MARGIN, bg_top + BANNER_MARGIN),
        BANNER_FONT_SCALE,
        Bgr::WHITE,
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{BoundingBox, Label};
    use assert_matches::assert_matches;

    const BACKGROUND: image::Rgb<u8> = image::Rgb([120, 120, 120]);

    fn gray_raster(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, BACKGROUND)
    }

    fn jpeg_bytes(img: &RgbImage) -> Vec<u8> {
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .unwrap();
        out
    }

    fn box_label(name: &str, xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Label {
        Label {
            name: name.into(),
            segment_polygons: None,
            bndbox: Some(BoundingBox {
                xmin,
                ymin,
                xmax,
                ymax,
            }),
        }
    }

    fn set_of(labels: Vec<Label>) -> AnnotationSet {
        AnnotationSet { labels }
    }

    // -- Passthrough and decode failures -----------------------------------

    #[test]
    fn empty_set_is_byte_exact_passthrough() {
        // Not even decodable -- passthrough must not touch the bytes.
        let bytes = b"definitely not a jpeg".to_vec();
        let out = annotate(&bytes, &AnnotationSet::default(), "PASS").unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn undecodable_bytes_fail_with_decode_error() {
        let set = set_of(vec![box_label("defect", 0, 0, 10, 10)]);
        let err = annotate(b"garbage", &set, "FAIL").unwrap_err();
        assert_matches!(err, CoreError::Decode(_));
    }

    // -- Legend geometry and ordering --------------------------------------

    #[test]
    fn legend_swatches_stack_bottom_to_top_in_first_seen_order() {
        let mut img = gray_raster(400, 400);
        let set = set_of(vec![
            box_label("alpha", 200, 20, 240, 60),
            box_label("beta", 200, 100, 240, 140),
            box_label("gamma", 200, 180, 240, 220),
        ]);
        let mut rng = rand::rng();
        render_overlays(&mut img, &set, "", &mut rng);

        let h = 400_i64;
        for i in 0..3_i64 {
            let bottom = h - EDGE_INSET - LEGEND_SPACING * i;
            let top = bottom - SWATCH_SIZE;
            // Center of swatch i is filled with a non-background color.
            let center = *img.get_pixel(35, ((top + bottom) / 2) as u32);
            assert_ne!(center, BACKGROUND, "swatch {i} center not filled");
            // Row just above the swatch's top edge is untouched background
            // (the 10px gap between stacked swatches).
            let above = *img.get_pixel(35, (top - 2) as u32);
            assert_eq!(above, BACKGROUND, "gap above swatch {i} was painted");
        }

        // Swatch 0 (bottom) belongs to the first-seen class "alpha": its
        // color must match alpha's outline stroke.
        let swatch0 = *img.get_pixel(35, (h - EDGE_INSET - 25) as u32);
        let alpha_outline = *img.get_pixel(240, 40);
        assert_eq!(swatch0, alpha_outline);
    }

    #[test]
    fn duplicate_class_names_share_one_swatch() {
        let mut img = gray_raster(300, 300);
        let set = set_of(vec![
            box_label("defect", 100, 20, 140, 60),
            box_label("defect", 100, 100, 140, 140),
        ]);
        let mut rng = rand::rng();
        render_overlays(&mut img, &set, "", &mut rng);

        let h = 300_i64;
        // Slot 0 is filled...
        let slot0 = *img.get_pixel(35, (h - EDGE_INSET - 25) as u32);
        assert_ne!(slot0, BACKGROUND);
        // ...slot 1 stays background: only one distinct class.
        let slot1 = *img.get_pixel(35, (h - EDGE_INSET - LEGEND_SPACING - 25) as u32);
        assert_eq!(slot1, BACKGROUND);
    }

    #[test]
    fn same_class_uses_identical_color_for_outline_and_swatch() {
        let mut img = gray_raster(300, 300);
        let set = set_of(vec![
            box_label("weld", 50, 50, 120, 120),
            box_label("weld", 160, 160, 230, 230),
        ]);
        let mut rng = rand::rng();
        render_overlays(&mut img, &set, "", &mut rng);

        let first_outline = *img.get_pixel(120, 80);
        let second_outline = *img.get_pixel(230, 200);
        let swatch = *img.get_pixel(35, (300 - EDGE_INSET - 25) as u32);
        assert_eq!(first_outline, second_outline);
        assert_eq!(first_outline, swatch);
    }

    #[test]
    fn shapeless_label_still_appears_in_legend() {
        let mut img = gray_raster(300, 300);
        let set = set_of(vec![Label {
            name: "phantom".into(),
            segment_polygons: None,
            bndbox: None,
        }]);
        let mut rng = rand::rng();
        render_overlays(&mut img, &set, "", &mut rng);

        let swatch = *img.get_pixel(35, (300 - EDGE_INSET - 25) as u32);
        assert_ne!(swatch, BACKGROUND);
    }

    // -- Banner geometry ----------------------------------------------------

    #[test]
    fn banner_background_anchors_to_top_right() {
        let mut img = gray_raster(400, 200);
        let set = set_of(vec![box_label("defect", 50, 100, 90, 140)]);
        let mut rng = rand::rng();
        render_overlays(&mut img, &set, "FAIL", &mut rng);

        let w = 400_i64;
        // "Result: FAIL" is 12 glyph cells at scale 1.
        let (tw, _) = draw::text_size("Result: FAIL", BANNER_FONT_SCALE);
        assert_eq!(tw, 96);

        let bg_right = w - EDGE_INSET;
        let bg_left = bg_right - tw - 2 * BANNER_MARGIN;

        let black = image::Rgb([0, 0, 0]);
        assert_eq!(*img.get_pixel(bg_right as u32, 11), black);
        assert_eq!(*img.get_pixel(bg_left as u32, 11), black);
        // One pixel beyond either edge is untouched background.
        assert_eq!(*img.get_pixel((bg_right + 1) as u32, 11), BACKGROUND);
        assert_eq!(*img.get_pixel((bg_left - 1) as u32, 11), BACKGROUND);
        // Above the banner's top inset as well.
        assert_eq!(*img.get_pixel((bg_left + 5) as u32, 5), BACKGROUND);

        // White text pixels exist inside the banner.
        let white = image::Rgb([255, 255, 255]);
        let mut found_white = false;
        for y in EDGE_INSET..(EDGE_INSET + 28) {
            for x in bg_left..=bg_right {
                if *img.get_pixel(x as u32, y as u32) == white {
                    found_white = true;
                }
            }
        }
        assert!(found_white, "no white banner text rendered");
    }

    #[test]
    fn empty_result_label_renders_bare_banner() {
        let mut img = gray_raster(300, 100);
        let set = set_of(vec![box_label("defect", 10, 50, 40, 80)]);
        let mut rng = rand::rng();
        render_overlays(&mut img, &set, "", &mut rng);

        // "Result: " is 8 glyph cells wide.
        let (tw, _) = draw::text_size("Result: ", BANNER_FONT_SCALE);
        assert_eq!(tw, 64);
        let bg_left = 300 - EDGE_INSET - tw - 2 * BANNER_MARGIN;
        assert_eq!(*img.get_pixel(bg_left as u32, 11), image::Rgb([0, 0, 0]));
    }

    // -- End-to-end over the encode/decode boundary -------------------------

    #[test]
    fn end_to_end_jpeg_contains_outline_legend_and_banner() {
        // Black background: every random class color has channels >= 50,
        // so drawn pixels are always separable even after lossy JPEG.
        let input = jpeg_bytes(&RgbImage::new(100, 100));
        let set = set_of(vec![box_label("defect", 0, 0, 10, 10)]);

        let out = annotate(&input, &set, "FAIL").unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (100, 100));

        let bright = |p: image::Rgb<u8>, min_sum: i32| {
            p.0.iter().map(|&c| c as i32).sum::<i32>() > min_sum
        };

        // Outline: the box-derived quad covers the top-left 10x10 region.
        // Probe rows above the banner (which starts at y=10).
        let outline_hit = (0..10_u32)
            .flat_map(|y| (0..13_u32).map(move |x| (x, y)))
            .any(|(x, y)| bright(*decoded.get_pixel(x, y), 60));
        assert!(outline_hit, "no outline in the top-left region");

        // Legend swatch interior, bottom-left (swatch spans y 40..=90).
        assert!(
            bright(*decoded.get_pixel(35, 65), 60),
            "no legend swatch at the bottom-left"
        );

        // Banner text: white glyph pixels inside the banner band.
        let banner_hit = (18..30_u32)
            .flat_map(|y| (0..90_u32).map(move |x| (x, y)))
            .any(|(x, y)| bright(*decoded.get_pixel(x, y), 300));
        assert!(banner_hit, "no white banner text in the top-right band");
    }

    #[test]
    fn output_is_valid_jpeg() {
        let input = jpeg_bytes(&gray_raster(64, 64));
        let set = set_of(vec![box_label("defect", 5, 5, 20, 20)]);
        let out = annotate(&input, &set, "PASS").unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }
}
