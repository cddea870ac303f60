//! BGR color triples and the per-call class color map.

use indexmap::IndexMap;
use rand::Rng;

/// A color triple in (blue, green, red) channel order.
///
/// BGR is the contract order for the annotation overlays; rasters held by
/// the `image` crate are RGB, so [`Bgr::to_rgb`] transposes at the drawing
/// boundary. Getting this transposition wrong swaps red and blue in every
/// overlay, so it lives in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bgr(pub [u8; 3]);

impl Bgr {
    pub const WHITE: Bgr = Bgr([255, 255, 255]);
    pub const BLACK: Bgr = Bgr([0, 0, 0]);

    /// Sample a random color, each channel uniform in `[50, 255]`.
    ///
    /// The lower bound keeps swatches away from near-black, where they
    /// would vanish against the banner background and dark image regions.
    pub fn random(rng: &mut impl Rng) -> Self {
        Bgr([
            rng.random_range(50..=255),
            rng.random_range(50..=255),
            rng.random_range(50..=255),
        ])
    }

    /// Transpose to the `image` crate's RGB pixel order.
    pub fn to_rgb(self) -> image::Rgb<u8> {
        let Bgr([b, g, r]) = self;
        image::Rgb([r, g, b])
    }
}

/// Insertion-ordered class name -> color map, built once per annotate call.
///
/// The first label bearing a class name fixes its color; later labels of
/// the same class reuse it. Colors are not guaranteed distinct across
/// classes (collisions are accepted), and the map is never shared across
/// calls, so separate invocations recolor the same class independently.
#[derive(Debug, Default)]
pub struct ColorAssignment {
    colors: IndexMap<String, Bgr>,
}

impl ColorAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `name`, assigning a fresh random one on first sight.
    pub fn color_for(&mut self, name: &str, rng: &mut impl Rng) -> Bgr {
        if let Some(color) = self.colors.get(name) {
            return *color;
        }
        let color = Bgr::random(rng);
        self.colors.insert(name.to_string(), color);
        color
    }

    /// Iterate `(class name, color)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Bgr)> {
        self.colors.iter().map(|(name, color)| (name.as_str(), *color))
    }

    /// Number of distinct classes seen so far.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
