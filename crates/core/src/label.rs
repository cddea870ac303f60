//! Label payloads for one inspection image.
//!
//! Mirrors the JSON shape returned by the inspection API's `labels`
//! endpoint: an ordered list of labels, each carrying a class name plus
//! either segmentation polygons or an axis-aligned bounding box.

use serde::Deserialize;

/// A pixel coordinate pair `(x, y)`.
///
/// Deserializes from the API's two-element JSON arrays.
pub type Point = (i64, i64);

/// Ordered set of labels for a single image.
///
/// May be empty; an empty set makes annotation a byte-exact passthrough.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotationSet {
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl AnnotationSet {
    /// Whether the set carries no labels at all.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A single detected object: class name plus shape data.
///
/// A label may carry segmentation polygons, a bounding box, both, or
/// neither. Polygons take precedence over the box when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    /// Class name of the detected object type.
    pub name: String,
    /// Segmentation polygons; the first polygon is the rendered outline.
    #[serde(default)]
    pub segment_polygons: Option<Vec<Vec<Point>>>,
    /// Axis-aligned bounding box fallback.
    #[serde(default)]
    pub bndbox: Option<BoundingBox>,
}

impl Label {
    /// Resolve the closed outline for this label.
    ///
    /// Polygon data wins over the bounding box; a label with neither (or
    /// with an empty polygon list) yields `None` and is skipped by the
    /// renderer rather than treated as an error.
    pub fn outline(&self) -> Option<Vec<Point>> {
        if let Some(polygons) = &self.segment_polygons {
            if let Some(first) = polygons.first() {
                if !first.is_empty() {
                    return Some(first.clone());
                }
            }
        }
        self.bndbox.as_ref().map(BoundingBox::to_quad)
    }
}

/// Four integer edges of an axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoundingBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl BoundingBox {
    /// Convert to a closed 4-vertex polygon.
    ///
    /// The vertex order is fixed: `(xmax,ymax) -> (xmax,ymin) ->
    /// (xmin,ymin) -> (xmin,ymax)`. Downstream rendering closes the quad
    /// back to the first vertex.
    pub fn to_quad(&self) -> Vec<Point> {
        vec![
            (self.xmax, self.ymax),
            (self.xmax, self.ymin),
            (self.xmin, self.ymin),
            (self.xmin, self.ymax),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
