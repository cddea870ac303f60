//! Core domain model and annotation renderer for the inspection gallery.
//!
//! This crate is pure and synchronous: it performs no I/O and holds no
//! shared state. The building blocks are:
//!
//! - [`label`] — label payloads as returned by the inspection API
//!   (polygons, bounding boxes, class names).
//! - [`color`] — BGR color triples and the per-call class color map.
//! - [`draw`] — raster drawing primitives (lines, rectangles, bitmap text).
//! - [`annotator`] — the overlay renderer: outlines, color-key legend,
//!   result banner, JPEG re-encode.
//! - [`metadata`] — result-label extraction from file metadata.

pub mod annotator;
pub mod color;
pub mod draw;
pub mod error;
pub mod label;
pub mod metadata;

pub use annotator::annotate;
pub use color::{Bgr, ColorAssignment};
pub use error::CoreError;
pub use label::{AnnotationSet, BoundingBox, Label};
