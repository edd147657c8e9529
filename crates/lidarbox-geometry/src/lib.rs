#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Canonical 3D bounding box, 8-corner derivation, and half-space facets.
pub mod box3d;

/// Error types for the geometry crate.
pub mod error;

/// Oriented and axis-aligned IoU computation.
pub mod iou;

/// 2D convex polygon clipping, area, and convex hull.
pub mod polygon;

pub use box3d::{facets_from_corners, Box3D, Facet};
pub use error::GeometryError;
