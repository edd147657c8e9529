#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Explicit class-name registry with per-class mean sizes.
pub mod classes;

/// Point-in-box labeling engine.
pub mod engine;

/// Persisted per-sample label files.
pub mod store;

pub use classes::ClassMap;
pub use engine::{build_label_seg, label_point_cloud, point_inside_facets, LABEL_FIELDS};
pub use store::{LabelStore, LabelStoreError};
