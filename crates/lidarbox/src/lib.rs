#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use lidarbox_geometry as geometry;

#[doc(inline)]
pub use lidarbox_targets as targets;

#[doc(inline)]
pub use lidarbox_label as label;

#[doc(inline)]
pub use lidarbox_eval as eval;
