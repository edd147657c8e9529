#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Recall computation over proposal-to-ground-truth IoU matrices.
pub mod recall;

pub use recall::{compute_recall_iou, RecallResult};
