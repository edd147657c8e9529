#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Bin-based box encoding and decoding.
pub mod bins;

pub use bins::{
    decode_box, decode_boxes, decode_boxes_batched, encode_box, encode_boxes,
    encode_boxes_batched, BinGrid, BinTarget,
};
