//! Bin-based box target encoding.
//!
//! A box offset relative to a reference point is split into a coarse bin
//! index over a fixed search range plus a fine residual normalized to
//! `[-1, 1]` within the bin. The horizontal center offsets and the
//! orientation offset are bin-encoded; the vertical offset and the size
//! offset against a per-class mean size stay as direct residuals.

use lidarbox_geometry::box3d::Box3D;

/// Bin layout shared by the encoder and decoder.
///
/// The horizontal search range is `[-xz_search_range, +xz_search_range]`
/// split into bins of `xz_bin_len`; the orientation search range is
/// `[-theta_search_range, +theta_search_range]` split into bins of
/// `theta_bin_len`.
#[derive(Debug, Clone)]
pub struct BinGrid {
    /// Half-width of the horizontal search range.
    pub xz_search_range: f64,
    /// Bin length along the horizontal axes.
    pub xz_bin_len: f64,
    /// Half-width of the orientation search range, in radians.
    pub theta_search_range: f64,
    /// Bin length for the orientation, in radians.
    pub theta_bin_len: f64,
}

impl BinGrid {
    /// Number of horizontal bins covering the nominal search range.
    pub fn num_xz_bins(&self) -> usize {
        (2.0 * self.xz_search_range / self.xz_bin_len).round() as usize
    }

    /// Number of orientation bins covering the nominal search range.
    pub fn num_theta_bins(&self) -> usize {
        (2.0 * self.theta_search_range / self.theta_bin_len).round() as usize
    }
}

/// A box in bin-encoded target form.
///
/// Bin indices are signed: offsets outside the search range encode to
/// indices below 0 or at/above the nominal bin count. This silent
/// extrapolation mirrors the encoder contract; consumers bounded by the
/// nominal bin count must clip or discard such targets themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinTarget {
    /// Bin index of the x-axis center offset.
    pub bin_x: i64,
    /// Residual of the x offset within its bin, normalized to `[-1, 1]`.
    pub res_x_norm: f64,
    /// Bin index of the z-axis center offset.
    pub bin_z: i64,
    /// Residual of the z offset within its bin, normalized to `[-1, 1]`.
    pub res_z_norm: f64,
    /// Bin index of the orientation offset.
    pub bin_theta: i64,
    /// Residual of the orientation offset within its bin, normalized to `[-1, 1]`.
    pub res_theta_norm: f64,
    /// Direct vertical offset from the reference point.
    pub res_y: f64,
    /// Direct `[l, w, h]` residual against the mean size.
    pub res_size: [f64; 3],
}

#[inline]
fn bin_and_residual(offset: f64, search_range: f64, bin_len: f64) -> (i64, f64) {
    let bin = ((offset + search_range) / bin_len).floor();
    let residual = (offset + search_range - (bin + 0.5) * bin_len) / (0.5 * bin_len);
    (bin as i64, residual)
}

#[inline]
fn offset_from_bin(bin: i64, residual: f64, search_range: f64, bin_len: f64) -> f64 {
    (bin as f64 + 0.5) * bin_len - search_range + residual * 0.5 * bin_len
}

/// Encode a single box into bin-based target form.
///
/// # Arguments
///
/// * `ref_point` - Reference point the center offsets are taken against.
/// * `ref_theta` - Reference orientation the yaw offset is taken against.
/// * `box3d` - The box to encode.
/// * `mean_size` - Mean `[l, w, h]` of the box's class.
/// * `grid` - Bin layout.
///
/// Offsets beyond the grid's search ranges are not an error; they produce
/// bin indices outside `0..num_bins` (see [`BinTarget`]).
///
/// Example:
///
/// ```
/// use lidarbox_geometry::box3d::Box3D;
/// use lidarbox_targets::{decode_box, encode_box, BinGrid};
///
/// let grid = BinGrid {
///     xz_search_range: 3.0,
///     xz_bin_len: 0.5,
///     theta_search_range: std::f64::consts::PI / 4.0,
///     theta_bin_len: std::f64::consts::PI / 24.0,
/// };
/// let boxes = Box3D::new(1.2, -0.3, 0.8, 3.9, 1.6, 1.5, 0.2);
/// let reference = [1.0, 0.0, 1.0];
/// let mean_size = [3.8, 1.6, 1.6];
///
/// let target = encode_box(&reference, 0.0, &boxes, &mean_size, &grid);
/// let decoded = decode_box(&reference, 0.0, &target, &mean_size, &grid);
/// assert!((decoded.x - boxes.x).abs() < 1e-9);
/// ```
pub fn encode_box(
    ref_point: &[f64; 3],
    ref_theta: f64,
    box3d: &Box3D,
    mean_size: &[f64; 3],
    grid: &BinGrid,
) -> BinTarget {
    let dx = box3d.x - ref_point[0];
    let dy = box3d.y - ref_point[1];
    let dz = box3d.z - ref_point[2];
    let dtheta = box3d.ry - ref_theta;

    let (bin_x, res_x_norm) = bin_and_residual(dx, grid.xz_search_range, grid.xz_bin_len);
    let (bin_z, res_z_norm) = bin_and_residual(dz, grid.xz_search_range, grid.xz_bin_len);
    let (bin_theta, res_theta_norm) =
        bin_and_residual(dtheta, grid.theta_search_range, grid.theta_bin_len);

    BinTarget {
        bin_x,
        res_x_norm,
        bin_z,
        res_z_norm,
        bin_theta,
        res_theta_norm,
        res_y: dy,
        res_size: [
            box3d.l - mean_size[0],
            box3d.w - mean_size[1],
            box3d.h - mean_size[2],
        ],
    }
}

/// Decode a bin-based target back into a box.
///
/// Exact algebraic inverse of [`encode_box`] under the same reference point,
/// orientation, mean size, and grid.
pub fn decode_box(
    ref_point: &[f64; 3],
    ref_theta: f64,
    target: &BinTarget,
    mean_size: &[f64; 3],
    grid: &BinGrid,
) -> Box3D {
    Box3D {
        x: ref_point[0]
            + offset_from_bin(
                target.bin_x,
                target.res_x_norm,
                grid.xz_search_range,
                grid.xz_bin_len,
            ),
        y: ref_point[1] + target.res_y,
        z: ref_point[2]
            + offset_from_bin(
                target.bin_z,
                target.res_z_norm,
                grid.xz_search_range,
                grid.xz_bin_len,
            ),
        l: mean_size[0] + target.res_size[0],
        w: mean_size[1] + target.res_size[1],
        h: mean_size[2] + target.res_size[2],
        ry: ref_theta
            + offset_from_bin(
                target.bin_theta,
                target.res_theta_norm,
                grid.theta_search_range,
                grid.theta_bin_len,
            ),
    }
}

/// Encode a flat batch of boxes, one per reference point.
///
/// All slices must have the same length.
pub fn encode_boxes(
    ref_points: &[[f64; 3]],
    ref_thetas: &[f64],
    boxes: &[Box3D],
    mean_sizes: &[[f64; 3]],
    grid: &BinGrid,
) -> Vec<BinTarget> {
    assert_eq!(ref_points.len(), boxes.len());
    assert_eq!(ref_points.len(), ref_thetas.len());
    assert_eq!(ref_points.len(), mean_sizes.len());

    ref_points
        .iter()
        .zip(ref_thetas.iter())
        .zip(boxes.iter().zip(mean_sizes.iter()))
        .map(|((point, &theta), (box3d, mean_size))| {
            encode_box(point, theta, box3d, mean_size, grid)
        })
        .collect()
}

/// Decode a flat batch of targets, one per reference point.
///
/// All slices must have the same length.
pub fn decode_boxes(
    ref_points: &[[f64; 3]],
    ref_thetas: &[f64],
    targets: &[BinTarget],
    mean_sizes: &[[f64; 3]],
    grid: &BinGrid,
) -> Vec<Box3D> {
    assert_eq!(ref_points.len(), targets.len());
    assert_eq!(ref_points.len(), ref_thetas.len());
    assert_eq!(ref_points.len(), mean_sizes.len());

    ref_points
        .iter()
        .zip(ref_thetas.iter())
        .zip(targets.iter().zip(mean_sizes.iter()))
        .map(|((point, &theta), (target, mean_size))| {
            decode_box(point, theta, target, mean_size, grid)
        })
        .collect()
}

/// Encode a batch with a proposal dimension: one slice of proposals per
/// batch item, each proposal carrying its own reference point.
///
/// The arithmetic is identical to [`encode_boxes`]; only the nesting
/// differs.
pub fn encode_boxes_batched(
    ref_points: &[Vec<[f64; 3]>],
    ref_thetas: &[Vec<f64>],
    boxes: &[Vec<Box3D>],
    mean_sizes: &[Vec<[f64; 3]>],
    grid: &BinGrid,
) -> Vec<Vec<BinTarget>> {
    assert_eq!(ref_points.len(), boxes.len());
    assert_eq!(ref_points.len(), ref_thetas.len());
    assert_eq!(ref_points.len(), mean_sizes.len());

    ref_points
        .iter()
        .zip(ref_thetas.iter())
        .zip(boxes.iter().zip(mean_sizes.iter()))
        .map(|((points, thetas), (item_boxes, item_means))| {
            encode_boxes(points, thetas, item_boxes, item_means, grid)
        })
        .collect()
}

/// Decode a batch with a proposal dimension (inverse of
/// [`encode_boxes_batched`]).
pub fn decode_boxes_batched(
    ref_points: &[Vec<[f64; 3]>],
    ref_thetas: &[Vec<f64>],
    targets: &[Vec<BinTarget>],
    mean_sizes: &[Vec<[f64; 3]>],
    grid: &BinGrid,
) -> Vec<Vec<Box3D>> {
    assert_eq!(ref_points.len(), targets.len());
    assert_eq!(ref_points.len(), ref_thetas.len());
    assert_eq!(ref_points.len(), mean_sizes.len());

    ref_points
        .iter()
        .zip(ref_thetas.iter())
        .zip(targets.iter().zip(mean_sizes.iter()))
        .map(|((points, thetas), (item_targets, item_means))| {
            decode_boxes(points, thetas, item_targets, item_means, grid)
        })
        .collect()
}
