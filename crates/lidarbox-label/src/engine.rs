//! Dense per-point segmentation labels from sparse object boxes.
//!
//! Every point of a cloud is tested against every box; points inside a box
//! are stamped with the box's class and geometry, everything else stays
//! background. The scan is O(points x boxes) with a cheap axis-aligned
//! bounding-box reject before the exact facet test, which is fine at
//! dataset scale since per-sample box counts stay in the tens.

use lidarbox_geometry::box3d::{facets_from_corners, Box3D, Facet};

/// Number of fields in a per-point label record:
/// `[class_id, x, y, z, l, w, h, ry]`.
pub const LABEL_FIELDS: usize = 8;

/// Check whether a point lies inside the convex region bounded by `facets`.
///
/// The point is inside iff it is on the non-negative side of every facet;
/// the first violated half-space short-circuits the test.
pub fn point_inside_facets(point: &[f64; 3], facets: &[Facet]) -> bool {
    facets
        .iter()
        .all(|facet| facet.signed_distance(point) >= 0.0)
}

/// Label every point of a cloud with the first box that contains it.
///
/// # Arguments
///
/// * `points` - The point cloud, `[x, y, z]` per point.
/// * `boxes_corners` - 8-corner representation of each box, matching
///   `boxes` by index.
/// * `boxes` - Canonical box parameters stamped into matching label rows.
/// * `classes` - 1-based class index per box (0 is reserved for
///   background).
///
/// # Returns
///
/// One `[class_id, x, y, z, l, w, h, ry]` record per point, all-zero for
/// background points.
///
/// When boxes overlap, the first containing box in input order wins: a
/// point claimed by a box is never restamped by a later one. Given a fixed
/// box order the output is fully deterministic.
pub fn label_point_cloud(
    points: &[[f64; 3]],
    boxes_corners: &[[[f64; 3]; 8]],
    boxes: &[Box3D],
    classes: &[u32],
) -> Vec<[f32; LABEL_FIELDS]> {
    assert_eq!(boxes_corners.len(), boxes.len());
    assert_eq!(boxes_corners.len(), classes.len());

    let mut label_seg = vec![[0.0f32; LABEL_FIELDS]; points.len()];

    for ((corners, box3d), &class) in boxes_corners.iter().zip(boxes.iter()).zip(classes.iter()) {
        let facets = facets_from_corners(corners);

        let mut min = corners[0];
        let mut max = corners[0];
        for corner in corners.iter().skip(1) {
            for axis in 0..3 {
                min[axis] = min[axis].min(corner[axis]);
                max[axis] = max[axis].max(corner[axis]);
            }
        }

        for (label, point) in label_seg.iter_mut().zip(points.iter()) {
            // earlier boxes own their points
            if label[0] > 0.0 {
                continue;
            }
            if point[0] < min[0]
                || point[0] > max[0]
                || point[1] < min[1]
                || point[1] > max[1]
                || point[2] < min[2]
                || point[2] > max[2]
            {
                continue;
            }
            if point_inside_facets(point, &facets) {
                label[0] = class as f32;
                for (dst, src) in label[1..].iter_mut().zip(box3d.to_array().iter()) {
                    *dst = *src as f32;
                }
            }
        }
    }
    label_seg
}

/// Build the per-point label records for one sample.
///
/// Ground-truth boxes are grown by `expand_gt_size` before labeling so that
/// points right at object boundaries end up foreground, then corners are
/// derived and the cloud is labeled with [`label_point_cloud`].
pub fn build_label_seg(
    points: &[[f64; 3]],
    gt_boxes: &[Box3D],
    gt_classes: &[u32],
    expand_gt_size: f64,
) -> Vec<[f32; LABEL_FIELDS]> {
    let expanded: Vec<Box3D> = gt_boxes.iter().map(|b| b.inflate(expand_gt_size)).collect();
    let corners: Vec<[[f64; 3]; 8]> = expanded.iter().map(|b| b.corners()).collect();

    let label_seg = label_point_cloud(points, &corners, &expanded, gt_classes);

    let num_foreground = label_seg.iter().filter(|label| label[0] > 0.0).count();
    log::debug!(
        "labeled {} foreground points out of {} for {} box(es)",
        num_foreground,
        points.len(),
        gt_boxes.len()
    );

    label_seg
}
