use crate::error::GeometryError;
use crate::polygon::{convex_hull_intersection, polygon_area};

/// 2D IoU of two convex quadrilaterals in counter-clockwise order.
///
/// # Arguments
///
/// * `rect1` - Vertices of the first quadrilateral.
/// * `rect2` - Vertices of the second quadrilateral.
///
/// # Returns
///
/// `(iou, intersection_area)`. When the union area is zero (two degenerate
/// polygons) the IoU is 0.
pub fn polygon_iou(rect1: &[[f64; 2]], rect2: &[[f64; 2]]) -> (f64, f64) {
    let area1 = polygon_area(rect1);
    let area2 = polygon_area(rect2);
    let inter_area = convex_hull_intersection(rect1, rect2)
        .map(|(_, area)| area)
        .unwrap_or(0.0);

    let union = area1 + area2 - inter_area;
    if union <= 0.0 {
        return (0.0, 0.0);
    }
    (inter_area / union, inter_area)
}

/// Volume of an oriented box from its 8-corner representation.
///
/// Edge lengths are read off the fixed corner ordering of
/// [`crate::box3d::Box3D::corners`]: corners (0, 1), (1, 2) and (0, 4) span
/// the three box axes.
pub fn box3d_volume(corners: &[[f64; 3]; 8]) -> f64 {
    let dist = |a: &[f64; 3], b: &[f64; 3]| {
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
    };
    dist(&corners[0], &corners[1]) * dist(&corners[1], &corners[2]) * dist(&corners[0], &corners[4])
}

/// 3D IoU between two oriented boxes given their 8-corner representations.
///
/// The BEV rectangles are the top-face corners read in reverse order
/// (3, 2, 1, 0), which yields counter-clockwise polygons under the corner
/// ordering of [`crate::box3d::Box3D::corners`]. The vertical overlap is
/// `max(0, min(top1, top2) - max(bottom1, bottom2))` with the top read from
/// corner 0 and the bottom from corner 4.
///
/// # Arguments
///
/// * `corners1` - Corners of the first box.
/// * `corners2` - Corners of the second box.
///
/// # Returns
///
/// `(iou_3d, iou_bev)`.
///
/// Example:
///
/// ```
/// use lidarbox_geometry::box3d::Box3D;
/// use lidarbox_geometry::iou::box3d_iou;
///
/// let cube = Box3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0);
/// let (iou_3d, iou_bev) = box3d_iou(&cube.corners(), &cube.corners());
/// assert!((iou_3d - 1.0).abs() < 1e-6);
/// assert!((iou_bev - 1.0).abs() < 1e-6);
/// ```
pub fn box3d_iou(corners1: &[[f64; 3]; 8], corners2: &[[f64; 3]; 8]) -> (f64, f64) {
    let bev_rect = |corners: &[[f64; 3]; 8]| -> [[f64; 2]; 4] {
        [
            [corners[3][0], corners[3][2]],
            [corners[2][0], corners[2][2]],
            [corners[1][0], corners[1][2]],
            [corners[0][0], corners[0][2]],
        ]
    };
    let rect1 = bev_rect(corners1);
    let rect2 = bev_rect(corners2);

    let (iou_bev, inter_area) = polygon_iou(&rect1, &rect2);

    let top = corners1[0][1].min(corners2[0][1]);
    let bottom = corners1[4][1].max(corners2[4][1]);
    let inter_vol = inter_area * (top - bottom).max(0.0);

    let vol1 = box3d_volume(corners1);
    let vol2 = box3d_volume(corners2);
    let union = vol1 + vol2 - inter_vol;
    let iou_3d = if union <= 0.0 { 0.0 } else { inter_vol / union };

    (iou_3d, iou_bev)
}

/// IoU of two axis-aligned 2D boxes `[xmin, ymin, xmax, ymax]`.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidAabb`] when either box has `xmin >= xmax`
/// or `ymin >= ymax`; this is a caller bug, not a recoverable state.
pub fn box2d_iou(box1: &[f64; 4], box2: &[f64; 4]) -> Result<f64, GeometryError> {
    for b in [box1, box2] {
        if b[0] >= b[2] || b[1] >= b[3] {
            return Err(GeometryError::InvalidAabb(b[0], b[1], b[2], b[3]));
        }
    }

    let x_left = box1[0].max(box2[0]);
    let y_top = box1[1].max(box2[1]);
    let x_right = box1[2].min(box2[2]);
    let y_bottom = box1[3].min(box2[3]);

    if x_right < x_left || y_bottom < y_top {
        return Ok(0.0);
    }

    let inter_area = (x_right - x_left) * (y_bottom - y_top);
    let area1 = (box1[2] - box1[0]) * (box1[3] - box1[1]);
    let area2 = (box2[2] - box2[0]) * (box2[3] - box2[1]);

    Ok(inter_area / (area1 + area2 - inter_area))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box3d::Box3D;
    use approx::assert_relative_eq;

    #[test]
    fn test_polygon_iou_identical() {
        let rect = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let (iou, inter) = polygon_iou(&rect, &rect);
        assert_relative_eq!(iou, 1.0, epsilon = 1e-6);
        assert_relative_eq!(inter, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_polygon_iou_disjoint() {
        let rect1 = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let rect2 = [[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0]];
        let (iou, inter) = polygon_iou(&rect1, &rect2);
        assert_eq!(iou, 0.0);
        assert_eq!(inter, 0.0);
    }

    #[test]
    fn test_box3d_volume() {
        let boxes = Box3D::new(0.5, -1.0, 2.0, 3.9, 1.6, 1.5, 0.35);
        let vol = box3d_volume(&boxes.corners());
        assert_relative_eq!(vol, 3.9 * 1.6 * 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_box3d_iou_identical() {
        let boxes = Box3D::new(1.0, 2.0, 3.0, 3.9, 1.6, 1.5, 0.7);
        let (iou_3d, iou_bev) = box3d_iou(&boxes.corners(), &boxes.corners());
        assert_relative_eq!(iou_3d, 1.0, epsilon = 1e-6);
        assert_relative_eq!(iou_bev, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_box3d_iou_disjoint() {
        let a = Box3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0);
        let b = Box3D::new(10.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0);
        let (iou_3d, iou_bev) = box3d_iou(&a.corners(), &b.corners());
        assert_eq!(iou_3d, 0.0);
        assert_eq!(iou_bev, 0.0);
    }

    #[test]
    fn test_box3d_iou_vertically_disjoint() {
        // same BEV footprint, no vertical overlap
        let a = Box3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0);
        let b = Box3D::new(0.0, 5.0, 0.0, 1.0, 1.0, 1.0, 0.0);
        let (iou_3d, iou_bev) = box3d_iou(&a.corners(), &b.corners());
        assert_eq!(iou_3d, 0.0);
        assert_relative_eq!(iou_bev, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_box3d_iou_half_overlap() {
        let a = Box3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0);
        let b = Box3D::new(0.5, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0);
        let (iou_3d, _) = box3d_iou(&a.corners(), &b.corners());
        // intersection 0.5, union 1.5
        assert_relative_eq!(iou_3d, 1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_box3d_iou_symmetric() {
        let a = Box3D::new(0.3, -0.2, 1.0, 3.9, 1.6, 1.5, 0.4);
        let b = Box3D::new(1.0, 0.0, 1.5, 4.2, 1.7, 1.4, -0.3);
        let (ab_3d, ab_bev) = box3d_iou(&a.corners(), &b.corners());
        let (ba_3d, ba_bev) = box3d_iou(&b.corners(), &a.corners());
        assert_relative_eq!(ab_3d, ba_3d, epsilon = 1e-9);
        assert_relative_eq!(ab_bev, ba_bev, epsilon = 1e-9);
    }

    #[test]
    fn test_box3d_iou_rotated_within_bounds() {
        let a = Box3D::new(0.0, 0.0, 0.0, 2.0, 1.0, 1.0, 0.0);
        let b = Box3D::new(0.2, 0.1, -0.1, 2.0, 1.0, 1.0, 0.5);
        let (iou_3d, iou_bev) = box3d_iou(&a.corners(), &b.corners());
        assert!(iou_3d > 0.0 && iou_3d < 1.0);
        assert!(iou_bev > 0.0 && iou_bev <= 1.0);
        assert!(iou_3d <= iou_bev + 1e-9);
    }

    #[test]
    fn test_box2d_iou_basic() {
        let iou = box2d_iou(&[0.0, 0.0, 2.0, 2.0], &[1.0, 1.0, 3.0, 3.0]).unwrap();
        assert_relative_eq!(iou, 1.0 / 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_box2d_iou_disjoint() {
        let iou = box2d_iou(&[0.0, 0.0, 1.0, 1.0], &[2.0, 2.0, 3.0, 3.0]).unwrap();
        assert_eq!(iou, 0.0);
    }

    #[test]
    fn test_box2d_iou_invalid_box() {
        assert!(box2d_iou(&[1.0, 0.0, 0.0, 1.0], &[0.0, 0.0, 1.0, 1.0]).is_err());
        assert!(box2d_iou(&[0.0, 0.0, 1.0, 1.0], &[0.0, 2.0, 1.0, 1.0]).is_err());
    }
}
