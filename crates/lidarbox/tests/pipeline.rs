//! End-to-end checks across the geometry, target, label, and eval crates:
//! label a small cloud, persist and reload the labels, and evaluate
//! proposals against the ground truth they were derived from.

use approx::assert_relative_eq;
use tempfile::TempDir;

use lidarbox::eval::compute_recall_iou;
use lidarbox::geometry::box3d::Box3D;
use lidarbox::geometry::iou::box3d_iou;
use lidarbox::label::{build_label_seg, ClassMap, LabelStore};
use lidarbox::targets::{decode_box, encode_box, BinGrid};

#[test]
fn test_label_persist_reload() {
    let classes = ClassMap::new(vec!["Car".to_string()], vec![[3.9, 1.6, 1.5]]);
    let car = Box3D::new(5.0, 0.0, 10.0, 3.9, 1.6, 1.5, 0.4);

    let points = vec![
        [5.0, 0.0, 10.1],  // inside the car
        [5.3, 0.2, 9.8],   // inside the car
        [30.0, 0.0, 40.0], // far background
    ];
    let gt_classes = vec![classes.index_of("Car").unwrap()];
    let label_seg = build_label_seg(&points, &[car], &gt_classes, 0.1);

    assert_eq!(label_seg[0][0], 1.0);
    assert_eq!(label_seg[1][0], 1.0);
    assert_eq!(label_seg[2], [0.0; 8]);

    let dir = TempDir::new().unwrap();
    let store = LabelStore::new(dir.path());
    store
        .save(&classes.set_name(), 0.1, "000123", &label_seg)
        .unwrap();
    let reloaded = store.load("Car", 0.1, "000123").unwrap();
    assert_eq!(reloaded, label_seg);
}

#[test]
fn test_proposals_roundtrip_and_recall() {
    let grid = BinGrid {
        xz_search_range: 3.0,
        xz_bin_len: 0.5,
        theta_search_range: std::f64::consts::PI / 4.0,
        theta_bin_len: std::f64::consts::PI / 24.0,
    };
    let mean_size = [3.8, 1.6, 1.6];

    let gt_boxes = vec![
        Box3D::new(5.0, 0.0, 10.0, 3.9, 1.6, 1.5, 0.4),
        Box3D::new(-8.0, 0.2, 25.0, 4.2, 1.7, 1.4, -0.8),
    ];
    let gt_classes = vec![1, 1];

    // proposals: decoded regression targets seeded near each ground truth
    let proposals: Vec<Box3D> = gt_boxes
        .iter()
        .map(|gt| {
            let reference = [gt.x - 0.4, gt.y + 0.1, gt.z + 0.6];
            let target = encode_box(&reference, 0.0, gt, &mean_size, &grid);
            decode_box(&reference, 0.0, &target, &mean_size, &grid)
        })
        .collect();

    // decoded proposals should coincide with their ground truth
    let mut iou2d = Vec::new();
    let mut iou3d = Vec::new();
    for proposal in proposals.iter() {
        let corners = proposal.corners();
        let (row3d, row2d): (Vec<f64>, Vec<f64>) = gt_boxes
            .iter()
            .map(|gt| box3d_iou(&corners, &gt.corners()))
            .unzip();
        iou3d.push(row3d);
        iou2d.push(row2d);
    }

    let result = compute_recall_iou(&gt_boxes, &gt_classes, &iou2d, &iou3d);
    assert_eq!(result.recall_50, 2);
    assert_eq!(result.recall_70, 2);
    for (proposal_idx, best) in result.iou3d.iter().enumerate() {
        assert_relative_eq!(*best, 1.0, epsilon = 1e-6);
        assert_eq!(result.gt_boxes[proposal_idx], gt_boxes[proposal_idx]);
    }
}
