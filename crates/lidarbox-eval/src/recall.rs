use lidarbox_geometry::box3d::Box3D;

/// Recall counts and per-proposal best matches for one evaluation pass.
///
/// The per-proposal vectors all have one entry per proposal. When a scene
/// has no proposals or no ground truth, everything is zero-filled; the
/// all-zero `gt_boxes` rows are sentinels, not well-formed boxes.
#[derive(Debug, Clone)]
pub struct RecallResult {
    /// Number of ground-truth boxes matched by some proposal above 0.5 3D IoU.
    pub recall_50: usize,
    /// Number of ground-truth boxes matched by some proposal above 0.7 3D IoU.
    pub recall_70: usize,
    /// Best BEV IoU per proposal across all ground truths.
    pub iou2d: Vec<f64>,
    /// Best 3D IoU per proposal across all ground truths.
    pub iou3d: Vec<f64>,
    /// Ground-truth box realizing each proposal's best 3D IoU.
    pub gt_boxes: Vec<Box3D>,
    /// Class of the ground-truth box realizing each proposal's best 3D IoU.
    pub gt_classes: Vec<u32>,
}

/// Compute proposal recall and per-proposal best matches from precomputed
/// IoU matrices.
///
/// # Arguments
///
/// * `gt_boxes` - The `m` ground-truth boxes.
/// * `gt_classes` - 1-based class per ground-truth box.
/// * `proposal_gt_iou2d` - `n x m` BEV IoU matrix, one row per proposal.
/// * `proposal_gt_iou3d` - `n x m` 3D IoU matrix, one row per proposal.
///
/// # Returns
///
/// Recall counts are column-wise reductions: a ground truth is recalled
/// when its best IoU across *all* proposals exceeds the threshold. The
/// per-proposal vectors are row-wise reductions: each proposal's best IoU
/// (and best-matching ground truth) across all ground truths. The two must
/// not be conflated.
///
/// An empty proposal set or ground-truth set is a valid scene state and
/// yields zero-filled outputs rather than an error.
pub fn compute_recall_iou(
    gt_boxes: &[Box3D],
    gt_classes: &[u32],
    proposal_gt_iou2d: &[Vec<f64>],
    proposal_gt_iou3d: &[Vec<f64>],
) -> RecallResult {
    let num_proposals = proposal_gt_iou3d.len();
    let num_gt = gt_boxes.len();
    assert_eq!(gt_classes.len(), num_gt);
    assert_eq!(proposal_gt_iou2d.len(), num_proposals);

    let mut result = RecallResult {
        recall_50: 0,
        recall_70: 0,
        iou2d: vec![0.0; num_proposals],
        iou3d: vec![0.0; num_proposals],
        gt_boxes: vec![Box3D::default(); num_proposals],
        gt_classes: vec![0; num_proposals],
    };

    if num_proposals == 0 || num_gt == 0 {
        return result;
    }

    // column-wise: per ground truth, the best proposal
    for gt_idx in 0..num_gt {
        let best = proposal_gt_iou3d
            .iter()
            .map(|row| row[gt_idx])
            .fold(f64::NEG_INFINITY, f64::max);
        if best > 0.5 {
            result.recall_50 += 1;
        }
        if best > 0.7 {
            result.recall_70 += 1;
        }
    }

    // row-wise: per proposal, the best ground truth
    for (proposal_idx, (row3d, row2d)) in proposal_gt_iou3d
        .iter()
        .zip(proposal_gt_iou2d.iter())
        .enumerate()
    {
        assert_eq!(row3d.len(), num_gt);
        assert_eq!(row2d.len(), num_gt);

        let (best_gt, best_iou3d) = row3d
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best_idx, best), (idx, &iou)| {
                if iou > best {
                    (idx, iou)
                } else {
                    (best_idx, best)
                }
            });

        result.iou3d[proposal_idx] = best_iou3d;
        result.iou2d[proposal_idx] = row2d.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        result.gt_boxes[proposal_idx] = gt_boxes[best_gt];
        result.gt_classes[proposal_idx] = gt_classes[best_gt];
    }

    result
}
