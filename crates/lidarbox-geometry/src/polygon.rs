//! 2D polygon kernel used by the BEV IoU computation: Sutherland-Hodgman
//! clipping, shoelace area, and convex hulls over `[x, y]` vertex lists.

/// Threshold below which the edge-crossing denominator is treated as zero.
///
/// Parallel or collinear edge pairs make the crossing-point formula
/// ill-defined; instead of letting the division produce inf/NaN, such pairs
/// contribute no crossing vertex.
const CROSSING_DENOM_EPS: f64 = 1e-12;

#[inline]
fn cross(o: &[f64; 2], a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Crossing point of the infinite lines through `cp1-cp2` and `s-e`, or
/// `None` when the lines are (near-)parallel.
fn line_crossing(cp1: &[f64; 2], cp2: &[f64; 2], s: &[f64; 2], e: &[f64; 2]) -> Option<[f64; 2]> {
    let dc = [cp1[0] - cp2[0], cp1[1] - cp2[1]];
    let dp = [s[0] - e[0], s[1] - e[1]];
    let denom = dc[0] * dp[1] - dc[1] * dp[0];
    if denom.abs() < CROSSING_DENOM_EPS {
        return None;
    }
    let n1 = cp1[0] * cp2[1] - cp1[1] * cp2[0];
    let n2 = s[0] * e[1] - s[1] * e[0];
    let n3 = 1.0 / denom;
    Some([(n1 * dp[0] - n2 * dc[0]) * n3, (n1 * dp[1] - n2 * dc[1]) * n3])
}

/// Clip a polygon against a convex polygon (Sutherland-Hodgman).
///
/// # Arguments
///
/// * `subject` - Vertices of the polygon being clipped; may be any polygon.
/// * `clip` - Vertices of the clipping polygon; must be convex.
///
/// Both polygons must be in counter-clockwise order.
///
/// # Returns
///
/// The vertices of the clipped polygon, or `None` when the subject is
/// entirely clipped away. Callers must branch on the `None` sentinel rather
/// than on an empty vertex list.
pub fn clip_polygon(subject: &[[f64; 2]], clip: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    if subject.is_empty() || clip.is_empty() {
        return None;
    }

    let mut output = subject.to_vec();
    let mut cp1 = clip[clip.len() - 1];

    for &cp2 in clip.iter() {
        // strict test: points on the clip edge are outside
        let inside = |p: &[f64; 2]| cross(&cp1, &cp2, p) > 0.0;

        let input = std::mem::take(&mut output);
        let mut s = input[input.len() - 1];

        for &e in input.iter() {
            if inside(&e) {
                if !inside(&s) {
                    if let Some(crossing) = line_crossing(&cp1, &cp2, &s, &e) {
                        output.push(crossing);
                    }
                }
                output.push(e);
            } else if inside(&s) {
                if let Some(crossing) = line_crossing(&cp1, &cp2, &s, &e) {
                    output.push(crossing);
                }
            }
            s = e;
        }
        cp1 = cp2;

        if output.is_empty() {
            return None;
        }
    }
    Some(output)
}

/// Area of a polygon via the shoelace formula.
///
/// The result is non-negative regardless of vertex winding.
pub fn polygon_area(vertices: &[[f64; 2]]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let prev = (i + n - 1) % n;
        twice_area += vertices[i][0] * vertices[prev][1] - vertices[i][1] * vertices[prev][0];
    }
    0.5 * twice_area.abs()
}

/// Convex hull of a point set via Andrew's monotone chain.
///
/// Returns hull vertices in counter-clockwise order. Point sets with fewer
/// than 3 points are returned as-is (sorted).
pub fn convex_hull(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted.dedup();

    let n = sorted.len();
    if n < 3 {
        return sorted;
    }

    let mut hull: Vec<[f64; 2]> = Vec::with_capacity(2 * n);
    for &p in sorted.iter() {
        while hull.len() >= 2 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], &p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], &p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Intersection of two convex polygons as a convex hull plus its area.
///
/// Clips `p1` against `p2`, then hulls the clipped vertex set.
///
/// # Returns
///
/// `Some((hull_vertices, hull_area))`, or `None` when the polygons do not
/// intersect (the intersection area is then 0).
pub fn convex_hull_intersection(
    p1: &[[f64; 2]],
    p2: &[[f64; 2]],
) -> Option<(Vec<[f64; 2]>, f64)> {
    let clipped = clip_polygon(p1, p2)?;
    let hull = convex_hull(&clipped);
    let area = polygon_area(&hull);
    Some((hull, area))
}
