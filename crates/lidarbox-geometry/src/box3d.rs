use glam::DVec3;

/// A 3D bounding box in the canonical 7-parameter form `[x, y, z, l, w, h, ry]`.
///
/// `(x, y, z)` is the box center, `(l, w, h)` are the extents along the box
/// frame axes before rotation, and `ry` is the yaw rotation about the vertical
/// (`y`) axis. Extents must be strictly positive for a well-formed box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Box3D {
    /// Center coordinate along the x axis.
    pub x: f64,
    /// Center coordinate along the vertical y axis.
    pub y: f64,
    /// Center coordinate along the z axis.
    pub z: f64,
    /// Extent along the box-frame x axis.
    pub l: f64,
    /// Extent along the box-frame z axis.
    pub w: f64,
    /// Extent along the vertical axis.
    pub h: f64,
    /// Yaw rotation about the vertical axis, in radians.
    pub ry: f64,
}

impl Box3D {
    /// Create a new box from its 7 parameters.
    pub fn new(x: f64, y: f64, z: f64, l: f64, w: f64, h: f64, ry: f64) -> Self {
        Self {
            x,
            y,
            z,
            l,
            w,
            h,
            ry,
        }
    }

    /// Create a box from a `[x, y, z, l, w, h, ry]` array.
    pub fn from_array(params: &[f64; 7]) -> Self {
        Self::new(
            params[0], params[1], params[2], params[3], params[4], params[5], params[6],
        )
    }

    /// Get the box parameters as a `[x, y, z, l, w, h, ry]` array.
    pub fn to_array(&self) -> [f64; 7] {
        [self.x, self.y, self.z, self.l, self.w, self.h, self.ry]
    }

    /// Get the box center.
    pub fn center(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Get the box extents `[l, w, h]`.
    pub fn extents(&self) -> [f64; 3] {
        [self.l, self.w, self.h]
    }

    /// Return a copy of the box with all three extents grown by `amount`.
    ///
    /// Used to expand ground-truth boxes by a fixed margin before labeling
    /// the points near object boundaries.
    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            l: self.l + amount,
            w: self.w + amount,
            h: self.h + amount,
            ..*self
        }
    }

    /// Compute the 8 corner coordinates of the box.
    ///
    /// Corner ordering is fixed: indices 0-3 are the top face (vertical
    /// coordinate `y + h/2`), indices 4-7 the bottom face with corner `i + 4`
    /// directly below corner `i`. Traversing the top face as 3, 2, 1, 0 in
    /// the ground plane yields a counter-clockwise BEV rectangle, which is
    /// what [`crate::iou::box3d_iou`] relies on.
    ///
    /// # Returns
    ///
    /// An `[8][3]` array of `[x, y, z]` corner coordinates.
    pub fn corners(&self) -> [[f64; 3]; 8] {
        let (sin_ry, cos_ry) = self.ry.sin_cos();
        let (half_l, half_w, half_h) = (0.5 * self.l, 0.5 * self.w, 0.5 * self.h);

        // box-frame ground-plane offsets, top face winding 0..3
        let dx = [half_l, half_l, -half_l, -half_l];
        let dz = [half_w, -half_w, -half_w, half_w];

        let mut corners = [[0.0; 3]; 8];
        for i in 0..4 {
            let cx = self.x + dx[i] * cos_ry + dz[i] * sin_ry;
            let cz = self.z - dx[i] * sin_ry + dz[i] * cos_ry;
            corners[i] = [cx, self.y + half_h, cz];
            corners[i + 4] = [cx, self.y - half_h, cz];
        }
        corners
    }
}

/// A half-space plane bounding one face of a convex box.
///
/// The plane is `normal . p = d` with the normal pointing into the box, so a
/// point is on the inner side iff `normal . p >= d`. Normals are not
/// normalized; only the sign of the signed distance is meaningful.
#[derive(Debug, Clone, Copy)]
pub struct Facet {
    /// Inward-pointing plane normal `[a, b, c]`.
    pub normal: [f64; 3],
    /// Signed plane offset, `normal . p` for any point `p` on the face.
    pub d: f64,
}

impl Facet {
    /// Signed distance of a point from the plane, positive on the inner side.
    #[inline]
    pub fn signed_distance(&self, point: &[f64; 3]) -> f64 {
        self.normal[0] * point[0] + self.normal[1] * point[1] + self.normal[2] * point[2] - self.d
    }
}

// Three corner indices per face, enough to span its plane.
const FACE_CORNERS: [[usize; 3]; 6] = [
    [0, 1, 2], // top
    [4, 7, 6], // bottom
    [0, 1, 5],
    [1, 2, 6],
    [2, 3, 7],
    [3, 0, 4],
];

/// Derive the 6 half-space facets of a box from its 8-corner representation.
///
/// Facet normals are oriented inward (toward the corner centroid), so a point
/// lies inside the box iff [`Facet::signed_distance`] is non-negative for
/// every facet.
///
/// # Arguments
///
/// * `corners` - Box corners in the ordering produced by [`Box3D::corners`].
///
/// # Returns
///
/// One facet per box face.
pub fn facets_from_corners(corners: &[[f64; 3]; 8]) -> [Facet; 6] {
    let centroid = corners
        .iter()
        .fold(DVec3::ZERO, |acc, c| acc + DVec3::from_array(*c))
        / corners.len() as f64;

    let mut facets = [Facet {
        normal: [0.0; 3],
        d: 0.0,
    }; 6];

    for (facet, face) in facets.iter_mut().zip(FACE_CORNERS.iter()) {
        let c0 = DVec3::from_array(corners[face[0]]);
        let c1 = DVec3::from_array(corners[face[1]]);
        let c2 = DVec3::from_array(corners[face[2]]);

        let mut normal = (c1 - c0).cross(c2 - c0);
        if normal.dot(centroid - c0) < 0.0 {
            normal = -normal;
        }

        *facet = Facet {
            normal: normal.to_array(),
            d: normal.dot(c0),
        };
    }
    facets
}
