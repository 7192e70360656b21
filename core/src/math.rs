//! Math type aliases and helper functions.
//!
//! All debug drawing math is `f32`. The raw array forms used by the untyped
//! drawing interface are:
//!
//! - points and vectors: `[x, y, z]`
//! - quaternions: `[x, y, z, w]`
//! - matrices: column-major `[[f32; 4]; 4]`
//! - planes: `[nx, ny, nz, d]`
//! - bounds: `[min, max]`

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 3x3 matrix (f32).
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
/// Use [`quat_from_xyzw`] or `Quaternion::new(w, x, y, z)` to construct.
pub type Quat = nalgebra::Quaternion<f32>;

/// Unit quaternion (f32) representing a rotation.
pub type UnitQuat = nalgebra::UnitQuaternion<f32>;

/// Rigid transform: rotation followed by translation.
pub type Isometry = nalgebra::Isometry3<f32>;

/// Raw column-major 4x4 matrix.
pub type RawMat4 = [[f32; 4]; 4];

/// A plane `normal · x + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Plane through `point` with the given normal.
    pub fn from_point_normal(point: &Vec3, normal: &Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Signed distance from `point` to the plane (normal assumed unit length).
    pub fn distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }

    /// The point of the plane closest to the origin.
    ///
    /// Returns `None` for a zero normal.
    pub fn origin(&self) -> Option<Vec3> {
        let len_sq = self.normal.norm_squared();
        if len_sq <= f32::EPSILON {
            return None;
        }
        Some(-self.normal * (self.d / len_sq))
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.d]
    }

    pub fn from_array(a: [f32; 4]) -> Self {
        Self::new(Vec3::new(a[0], a[1], a[2]), a[3])
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any included point will replace.
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::MAX),
            max: Vec3::repeat(-f32::MAX),
        }
    }

    pub fn from_center_extents(center: &Vec3, half_extents: &Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include(p);
        }
        bounds
    }

    pub fn include(&mut self, point: &Vec3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The 8 corners: bottom face (min z) counter-clockwise, then top face.
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ]
    }

    pub fn to_array(&self) -> [[f32; 3]; 2] {
        [vec3_to_array(&self.min), vec3_to_array(&self.max)]
    }

    pub fn from_array(a: [[f32; 3]; 2]) -> Self {
        Self::new(vec3_from_array(a[0]), vec3_from_array(a[1]))
    }
}

// ===== Conversions =====

pub fn vec2_to_array(v: &Vec2) -> [f32; 2] {
    [v.x, v.y]
}

pub fn vec2_from_array(a: [f32; 2]) -> Vec2 {
    Vec2::new(a[0], a[1])
}

pub fn vec3_to_array(v: &Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

pub fn vec3_from_array(a: [f32; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}

/// Create a quaternion from x, y, z, w components.
pub fn quat_from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Quat {
    nalgebra::Quaternion::new(w, x, y, z)
}

/// Create a quaternion from a `[x, y, z, w]` array.
pub fn quat_from_array(a: [f32; 4]) -> Quat {
    nalgebra::Quaternion::new(a[3], a[0], a[1], a[2])
}

/// Convert a quaternion to a `[x, y, z, w]` array.
pub fn quat_to_array(q: Quat) -> [f32; 4] {
    [q.coords.x, q.coords.y, q.coords.z, q.coords.w]
}

/// Normalize a `[x, y, z, w]` array into a rotation.
pub fn unit_quat_from_array(a: [f32; 4]) -> UnitQuat {
    UnitQuat::new_normalize(quat_from_array(a))
}

/// Convert a 4x4 matrix to a column-major `[[f32; 4]; 4]` array.
pub fn mat4_to_cols_array_2d(m: &Mat4) -> RawMat4 {
    let s = m.as_slice();
    [
        [s[0], s[1], s[2], s[3]],
        [s[4], s[5], s[6], s[7]],
        [s[8], s[9], s[10], s[11]],
        [s[12], s[13], s[14], s[15]],
    ]
}

/// Build a 4x4 matrix from a column-major `[[f32; 4]; 4]` array.
pub fn mat4_from_cols_array_2d(cols: &RawMat4) -> Mat4 {
    Mat4::from_fn(|row, col| cols[col][row])
}

/// Translation column of an affine 4x4 matrix.
pub fn mat4_translation(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Replace the translation column, keeping the upper 3x3 block.
pub fn mat4_set_translation(m: &mut Mat4, t: &Vec3) {
    m[(0, 3)] = t.x;
    m[(1, 3)] = t.y;
    m[(2, 3)] = t.z;
}

/// Replace the upper 3x3 block with `rotation`, keeping the translation.
pub fn mat4_set_rotation(m: &mut Mat4, rotation: &UnitQuat) {
    let r = rotation.to_rotation_matrix();
    let rm = r.matrix();
    for row in 0..3 {
        for col in 0..3 {
            m[(row, col)] = rm[(row, col)];
        }
    }
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::new_translation(&t)
}

/// Build a right-handed perspective projection with depth range [0, 1] (wgpu/Vulkan convention).
pub fn perspective_rh(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    let f = 1.0 / (yfov / 2.0).tan();
    let nf = 1.0 / (znear - zfar);
    #[rustfmt::skip]
    let result = Mat4::new(
        f / aspect, 0.0,  0.0,              0.0,
        0.0,        f,    0.0,              0.0,
        0.0,        0.0,  zfar * nf,        znear * zfar * nf,
        0.0,        0.0,  -1.0,             0.0,
    );
    result
}

/// Right-handed look-at view matrix.
pub fn look_at_rh(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    let eye_point = nalgebra::Point3::from(*eye);
    let target_point = nalgebra::Point3::from(*target);
    nalgebra::Isometry3::look_at_rh(&eye_point, &target_point, up).to_homogeneous()
}

/// Transform a point by an affine or projective 4x4 matrix.
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    m.transform_point(&nalgebra::Point3::from(*p)).coords
}

// ===== Debug drawing helpers =====

/// Convert X/Y/Z euler angles in degrees into a rotation.
///
/// Applied as X (roll), then Y (pitch), then Z (yaw).
pub fn euler_to_quat_degrees(angles: &Vec3) -> UnitQuat {
    UnitQuat::from_euler_angles(
        angles.x.to_radians(),
        angles.y.to_radians(),
        angles.z.to_radians(),
    )
}

/// Shortest rotation taking unit vector `from` onto unit vector `to`.
///
/// Opposite vectors yield a half turn about an arbitrary perpendicular axis.
pub fn shortest_arc(from: &Vec3, to: &Vec3) -> UnitQuat {
    match UnitQuat::rotation_between(from, to) {
        Some(q) => q,
        None if from.dot(to) > 0.0 => UnitQuat::identity(),
        None => {
            let (axis, _) = orthonormal_basis(from);
            UnitQuat::from_axis_angle(&nalgebra::Unit::new_normalize(axis), std::f32::consts::PI)
        }
    }
}

/// Transform placing the local +Y axis along `p0 -> p1`, translated to `p0`.
///
/// Used to orient cylinders and arrows between two points.
pub fn rotation_arc(p0: &Vec3, p1: &Vec3) -> Mat4 {
    let dir = p1 - p0;
    let rotation = if dir.norm_squared() <= f32::EPSILON {
        UnitQuat::identity()
    } else {
        shortest_arc(&Vec3::y(), &dir.normalize())
    };
    let mut m = rotation.to_homogeneous();
    mat4_set_translation(&mut m, p0);
    m
}

/// Two unit vectors perpendicular to `n` and to each other.
pub fn orthonormal_basis(n: &Vec3) -> (Vec3, Vec3) {
    let n = n.normalize();
    let helper = if n.x.abs() > 0.9 { Vec3::y() } else { Vec3::x() };
    let u = n.cross(&helper).normalize();
    let v = n.cross(&u);
    (u, v)
}

/// World-space corners of a view frustum.
///
/// Corner order: near plane `[TL, TR, BR, BL]`, far plane `[TL, TR, BR, BL]`.
/// Assumes a [0, 1] depth range. Returns `None` when `projection * view`
/// is not invertible.
pub fn frustum_corners(view: &Mat4, projection: &Mat4) -> Option<[Vec3; 8]> {
    let inverse = (projection * view).try_inverse()?;
    let ndc = [
        (-1.0, 1.0, 0.0),
        (1.0, 1.0, 0.0),
        (1.0, -1.0, 0.0),
        (-1.0, -1.0, 0.0),
        (-1.0, 1.0, 1.0),
        (1.0, 1.0, 1.0),
        (1.0, -1.0, 1.0),
        (-1.0, -1.0, 1.0),
    ];
    let mut corners = [Vec3::zeros(); 8];
    for (corner, (x, y, z)) in corners.iter_mut().zip(ndc) {
        let h = inverse * Vec4::new(x, y, z, 1.0);
        if h.w.abs() <= f32::EPSILON {
            return None;
        }
        *corner = h.xyz() / h.w;
    }
    Some(corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn translation_matrix() {
        let t = Vec3::new(1.0, 2.0, 3.0);
        let m = mat4_from_translation(t);
        assert_eq!(m[(0, 3)], 1.0);
        assert_eq!(m[(1, 3)], 2.0);
        assert_eq!(m[(2, 3)], 3.0);
        assert!((mat4_translation(&m) - t).norm() < 1e-6);
    }

    #[test]
    fn quat_xyzw_roundtrip() {
        let q = quat_from_xyzw(0.1, 0.2, 0.3, 0.9);
        let arr = quat_to_array(q);
        assert!((arr[0] - 0.1).abs() < 1e-6);
        assert!((arr[1] - 0.2).abs() < 1e-6);
        assert!((arr[2] - 0.3).abs() < 1e-6);
        assert!((arr[3] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn cols_array_2d_identity() {
        let m = Mat4::identity();
        let cols = mat4_to_cols_array_2d(&m);
        assert_eq!(cols[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(cols[1], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(cols[2], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(cols[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn cols_array_2d_preserves_layout() {
        let m = mat4_from_translation(Vec3::new(4.0, 5.0, 6.0));
        let cols = mat4_to_cols_array_2d(&m);
        assert_eq!(cols[3], [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(mat4_from_cols_array_2d(&cols), m);
    }

    #[test]
    fn set_rotation_keeps_translation() {
        let mut m = mat4_from_translation(Vec3::new(1.0, 2.0, 3.0));
        let q = UnitQuat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2);
        mat4_set_rotation(&mut m, &q);
        assert!((mat4_translation(&m) - Vec3::new(1.0, 2.0, 3.0)).norm() < 1e-6);
        let x = m.transform_vector(&Vec3::x());
        assert!((x - Vec3::y()).norm() < 1e-5);
    }

    #[rstest]
    #[case(Vec3::new(90.0, 0.0, 0.0), Vec3::y(), Vec3::z())]
    #[case(Vec3::new(0.0, 90.0, 0.0), Vec3::x(), -Vec3::z())]
    #[case(Vec3::new(0.0, 0.0, 90.0), Vec3::x(), Vec3::y())]
    fn euler_degrees_single_axis(#[case] angles: Vec3, #[case] input: Vec3, #[case] expected: Vec3) {
        let q = euler_to_quat_degrees(&angles);
        assert!((q * input - expected).norm() < 1e-5);
    }

    #[rstest]
    #[case(Vec3::new(3.0, 0.0, 0.0))]
    #[case(Vec3::new(0.0, -2.0, 0.0))]
    #[case(Vec3::new(1.0, 1.0, 1.0))]
    fn rotation_arc_points_y_along_direction(#[case] dir: Vec3) {
        let p0 = Vec3::new(1.0, 2.0, 3.0);
        let m = rotation_arc(&p0, &(p0 + dir));
        assert!((mat4_translation(&m) - p0).norm() < 1e-6);
        let y = m.transform_vector(&Vec3::y());
        assert!((y - dir.normalize()).norm() < 1e-5);
    }

    #[test]
    fn rotation_arc_degenerate_is_translation() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let m = rotation_arc(&p, &p);
        assert!((m - mat4_from_translation(p)).norm() < 1e-6);
    }

    #[test]
    fn orthonormal_basis_is_perpendicular() {
        let n = Vec3::new(0.3, -0.5, 0.8);
        let (u, v) = orthonormal_basis(&n);
        assert!(u.dot(&n).abs() < 1e-5);
        assert!(v.dot(&n).abs() < 1e-5);
        assert!(u.dot(&v).abs() < 1e-5);
        assert!((u.norm() - 1.0).abs() < 1e-5);
        assert!((v.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn plane_origin_and_distance() {
        let plane = Plane::from_point_normal(&Vec3::new(0.0, 2.0, 0.0), &Vec3::y());
        assert!((plane.d + 2.0).abs() < 1e-6);
        let origin = plane.origin().unwrap();
        assert!((origin - Vec3::new(0.0, 2.0, 0.0)).norm() < 1e-6);
        assert!((plane.distance(&Vec3::new(5.0, 5.0, 5.0)) - 3.0).abs() < 1e-6);
        assert!(Plane::new(Vec3::zeros(), 1.0).origin().is_none());
    }

    #[test]
    fn bounds_from_points() {
        let points = [
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-2.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ];
        let b = Bounds3::from_points(&points);
        assert_eq!(b.min, Vec3::new(-2.0, -1.0, -4.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(!b.is_empty());
        assert!(Bounds3::empty().is_empty());
        assert_eq!(Bounds3::from_array(b.to_array()), b);
    }

    #[test]
    fn frustum_corners_of_identity_camera() {
        let corners = frustum_corners(&Mat4::identity(), &Mat4::identity()).unwrap();
        assert!((corners[0] - Vec3::new(-1.0, 1.0, 0.0)).norm() < 1e-6);
        assert!((corners[6] - Vec3::new(1.0, -1.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn frustum_corners_perspective_near_plane() {
        let view = look_at_rh(&Vec3::new(0.0, 0.0, 5.0), &Vec3::zeros(), &Vec3::y());
        let proj = perspective_rh(FRAC_PI_2, 1.0, 1.0, 10.0);
        let corners = frustum_corners(&view, &proj).unwrap();
        // Near plane sits 1 unit in front of the eye, half-size 1 at 90 degrees.
        for c in &corners[..4] {
            assert!((c.z - 4.0).abs() < 1e-4);
            assert!((c.x.abs() - 1.0).abs() < 1e-4);
        }
        for c in &corners[4..] {
            assert!((c.z + 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn frustum_corners_singular() {
        assert!(frustum_corners(&Mat4::zeros(), &Mat4::identity()).is_none());
    }
}
