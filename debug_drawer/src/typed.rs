//! Typed facade over [`RenderDebug`].
//!
//! [`RenderDebugTyped`] is implemented for every [`RenderDebug`], including
//! `dyn RenderDebug`, so one handle exposes both method families. Each typed
//! method converts its math arguments into the raw array layouts and
//! forwards to exactly one untyped call; the conversion is lossless.

use std::fmt;

use render_debug_core::color::PackedColor;
use render_debug_core::math::{
    self, Bounds3, Isometry, Mat4, Plane, UnitQuat, Vec2, Vec3,
};

use crate::error::Result;
use crate::render_debug::{AxesStyle, DrawGroupId, RenderDebug};

fn v3(v: &Vec3) -> [f32; 3] {
    math::vec3_to_array(v)
}

fn m4(m: &Mat4) -> [[f32; 4]; 4] {
    math::mat4_to_cols_array_2d(m)
}

/// Debug drawing with `nalgebra` types.
pub trait RenderDebugTyped: RenderDebug {
    fn draw_polygon(&mut self, points: &[Vec3]) {
        let raw: Vec<[f32; 3]> = points.iter().map(v3).collect();
        self.debug_polygon(&raw);
    }

    fn draw_line(&mut self, p1: &Vec3, p2: &Vec3) {
        self.debug_line(v3(p1), v3(p2));
    }

    fn draw_gradient_line(&mut self, p1: &Vec3, p2: &Vec3, c1: PackedColor, c2: PackedColor) {
        self.debug_gradient_line(v3(p1), v3(p2), c1, c2);
    }

    fn draw_ray(&mut self, p1: &Vec3, p2: &Vec3) {
        self.debug_ray(v3(p1), v3(p2));
    }

    fn draw_cylinder(&mut self, p1: &Vec3, p2: &Vec3, radius: f32) {
        self.debug_cylinder(v3(p1), v3(p2), radius);
    }

    /// See [`DEFAULT_THICK_RAY_SIZE`](crate::DEFAULT_THICK_RAY_SIZE) for the usual thickness.
    fn draw_thick_ray(&mut self, p1: &Vec3, p2: &Vec3, ray_size: f32, arrow_tip: bool) {
        self.debug_thick_ray(v3(p1), v3(p2), ray_size, arrow_tip);
    }

    fn draw_plane(&mut self, plane: &Plane, radius1: f32, radius2: f32) {
        self.debug_plane(plane.to_array(), radius1, radius2);
    }

    fn draw_tri(&mut self, p1: &Vec3, p2: &Vec3, p3: &Vec3) {
        self.debug_tri(v3(p1), v3(p2), v3(p3));
    }

    fn draw_tri_normals(&mut self, points: &[Vec3; 3], normals: &[Vec3; 3]) {
        self.debug_tri_normals(points.each_ref().map(v3), normals.each_ref().map(v3));
    }

    fn draw_gradient_tri(&mut self, points: &[Vec3; 3], colors: [PackedColor; 3]) {
        self.debug_gradient_tri(points.each_ref().map(v3), colors);
    }

    fn draw_gradient_tri_normals(
        &mut self,
        points: &[Vec3; 3],
        normals: &[Vec3; 3],
        colors: [PackedColor; 3],
    ) {
        self.debug_gradient_tri_normals(
            points.each_ref().map(v3),
            normals.each_ref().map(v3),
            colors,
        );
    }

    fn draw_bound(&mut self, bounds: &Bounds3) {
        self.debug_bound(bounds.to_array());
    }

    /// See [`DEFAULT_SPHERE_SUBDIVISION`](crate::DEFAULT_SPHERE_SUBDIVISION).
    fn draw_sphere(&mut self, pos: &Vec3, radius: f32, subdivision: u32) {
        self.debug_sphere(v3(pos), radius, subdivision);
    }

    fn draw_circle(&mut self, center: &Vec3, radius: f32, subdivision: u32) {
        self.debug_circle(v3(center), radius, subdivision);
    }

    /// Cross marker with the same half-size on every axis.
    fn draw_point(&mut self, pos: &Vec3, radius: f32) {
        self.debug_point(v3(pos), radius);
    }

    /// Cross marker with independent half-sizes per axis.
    fn draw_point_scaled(&mut self, pos: &Vec3, scale: &Vec3) {
        self.debug_point_scaled(v3(pos), v3(scale));
    }

    fn draw_quad(&mut self, pos: &Vec3, scale: &Vec2, orientation: f32) {
        self.debug_quad(v3(pos), math::vec2_to_array(scale), orientation);
    }

    fn draw_axes(&mut self, transform: &Mat4, style: &AxesStyle) {
        self.debug_axes(&m4(transform), style);
    }

    fn draw_arc(&mut self, center: &Vec3, p1: &Vec3, p2: &Vec3, arrow_size: f32, show_root: bool) {
        self.debug_arc(v3(center), v3(p1), v3(p2), arrow_size, show_root);
    }

    fn draw_thick_arc(
        &mut self,
        center: &Vec3,
        p1: &Vec3,
        p2: &Vec3,
        thickness: f32,
        show_root: bool,
    ) {
        self.debug_thick_arc(v3(center), v3(p1), v3(p2), thickness, show_root);
    }

    /// Format `args` and draw the result. Usually called through
    /// [`debug_text!`](crate::debug_text).
    fn draw_text(&mut self, pos: &Vec3, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(text) => self.debug_text(v3(pos), text),
            None => self.debug_text(v3(pos), &args.to_string()),
        }
    }

    fn draw_frustum(&mut self, view: &Mat4, projection: &Mat4) {
        self.debug_frustum(&m4(view), &m4(projection));
    }

    fn set_view_transform(&mut self, view: &Mat4) {
        self.set_view_matrix(&m4(view));
    }

    fn set_projection_transform(&mut self, projection: &Mat4) {
        self.set_projection_matrix(&m4(projection));
    }

    fn view_transform(&self) -> Mat4 {
        math::mat4_from_cols_array_2d(&self.view_matrix())
    }

    fn projection_transform(&self) -> Mat4 {
        math::mat4_from_cols_array_2d(&self.projection_matrix())
    }

    fn view_projection_transform(&self) -> Mat4 {
        math::mat4_from_cols_array_2d(&self.view_projection_matrix())
    }

    /// X/Y/Z euler angles in degrees to a rotation.
    fn euler_to_rotation(&self, angles: &Vec3) -> UnitQuat {
        math::unit_quat_from_array(self.euler_to_quat(v3(angles)))
    }

    fn rotation_arc_transform(&self, p0: &Vec3, p1: &Vec3) -> Mat4 {
        math::mat4_from_cols_array_2d(&self.rotation_arc(v3(p0), v3(p1)))
    }

    fn begin_draw_group_at(&mut self, pose: &Mat4) -> DrawGroupId {
        self.begin_draw_group(&m4(pose))
    }

    fn set_draw_group_transform(&mut self, id: DrawGroupId, pose: &Mat4) -> Result<()> {
        self.set_draw_group_pose(id, &m4(pose))
    }

    fn set_pose_transform(&mut self, pose: &Mat4) {
        self.set_pose(&m4(pose));
    }

    /// Set the pose from a rotation and translation.
    fn set_pose_isometry(&mut self, pose: &Isometry) {
        self.set_pose(&m4(&pose.to_homogeneous()));
    }

    fn set_pose_translation(&mut self, position: &Vec3) {
        self.set_position(v3(position));
    }

    fn set_pose_rotation(&mut self, rotation: &UnitQuat) {
        self.set_orientation(math::quat_to_array(rotation.into_inner()));
    }

    fn pose_transform(&self) -> Mat4 {
        math::mat4_from_cols_array_2d(&self.pose())
    }
}

impl<T: RenderDebug + ?Sized> RenderDebugTyped for T {}

/// Draw formatted text at a [`Vec3`](render_debug_core::math::Vec3).
///
/// ```ignore
/// debug_text!(ctx, &Vec3::new(0.0, 1.0, 0.0), "speed {:.1}", speed);
/// ```
#[macro_export]
macro_rules! debug_text {
    ($rd:expr, $pos:expr, $($arg:tt)*) => {
        $crate::RenderDebugTyped::draw_text($rd, $pos, format_args!($($arg)*))
    };
}
