//! Tessellation of [`RenderDebug`] calls into line and triangle lists.
//!
//! Every input position is moved by the global pose of the current render
//! state. Helpers below the trait impl work in world space.

use std::f32::consts::{PI, TAU};

use render_debug_core::color::{self, PackedColor};
use render_debug_core::math::{self, Bounds3, Plane, RawMat4, UnitQuat, Vec3};

use crate::config::{self, MAX_CIRCLE_SEGMENTS};
use crate::drawer::DebugDrawerContext;
use crate::error::Result;
use crate::font;
use crate::render_debug::{AxesStyle, DebugAxesRenderMode, DrawGroupId, RenderDebug};
use crate::state::{RenderFlags, RenderState};

/// Box and frustum edges over corners ordered bottom `[0..4]`, top `[4..8]`.
const BOX_EDGES: [(usize, usize); 12] = [
    // Bottom face
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    // Top face
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    // Vertical edges
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Box faces, counter-clockwise seen from outside.
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [3, 7, 6, 2],
    [0, 4, 7, 3],
    [1, 2, 6, 5],
];

const AXIS_LABELS: [&str; 3] = ["X", "Y", "Z"];
const AXIS_COLORS: [PackedColor; 3] = [color::RED, color::GREEN, color::BLUE];

/// Great-circle segment count of a sphere.
fn sphere_segments(subdivision: u32) -> u32 {
    (8u32 << subdivision.min(5)).clamp(4, MAX_CIRCLE_SEGMENTS)
}

fn valid_radius(radius: f32) -> bool {
    radius.is_finite() && radius > 0.0
}

/// `segments` points on the circle spanned by `u` and `v`.
fn ring(center: &Vec3, u: &Vec3, v: &Vec3, radius: f32, segments: u32) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let (sin, cos) = (i as f32 * TAU / segments as f32).sin_cos();
            center + (u * cos + v * sin) * radius
        })
        .collect()
}

/// Which kinds of geometry a primitive emits.
#[derive(Debug, Clone, Copy)]
struct Fill {
    solid: bool,
    wire: bool,
}

impl Fill {
    const SOLID: Self = Self {
        solid: true,
        wire: false,
    };

    fn from_state(state: &RenderState) -> Self {
        Self {
            solid: state.is_solid(),
            wire: state.is_wire(),
        }
    }
}

impl RenderDebug for DebugDrawerContext<'_> {
    fn debug_polygon(&mut self, points: &[[f32; 3]]) {
        if points.len() < 2 {
            log::debug!("Skipping polygon with {} points", points.len());
            return;
        }
        let state = self.current();
        let fill = Fill::from_state(&state);
        let world: Vec<Vec3> = points.iter().map(|p| self.to_world(*p)).collect();
        if world.len() == 2 {
            self.line(&world[0], &world[1], state.color);
            return;
        }
        if fill.solid {
            for i in 1..world.len() - 1 {
                self.solid_tri(&world[0], &world[i], &world[i + 1], state.color);
            }
        }
        if fill.wire {
            self.line_loop(&world, state.color);
        }
    }

    fn debug_line(&mut self, p1: [f32; 3], p2: [f32; 3]) {
        let color = self.current().color;
        let (a, b) = (self.to_world(p1), self.to_world(p2));
        self.line(&a, &b, color);
    }

    fn debug_gradient_line(
        &mut self,
        p1: [f32; 3],
        p2: [f32; 3],
        c1: PackedColor,
        c2: PackedColor,
    ) {
        let (a, b) = (self.to_world(p1), self.to_world(p2));
        self.gradient_line(&a, &b, c1, c2);
    }

    fn debug_ray(&mut self, p1: [f32; 3], p2: [f32; 3]) {
        let state = self.current();
        let (a, b) = (self.to_world(p1), self.to_world(p2));
        if (b - a).norm_squared() <= f32::EPSILON {
            log::debug!("Skipping zero-length ray at {:?}", p1);
            return;
        }
        self.line(&a, &b, state.color);
        self.arrow_head(&a, &b, state.arrow_size, state.arrow_color);
    }

    fn debug_cylinder(&mut self, p1: [f32; 3], p2: [f32; 3], radius: f32) {
        if !valid_radius(radius) {
            log::debug!("Skipping cylinder with radius {}", radius);
            return;
        }
        let state = self.current();
        let (a, b) = (self.to_world(p1), self.to_world(p2));
        self.cylinder_between(&a, &b, radius, state.color, Fill::from_state(&state));
    }

    fn debug_thick_ray(&mut self, p1: [f32; 3], p2: [f32; 3], ray_size: f32, arrow_tip: bool) {
        if !valid_radius(ray_size) {
            log::debug!("Skipping thick ray with size {}", ray_size);
            return;
        }
        let state = self.current();
        let fill = Fill::from_state(&state);
        let (a, b) = (self.to_world(p1), self.to_world(p2));
        let length = (b - a).norm();
        let Some(dir) = (b - a).try_normalize(f32::EPSILON) else {
            log::debug!("Skipping zero-length thick ray at {:?}", p1);
            return;
        };
        // Head length is the current arrow size, never longer than the ray.
        let head = if arrow_tip && valid_radius(state.arrow_size) {
            state.arrow_size.min(length)
        } else {
            0.0
        };
        let shaft_end = b - dir * head;
        if length - head > f32::EPSILON {
            self.cylinder_between(&a, &shaft_end, ray_size, state.color, fill);
        }
        if head > 0.0 {
            let head_radius = (state.arrow_size * 0.5).max(ray_size);
            self.cone(&shaft_end, &b, head_radius, state.arrow_color, fill);
        }
    }

    fn debug_plane(&mut self, plane: [f32; 4], radius1: f32, radius2: f32) {
        let plane = Plane::from_array(plane);
        let Some(origin) = plane.origin() else {
            log::warn!("Skipping plane with zero normal");
            return;
        };
        let state = self.current();
        let normal = plane.normal.normalize();
        let (u, v) = math::orthonormal_basis(&normal);
        let center = self.world_point(&origin);
        let (u, v) = (self.world_vector(&u), self.world_vector(&v));
        for radius in [radius1, radius2] {
            if valid_radius(radius) {
                let points = ring(&center, &u, &v, radius, self.circle_segments);
                self.line_loop(&points, state.color);
            }
        }
        let length = if valid_radius(radius1) { radius1 } else { radius2 };
        if valid_radius(length) {
            let tip = self.world_point(&(origin + normal * length));
            self.line(&center, &tip, state.color);
            self.arrow_head(&center, &tip, state.arrow_size, state.arrow_color);
        }
    }

    fn debug_tri(&mut self, p1: [f32; 3], p2: [f32; 3], p3: [f32; 3]) {
        let color = self.current().color;
        self.tri([p1, p2, p3], None, [color; 3]);
    }

    fn debug_tri_normals(&mut self, points: [[f32; 3]; 3], normals: [[f32; 3]; 3]) {
        let color = self.current().color;
        self.tri(points, Some(normals), [color; 3]);
    }

    fn debug_gradient_tri(&mut self, points: [[f32; 3]; 3], colors: [PackedColor; 3]) {
        self.tri(points, None, colors);
    }

    fn debug_gradient_tri_normals(
        &mut self,
        points: [[f32; 3]; 3],
        normals: [[f32; 3]; 3],
        colors: [PackedColor; 3],
    ) {
        self.tri(points, Some(normals), colors);
    }

    fn debug_bound(&mut self, bounds: [[f32; 3]; 2]) {
        let bounds = Bounds3::from_array(bounds);
        if bounds.is_empty() {
            log::debug!("Skipping empty bounds {:?}", bounds);
            return;
        }
        let state = self.current();
        let fill = Fill::from_state(&state);
        let c = bounds.corners().map(|p| self.world_point(&p));
        if fill.solid {
            for [a, b, d, e] in BOX_FACES {
                self.solid_quad(&c[a], &c[b], &c[d], &c[e], state.color);
            }
        }
        if fill.wire {
            for (a, b) in BOX_EDGES {
                self.line(&c[a], &c[b], state.color);
            }
        }
    }

    fn debug_sphere(&mut self, pos: [f32; 3], radius: f32, subdivision: u32) {
        if !valid_radius(radius) {
            log::debug!("Skipping sphere with radius {}", radius);
            return;
        }
        let state = self.current();
        let fill = Fill::from_state(&state);
        let center = self.to_world(pos);
        let axes = [Vec3::x(), Vec3::y(), Vec3::z()].map(|a| self.world_vector(&a));
        let segments = sphere_segments(subdivision);
        if fill.solid {
            self.solid_sphere(&center, &axes, radius, segments, state.color);
        }
        if fill.wire {
            for (u, v) in [(0, 1), (0, 2), (1, 2)] {
                let points = ring(&center, &axes[u], &axes[v], radius, segments);
                self.line_loop(&points, state.color);
            }
        }
    }

    fn debug_circle(&mut self, center: [f32; 3], radius: f32, subdivision: u32) {
        if !valid_radius(radius) {
            log::debug!("Skipping circle with radius {}", radius);
            return;
        }
        let state = self.current();
        let fill = Fill::from_state(&state);
        let center = self.to_world(center);
        let (u, v) = (self.world_vector(&Vec3::x()), self.world_vector(&Vec3::y()));
        let points = ring(&center, &u, &v, radius, config::clamp_segments(subdivision));
        if fill.solid {
            for i in 0..points.len() {
                let j = (i + 1) % points.len();
                self.solid_tri(&center, &points[i], &points[j], state.color);
            }
        }
        if fill.wire {
            self.line_loop(&points, state.color);
        }
    }

    fn debug_point(&mut self, pos: [f32; 3], radius: f32) {
        self.debug_point_scaled(pos, [radius; 3]);
    }

    fn debug_point_scaled(&mut self, pos: [f32; 3], scale: [f32; 3]) {
        if scale.iter().any(|s| !s.is_finite()) {
            log::debug!("Skipping point with scale {:?}", scale);
            return;
        }
        let color = self.current().color;
        let center = self.to_world(pos);
        for (axis, half) in [Vec3::x(), Vec3::y(), Vec3::z()].iter().zip(scale) {
            let offset = self.world_vector(axis) * half;
            self.line(&(center - offset), &(center + offset), color);
        }
    }

    fn debug_quad(&mut self, pos: [f32; 3], scale: [f32; 2], orientation: f32) {
        let state = self.current();
        let fill = Fill::from_state(&state);
        let center = self.to_world(pos);
        let (right, up) = match self.camera.billboard_axes() {
            Some(axes) => axes,
            None => (self.world_vector(&Vec3::x()), self.world_vector(&Vec3::y())),
        };
        let (sin, cos) = orientation.sin_cos();
        let r = (right * cos + up * sin) * (scale[0] * 0.5);
        let u = (up * cos - right * sin) * (scale[1] * 0.5);
        let corners = [
            center - r - u,
            center + r - u,
            center + r + u,
            center - r + u,
        ];
        if fill.solid {
            self.solid_quad(&corners[0], &corners[1], &corners[2], &corners[3], state.color);
        }
        if fill.wire {
            self.line_loop(&corners, state.color);
        }
    }

    fn debug_axes(&mut self, transform: &RawMat4, style: &AxesStyle) {
        if !valid_radius(style.distance) {
            log::debug!("Skipping axes with distance {}", style.distance);
            return;
        }
        let transform = self.current().pose * math::mat4_from_cols_array_2d(transform);
        let origin = math::mat4_translation(&transform);
        let highlighted = style.highlight.index();

        for axis in 0..3 {
            let column = Vec3::new(
                transform[(0, axis)],
                transform[(1, axis)],
                transform[(2, axis)],
            );
            let Some(dir) = column.try_normalize(f32::EPSILON) else {
                continue;
            };
            let color = if highlighted == Some(axis) {
                color::YELLOW
            } else {
                color::scale_brightness(AXIS_COLORS[axis], style.brightness)
            };
            let tip = origin + dir * style.distance;

            if style.show_rotation {
                let (u, v) = math::orthonormal_basis(&dir);
                let points = ring(&origin, &u, &v, style.distance, self.circle_segments);
                self.line_loop(&points, color);
            } else {
                match style.render_mode {
                    DebugAxesRenderMode::Lines => {
                        self.line(&origin, &tip, color);
                        self.arrow_head(&origin, &tip, style.distance * 0.2, color);
                    }
                    DebugAxesRenderMode::Solid => {
                        let radius = style.distance * 0.05;
                        let shaft_end = tip - dir * (radius * 4.0);
                        self.cylinder_between(&origin, &shaft_end, radius, color, Fill::SOLID);
                        self.cone(&shaft_end, &tip, radius * 2.0, color, Fill::SOLID);
                    }
                }
            }

            if style.show_xyz {
                let label = origin + dir * (style.distance * 1.1);
                self.text_at(&label, AXIS_LABELS[axis], color);
            }
        }
    }

    fn debug_arc(
        &mut self,
        center: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        arrow_size: f32,
        show_root: bool,
    ) {
        let state = self.current();
        let (c, a, b) = (self.to_world(center), self.to_world(p1), self.to_world(p2));
        let Some(path) = self.arc_path(&c, &a, &b) else {
            return;
        };
        self.line_strip(&path, state.color);
        if let [.., before, last] = path.as_slice() {
            self.arrow_head(before, last, arrow_size, state.arrow_color);
        }
        if show_root {
            self.line(&c, &a, state.color);
            self.line(&c, &b, state.color);
        }
    }

    fn debug_thick_arc(
        &mut self,
        center: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        thickness: f32,
        show_root: bool,
    ) {
        if !valid_radius(thickness) {
            log::debug!("Skipping thick arc with thickness {}", thickness);
            return;
        }
        let state = self.current();
        let fill = Fill::from_state(&state);
        let (c, a, b) = (self.to_world(center), self.to_world(p1), self.to_world(p2));
        let Some(path) = self.arc_path(&c, &a, &b) else {
            return;
        };
        for pair in path.windows(2) {
            self.cylinder_between(&pair[0], &pair[1], thickness, state.color, fill);
        }
        if show_root {
            self.line(&c, &a, state.color);
            self.line(&c, &b, state.color);
        }
    }

    fn debug_text(&mut self, pos: [f32; 3], text: &str) {
        let color = self.current().color;
        let origin = self.to_world(pos);
        self.text_at(&origin, text, color);
    }

    fn debug_frustum(&mut self, view: &RawMat4, projection: &RawMat4) {
        let view = math::mat4_from_cols_array_2d(view);
        let projection = math::mat4_from_cols_array_2d(projection);
        let Some(corners) = math::frustum_corners(&view, &projection) else {
            log::warn!("Skipping frustum: view-projection matrix is not invertible");
            return;
        };
        let color = self.current().color;
        let c = corners.map(|p| self.world_point(&p));
        for (a, b) in BOX_EDGES {
            self.line(&c[a], &c[b], color);
        }
    }

    fn set_view_matrix(&mut self, view: &RawMat4) {
        self.camera.set_view(math::mat4_from_cols_array_2d(view));
        self.camera_dirty = true;
    }

    fn set_projection_matrix(&mut self, projection: &RawMat4) {
        self.camera
            .set_projection(math::mat4_from_cols_array_2d(projection));
        self.camera_dirty = true;
    }

    fn view_matrix(&self) -> RawMat4 {
        math::mat4_to_cols_array_2d(self.camera.view())
    }

    fn projection_matrix(&self) -> RawMat4 {
        math::mat4_to_cols_array_2d(self.camera.projection())
    }

    fn view_projection_matrix(&self) -> RawMat4 {
        math::mat4_to_cols_array_2d(self.camera.view_projection())
    }

    fn begin_draw_group(&mut self, pose: &RawMat4) -> DrawGroupId {
        self.begin_group(math::mat4_from_cols_array_2d(pose))
    }

    fn end_draw_group(&mut self) {
        self.end_group();
    }

    fn set_draw_group_pose(&mut self, id: DrawGroupId, pose: &RawMat4) -> Result<()> {
        self.set_group_pose(id, math::mat4_from_cols_array_2d(pose))
    }

    fn set_draw_group_visible(&mut self, id: DrawGroupId, visible: bool) -> Result<()> {
        self.set_group_visible(id, visible)
    }

    fn release_draw_group(&mut self, id: DrawGroupId) -> Result<()> {
        self.release_group(id)
    }

    fn set_pose(&mut self, pose: &RawMat4) {
        self.state.set_pose(math::mat4_from_cols_array_2d(pose));
    }

    fn set_position(&mut self, position: [f32; 3]) {
        self.state.set_position(&math::vec3_from_array(position));
    }

    fn set_orientation(&mut self, rotation: [f32; 4]) {
        self.state
            .set_orientation(&math::unit_quat_from_array(rotation));
    }

    fn pose(&self) -> RawMat4 {
        math::mat4_to_cols_array_2d(&self.state.current().pose)
    }

    fn push_render_state(&mut self) -> Result<()> {
        self.state.push()
    }

    fn pop_render_state(&mut self) -> Result<()> {
        self.state.pop()
    }

    fn set_current_color(&mut self, color: PackedColor, arrow_color: PackedColor) {
        let state = self.state.current_mut();
        state.color = color;
        state.arrow_color = arrow_color;
    }

    fn set_current_arrow_size(&mut self, size: f32) {
        self.state.current_mut().arrow_size = size;
    }

    fn set_current_text_scale(&mut self, scale: f32) {
        self.state.current_mut().text_scale = scale;
    }

    fn set_render_flags(&mut self, flags: RenderFlags) {
        self.state.current_mut().flags = flags;
    }

    fn render_state(&self) -> RenderState {
        *self.state.current()
    }
}

impl DebugDrawerContext<'_> {
    fn current(&self) -> RenderState {
        *self.state.current()
    }

    fn to_world(&self, p: [f32; 3]) -> Vec3 {
        self.world_point(&math::vec3_from_array(p))
    }

    fn world_point(&self, p: &Vec3) -> Vec3 {
        math::transform_point(&self.state.current().pose, p)
    }

    fn world_vector(&self, v: &Vec3) -> Vec3 {
        self.state.current().pose.transform_vector(v)
    }

    fn line(&mut self, a: &Vec3, b: &Vec3, color: PackedColor) {
        self.push_line(
            math::vec3_to_array(a),
            math::vec3_to_array(b),
            color::unpack_argb(color),
        );
    }

    fn gradient_line(&mut self, a: &Vec3, b: &Vec3, c1: PackedColor, c2: PackedColor) {
        self.push_gradient_line(
            math::vec3_to_array(a),
            math::vec3_to_array(b),
            color::unpack_argb(c1),
            color::unpack_argb(c2),
        );
    }

    fn line_strip(&mut self, points: &[Vec3], color: PackedColor) {
        for pair in points.windows(2) {
            self.line(&pair[0], &pair[1], color);
        }
    }

    fn line_loop(&mut self, points: &[Vec3], color: PackedColor) {
        for (i, a) in points.iter().enumerate() {
            let b = &points[(i + 1) % points.len()];
            self.line(a, b, color);
        }
    }

    /// Emit one filled triangle, honoring the winding flags.
    ///
    /// Without explicit normals the face normal is used.
    fn triangle(
        &mut self,
        points: [Vec3; 3],
        normals: Option<[Vec3; 3]>,
        colors: [PackedColor; 3],
    ) {
        let flags = self.state.current().flags;
        let order = if flags.contains(RenderFlags::COUNTER_CLOCKWISE) {
            [0, 2, 1]
        } else {
            [0, 1, 2]
        };
        let p = order.map(|i| points[i]);
        let c = order.map(|i| color::unpack_argb(colors[i]));
        let n = match normals {
            Some(normals) => order.map(|i| {
                normals[i]
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vec3::zeros)
            }),
            None => match (p[1] - p[0]).cross(&(p[2] - p[0])).try_normalize(f32::EPSILON) {
                Some(face) => [face; 3],
                None => {
                    log::debug!("Skipping degenerate triangle {:?}", p);
                    return;
                }
            },
        };
        for i in 0..3 {
            self.push_solid_vertex(
                math::vec3_to_array(&p[i]),
                math::vec3_to_array(&n[i]),
                c[i],
            );
        }
        if flags.contains(RenderFlags::DOUBLE_SIDED) {
            for i in [0, 2, 1] {
                self.push_solid_vertex(
                    math::vec3_to_array(&p[i]),
                    math::vec3_to_array(&-n[i]),
                    c[i],
                );
            }
        }
    }

    fn solid_tri(&mut self, a: &Vec3, b: &Vec3, c: &Vec3, color: PackedColor) {
        self.triangle([*a, *b, *c], None, [color; 3]);
    }

    fn solid_quad(&mut self, a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3, color: PackedColor) {
        self.solid_tri(a, b, c, color);
        self.solid_tri(a, c, d, color);
    }

    /// Triangle primitives given in pose-local space.
    fn tri(
        &mut self,
        points: [[f32; 3]; 3],
        normals: Option<[[f32; 3]; 3]>,
        colors: [PackedColor; 3],
    ) {
        let fill = Fill::from_state(self.state.current());
        let p = points.map(|q| self.to_world(q));
        if fill.solid {
            let normals =
                normals.map(|n| n.map(|v| self.world_vector(&math::vec3_from_array(v))));
            self.triangle(p, normals, colors);
        }
        if fill.wire {
            self.gradient_line(&p[0], &p[1], colors[0], colors[1]);
            self.gradient_line(&p[1], &p[2], colors[1], colors[2]);
            self.gradient_line(&p[2], &p[0], colors[2], colors[0]);
        }
    }

    /// Four-line arrow head at `tip`, pointing away from `from`.
    fn arrow_head(&mut self, from: &Vec3, tip: &Vec3, size: f32, color: PackedColor) {
        if !valid_radius(size) {
            return;
        }
        let Some(dir) = (tip - from).try_normalize(f32::EPSILON) else {
            return;
        };
        let (u, v) = math::orthonormal_basis(&dir);
        let base = tip - dir * size;
        let spread = size * 0.5;
        for side in [u * spread, -u * spread, v * spread, -v * spread] {
            self.line(tip, &(base + side), color);
        }
    }

    fn cylinder_between(
        &mut self,
        p1: &Vec3,
        p2: &Vec3,
        radius: f32,
        color: PackedColor,
        fill: Fill,
    ) {
        let Some(axis) = (p2 - p1).try_normalize(f32::EPSILON) else {
            log::debug!("Skipping zero-length cylinder at {:?}", p1);
            return;
        };
        let (u, v) = math::orthonormal_basis(&axis);
        let segments = self.circle_segments;
        let bottom = ring(p1, &u, &v, radius, segments);
        let top = ring(p2, &u, &v, radius, segments);
        if fill.solid {
            for i in 0..bottom.len() {
                let j = (i + 1) % bottom.len();
                let (ni, nj) = (bottom[i] - p1, bottom[j] - p1);
                self.triangle([bottom[i], bottom[j], top[j]], Some([ni, nj, nj]), [color; 3]);
                self.triangle([bottom[i], top[j], top[i]], Some([ni, nj, ni]), [color; 3]);
            }
        }
        if fill.wire {
            self.line_loop(&bottom, color);
            self.line_loop(&top, color);
            for quarter in 0..4 {
                let k = (quarter * segments / 4) as usize;
                self.line(&bottom[k], &top[k], color);
            }
        }
    }

    fn cone(&mut self, base: &Vec3, tip: &Vec3, radius: f32, color: PackedColor, fill: Fill) {
        let Some(axis) = (tip - base).try_normalize(f32::EPSILON) else {
            return;
        };
        let (u, v) = math::orthonormal_basis(&axis);
        let segments = self.circle_segments;
        let rim = ring(base, &u, &v, radius, segments);
        if fill.solid {
            for i in 0..rim.len() {
                let j = (i + 1) % rim.len();
                self.solid_tri(&rim[i], &rim[j], tip, color);
                self.solid_tri(base, &rim[j], &rim[i], color);
            }
        }
        if fill.wire {
            self.line_loop(&rim, color);
            for quarter in 0..4 {
                let k = (quarter * segments / 4) as usize;
                self.line(&rim[k], tip, color);
            }
        }
    }

    fn solid_sphere(
        &mut self,
        center: &Vec3,
        axes: &[Vec3; 3],
        radius: f32,
        segments: u32,
        color: PackedColor,
    ) {
        let rings = (segments / 2).max(2);
        let offset = |ring: u32, sector: u32| -> Vec3 {
            let (st, ct) = (PI * ring as f32 / rings as f32).sin_cos();
            let (sp, cp) = (TAU * sector as f32 / segments as f32).sin_cos();
            (axes[0] * (st * cp) + axes[1] * (st * sp) + axes[2] * ct) * radius
        };
        for r in 0..rings {
            for s in 0..segments {
                let (a, b) = (offset(r, s), offset(r + 1, s));
                let (c, d) = (offset(r + 1, s + 1), offset(r, s + 1));
                if r != rings - 1 {
                    let points = [center + a, center + b, center + c];
                    self.triangle(points, Some([a, b, c]), [color; 3]);
                }
                if r != 0 {
                    let mid = if r == rings - 1 { b } else { c };
                    let points = [center + a, center + mid, center + d];
                    self.triangle(points, Some([a, mid, d]), [color; 3]);
                }
            }
        }
    }

    /// Points from `p1` to `p2` around `center`, rotating the direction and
    /// interpolating the radius.
    fn arc_path(&self, center: &Vec3, p1: &Vec3, p2: &Vec3) -> Option<Vec<Vec3>> {
        let (d1, d2) = (p1 - center, p2 - center);
        let (r1, r2) = (d1.norm(), d2.norm());
        if r1 <= f32::EPSILON || r2 <= f32::EPSILON {
            log::debug!("Skipping arc with an end point at its center");
            return None;
        }
        let (n1, n2) = (d1 / r1, d2 / r2);
        let angle = n1.dot(&n2).clamp(-1.0, 1.0).acos();
        let axis = n1
            .cross(&n2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| math::orthonormal_basis(&n1).0);
        let segments = self.circle_segments;
        Some(
            (0..=segments)
                .map(|i| {
                    let t = i as f32 / segments as f32;
                    let rotation = UnitQuat::from_scaled_axis(axis * (angle * t));
                    center + rotation * n1 * (r1 + (r2 - r1) * t)
                })
                .collect(),
        )
    }

    /// Stroke-font text with its origin at world position `origin`.
    fn text_at(&mut self, origin: &Vec3, text: &str, color: PackedColor) {
        let state = self.current();
        let camera_axes = if state.flags.contains(RenderFlags::CAMERA_FACING) {
            self.camera.billboard_axes()
        } else {
            None
        };
        let (right, up) = match camera_axes {
            Some(axes) => axes,
            None => (self.world_vector(&Vec3::x()), self.world_vector(&Vec3::y())),
        };
        let centered = state.flags.contains(RenderFlags::CENTER_TEXT);
        for [a, b] in font::layout_text(text, state.text_scale, centered) {
            let start = origin + right * a[0] + up * a[1];
            let end = origin + right * b[0] + up * b[1];
            self.line(&start, &end, color);
        }
    }
}
