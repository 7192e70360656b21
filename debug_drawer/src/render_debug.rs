//! The untyped debug drawing interface.
//!
//! Every method takes plain arrays (see [`render_debug_core::math`] for the
//! layouts) and packed `0xAARRGGBB` colors. The typed facade in
//! [`RenderDebugTyped`](crate::RenderDebugTyped) converts math types into
//! these calls.

use std::fmt;

use render_debug_core::color::PackedColor;
use render_debug_core::math::{self, RawMat4};

use crate::error::Result;
use crate::state::{RenderFlags, RenderState};

/// Default thickness of [`RenderDebug::debug_thick_ray`].
pub const DEFAULT_THICK_RAY_SIZE: f32 = 0.02;

/// Default subdivision level of [`RenderDebug::debug_sphere`].
pub const DEFAULT_SPHERE_SUBDIVISION: u32 = 2;

/// Default arrow head size of [`RenderDebug::debug_arc`].
pub const DEFAULT_ARC_ARROW_SIZE: f32 = 0.1;

/// Default thickness of [`RenderDebug::debug_thick_arc`].
pub const DEFAULT_ARC_THICKNESS: f32 = 0.02;

/// Handle of a draw group returned by [`RenderDebug::begin_draw_group`].
///
/// Ids are non-negative and allocated in increasing order starting at 1.
/// An allocator never reuses an id until it runs out: once `i32::MAX` has
/// been issued, every later allocation returns `i32::MAX` again and a
/// warning is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawGroupId(i32);

impl DrawGroupId {
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for DrawGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic [`DrawGroupId`] allocator, saturating at `i32::MAX`.
#[derive(Debug, Clone)]
pub(crate) struct DrawGroupIds {
    next: i32,
    exhausted: bool,
}

impl DrawGroupIds {
    pub(crate) fn new() -> Self {
        Self {
            next: 1,
            exhausted: false,
        }
    }

    pub(crate) fn allocate(&mut self) -> DrawGroupId {
        if self.exhausted {
            log::warn!("Draw group ids exhausted, reusing id {}", self.next);
            return DrawGroupId(self.next);
        }
        let id = DrawGroupId(self.next);
        match self.next.checked_add(1) {
            Some(next) => self.next = next,
            None => self.exhausted = true,
        }
        id
    }
}

/// How [`RenderDebug::debug_axes`] draws each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugAxesRenderMode {
    /// Thick shafts with cone tips.
    #[default]
    Solid,
    /// Lines with arrow heads.
    Lines,
}

/// Which axis of [`RenderDebug::debug_axes`] is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightAxis {
    #[default]
    None,
    X,
    Y,
    Z,
}

impl HighlightAxis {
    /// Axis index 0..=2, or `None`.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::X => Some(0),
            Self::Y => Some(1),
            Self::Z => Some(2),
        }
    }
}

/// Presentation options for [`RenderDebug::debug_axes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesStyle {
    /// Length of each axis.
    pub distance: f32,
    /// Multiplier applied to the axis colors.
    pub brightness: f32,
    /// Draw `X`, `Y`, `Z` text labels at the axis tips.
    pub show_xyz: bool,
    /// Draw rotation rings instead of translation arrows.
    pub show_rotation: bool,
    pub highlight: HighlightAxis,
    pub render_mode: DebugAxesRenderMode,
}

impl AxesStyle {
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_labels(mut self, show_xyz: bool) -> Self {
        self.show_xyz = show_xyz;
        self
    }

    pub fn with_rotation(mut self, show_rotation: bool) -> Self {
        self.show_rotation = show_rotation;
        self
    }

    pub fn with_highlight(mut self, highlight: HighlightAxis) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_render_mode(mut self, render_mode: DebugAxesRenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            distance: 0.1,
            brightness: 1.0,
            show_xyz: false,
            show_rotation: false,
            highlight: HighlightAxis::None,
            render_mode: DebugAxesRenderMode::Solid,
        }
    }
}

/// Untyped debug drawing interface.
///
/// Object safe: renderers and recorders are usually held as
/// `&mut dyn RenderDebug`.
pub trait RenderDebug {
    // ----- Primitives -----

    /// Draw a closed polygon through `points`.
    fn debug_polygon(&mut self, points: &[[f32; 3]]);

    /// Draw a single line using the current color.
    fn debug_line(&mut self, p1: [f32; 3], p2: [f32; 3]);

    /// Draw a line whose color goes from `c1` at `p1` to `c2` at `p2`.
    fn debug_gradient_line(
        &mut self,
        p1: [f32; 3],
        p2: [f32; 3],
        c1: PackedColor,
        c2: PackedColor,
    );

    /// Draw a line with an arrow head at `p2`.
    fn debug_ray(&mut self, p1: [f32; 3], p2: [f32; 3]);

    fn debug_cylinder(&mut self, p1: [f32; 3], p2: [f32; 3], radius: f32);

    /// Draw a ray extruded as a cylinder of radius `ray_size`, optionally
    /// capped with a cone tip.
    fn debug_thick_ray(&mut self, p1: [f32; 3], p2: [f32; 3], ray_size: f32, arrow_tip: bool);

    /// Draw the plane `[nx, ny, nz, d]` as two concentric rings.
    fn debug_plane(&mut self, plane: [f32; 4], radius1: f32, radius2: f32);

    fn debug_tri(&mut self, p1: [f32; 3], p2: [f32; 3], p3: [f32; 3]);

    fn debug_tri_normals(&mut self, points: [[f32; 3]; 3], normals: [[f32; 3]; 3]);

    fn debug_gradient_tri(&mut self, points: [[f32; 3]; 3], colors: [PackedColor; 3]);

    fn debug_gradient_tri_normals(
        &mut self,
        points: [[f32; 3]; 3],
        normals: [[f32; 3]; 3],
        colors: [PackedColor; 3],
    );

    /// Draw the axis-aligned box `[min, max]`.
    fn debug_bound(&mut self, bounds: [[f32; 3]; 2]);

    fn debug_sphere(&mut self, pos: [f32; 3], radius: f32, subdivision: u32);

    /// Draw a circle in the XY plane of the current pose.
    fn debug_circle(&mut self, center: [f32; 3], radius: f32, subdivision: u32);

    /// Draw a point as a cross of half-size `radius`.
    fn debug_point(&mut self, pos: [f32; 3], radius: f32);

    /// Draw a point as a cross with independent half-sizes per axis.
    fn debug_point_scaled(&mut self, pos: [f32; 3], scale: [f32; 3]);

    /// Draw a screen-facing quad of size `scale`, rotated by `orientation` radians.
    fn debug_quad(&mut self, pos: [f32; 3], scale: [f32; 2], orientation: f32);

    /// Visualize a 4x4 transform as three axes.
    fn debug_axes(&mut self, transform: &RawMat4, style: &AxesStyle);

    /// Draw an arc around `center` from `p1` to `p2` with an arrow head.
    fn debug_arc(
        &mut self,
        center: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        arrow_size: f32,
        show_root: bool,
    );

    fn debug_thick_arc(
        &mut self,
        center: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        thickness: f32,
        show_root: bool,
    );

    /// Draw `text` as wireframe glyphs.
    fn debug_text(&mut self, pos: [f32; 3], text: &str);

    /// Draw the wireframe of the frustum of `projection * view`.
    fn debug_frustum(&mut self, view: &RawMat4, projection: &RawMat4);

    // ----- Local camera -----

    /// Set the view matrix. Local only, never recorded or transmitted.
    fn set_view_matrix(&mut self, view: &RawMat4);

    /// Set the projection matrix. Local only, never recorded or transmitted.
    fn set_projection_matrix(&mut self, projection: &RawMat4);

    fn view_matrix(&self) -> RawMat4;

    fn projection_matrix(&self) -> RawMat4;

    /// `projection * view` of the most recently set matrices.
    fn view_projection_matrix(&self) -> RawMat4;

    // ----- Utilities -----

    /// Convert X/Y/Z euler angles in degrees into an `[x, y, z, w]` quaternion.
    fn euler_to_quat(&self, angles: [f32; 3]) -> [f32; 4] {
        let q = math::euler_to_quat_degrees(&math::vec3_from_array(angles));
        math::quat_to_array(q.into_inner())
    }

    /// Transform orienting the local +Y axis from `p0` towards `p1`.
    fn rotation_arc(&self, p0: [f32; 3], p1: [f32; 3]) -> RawMat4 {
        let m = math::rotation_arc(&math::vec3_from_array(p0), &math::vec3_from_array(p1));
        math::mat4_to_cols_array_2d(&m)
    }

    // ----- Draw groups -----

    /// Start a draw group anchored at `pose`. Primitives drawn until
    /// [`end_draw_group`](Self::end_draw_group) belong to the group.
    fn begin_draw_group(&mut self, pose: &RawMat4) -> DrawGroupId;

    /// Close the open draw group, if any.
    fn end_draw_group(&mut self);

    /// Move the anchor of a previously returned group.
    fn set_draw_group_pose(&mut self, id: DrawGroupId, pose: &RawMat4) -> Result<()>;

    fn set_draw_group_visible(&mut self, id: DrawGroupId, visible: bool) -> Result<()>;

    /// Release a group. Its id is never handed out again.
    fn release_draw_group(&mut self, id: DrawGroupId) -> Result<()>;

    // ----- Global pose -----

    /// Replace the global pose.
    fn set_pose(&mut self, pose: &RawMat4);

    /// Replace the translation of the global pose only.
    fn set_position(&mut self, position: [f32; 3]);

    /// Replace the orientation of the global pose only.
    fn set_orientation(&mut self, rotation: [f32; 4]);

    fn pose(&self) -> RawMat4;

    // ----- Render state -----

    fn push_render_state(&mut self) -> Result<()>;

    fn pop_render_state(&mut self) -> Result<()>;

    fn set_current_color(&mut self, color: PackedColor, arrow_color: PackedColor);

    fn set_current_arrow_size(&mut self, size: f32);

    fn set_current_text_scale(&mut self, scale: f32);

    fn set_render_flags(&mut self, flags: RenderFlags);

    fn render_state(&self) -> RenderState;

    fn add_render_flags(&mut self, flags: RenderFlags) {
        let current = self.render_state().flags;
        self.set_render_flags(current | flags);
    }

    fn remove_render_flags(&mut self, flags: RenderFlags) {
        let current = self.render_state().flags;
        self.set_render_flags(current - flags);
    }
}
