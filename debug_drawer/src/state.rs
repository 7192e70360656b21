//! Render state, the render-state stack and local camera matrices.

use bitflags::bitflags;
use render_debug_core::color::{self, PackedColor};
use render_debug_core::math::{self, Mat4, UnitQuat, Vec3};

use crate::error::{RenderDebugError, Result};

bitflags! {
    /// Flags controlling how primitives are tessellated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// Emit filled triangles instead of wireframe lines.
        const SOLID_SHADED = 1 << 0;
        /// Emit filled triangles and a wireframe outline.
        const SOLID_WIRE_SHADED = 1 << 1;
        /// Flip triangle winding.
        const COUNTER_CLOCKWISE = 1 << 2;
        /// Emit both windings of every triangle.
        const DOUBLE_SIDED = 1 << 3;
        /// Orient text towards the camera (needs a view matrix).
        const CAMERA_FACING = 1 << 4;
        /// Center text on its position.
        const CENTER_TEXT = 1 << 5;
        /// Hint for renderers: draw without depth testing.
        const NO_ZBUFFER = 1 << 6;
        /// Hint for renderers: positions are in screen space.
        const SCREEN_SPACE = 1 << 7;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Current drawing state. Saved and restored as a whole by
/// [`StateStack::push`] / [`StateStack::pop`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub color: PackedColor,
    pub arrow_color: PackedColor,
    pub arrow_size: f32,
    pub text_scale: f32,
    pub flags: RenderFlags,
    /// Global pose applied to every subsequent primitive.
    pub pose: Mat4,
}

impl RenderState {
    pub fn with_color(mut self, color: PackedColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_arrow_color(mut self, arrow_color: PackedColor) -> Self {
        self.arrow_color = arrow_color;
        self
    }

    pub fn with_arrow_size(mut self, arrow_size: f32) -> Self {
        self.arrow_size = arrow_size;
        self
    }

    pub fn with_text_scale(mut self, text_scale: f32) -> Self {
        self.text_scale = text_scale;
        self
    }

    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether triangles should be filled.
    pub fn is_solid(&self) -> bool {
        self.flags
            .intersects(RenderFlags::SOLID_SHADED | RenderFlags::SOLID_WIRE_SHADED)
    }

    /// Whether wireframe lines should be emitted.
    pub fn is_wire(&self) -> bool {
        !self.flags.contains(RenderFlags::SOLID_SHADED)
            || self.flags.contains(RenderFlags::SOLID_WIRE_SHADED)
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            color: color::WHITE,
            arrow_color: color::YELLOW,
            arrow_size: 0.1,
            text_scale: 0.2,
            flags: RenderFlags::empty(),
            pose: Mat4::identity(),
        }
    }
}

/// The current [`RenderState`] plus a bounded stack of saved states.
#[derive(Debug, Clone)]
pub struct StateStack {
    current: RenderState,
    saved: Vec<RenderState>,
    max_depth: usize,
}

impl StateStack {
    pub fn new(initial: RenderState, max_depth: usize) -> Self {
        Self {
            current: initial,
            saved: Vec::new(),
            max_depth,
        }
    }

    pub fn current(&self) -> &RenderState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut RenderState {
        &mut self.current
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) -> Result<()> {
        if self.saved.len() >= self.max_depth {
            log::warn!(
                "Render state stack overflow (max depth {}); push ignored",
                self.max_depth
            );
            return Err(RenderDebugError::StateStackOverflow {
                max_depth: self.max_depth,
            });
        }
        self.saved.push(self.current);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<()> {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                Ok(())
            }
            None => {
                log::warn!("Render state stack underflow; pop ignored");
                Err(RenderDebugError::StateStackUnderflow)
            }
        }
    }

    pub fn set_pose(&mut self, pose: Mat4) {
        self.current.pose = pose;
    }

    /// Replace the translation of the pose, keeping its orientation.
    pub fn set_position(&mut self, position: &Vec3) {
        math::mat4_set_translation(&mut self.current.pose, position);
    }

    /// Replace the orientation of the pose, keeping its position.
    pub fn set_orientation(&mut self, rotation: &UnitQuat) {
        math::mat4_set_rotation(&mut self.current.pose, rotation);
    }
}

/// View and projection matrices used for local screen-facing computations.
///
/// Never part of a recorded command stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
    has_view: bool,
}

impl CameraState {
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// `projection * view` of the two most recently set matrices.
    pub fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }

    /// Whether a view matrix was ever set; camera-facing output needs one.
    pub fn has_view(&self) -> bool {
        self.has_view
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
        self.has_view = true;
        self.view_projection = self.projection * self.view;
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.view_projection = self.projection * self.view;
    }

    /// Camera right and up axes in world space, taken from the view rotation.
    pub fn billboard_axes(&self) -> Option<(Vec3, Vec3)> {
        if !self.has_view {
            return None;
        }
        let v = &self.view;
        let right = Vec3::new(v[(0, 0)], v[(0, 1)], v[(0, 2)]);
        let up = Vec3::new(v[(1, 0)], v[(1, 1)], v[(1, 2)]);
        Some((right.try_normalize(f32::EPSILON)?, up.try_normalize(f32::EPSILON)?))
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            view: Mat4::identity(),
            projection: Mat4::identity(),
            view_projection: Mat4::identity(),
            has_view: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_state() {
        let state = RenderState::default();
        assert_eq!(state.color, color::WHITE);
        assert_eq!(state.pose, Mat4::identity());
        assert!(state.is_wire());
        assert!(!state.is_solid());
    }

    #[test]
    fn test_solid_wire_flags() {
        let solid = RenderState::default().with_flags(RenderFlags::SOLID_SHADED);
        assert!(solid.is_solid());
        assert!(!solid.is_wire());

        let both = RenderState::default().with_flags(RenderFlags::SOLID_WIRE_SHADED);
        assert!(both.is_solid());
        assert!(both.is_wire());
    }

    #[test]
    fn test_push_pop_restores_state() {
        let mut stack = StateStack::new(RenderState::default(), 4);
        stack.push().unwrap();
        stack.current_mut().color = color::RED;
        stack.set_position(&Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(stack.depth(), 1);

        stack.pop().unwrap();
        assert_eq!(stack.current().color, color::WHITE);
        assert_eq!(stack.current().pose, Mat4::identity());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_pop_underflow() {
        let mut stack = StateStack::new(RenderState::default(), 4);
        assert_eq!(stack.pop(), Err(RenderDebugError::StateStackUnderflow));
    }

    #[test]
    fn test_push_overflow() {
        let mut stack = StateStack::new(RenderState::default(), 2);
        stack.push().unwrap();
        stack.push().unwrap();
        assert_eq!(
            stack.push(),
            Err(RenderDebugError::StateStackOverflow { max_depth: 2 })
        );
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_position_keeps_orientation() {
        let mut stack = StateStack::new(RenderState::default(), 4);
        let q = UnitQuat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        stack.set_orientation(&q);
        stack.set_position(&Vec3::new(5.0, 0.0, 0.0));

        let pose = stack.current().pose;
        assert!((math::mat4_translation(&pose) - Vec3::new(5.0, 0.0, 0.0)).norm() < 1e-6);
        assert!((pose.transform_vector(&Vec3::x()) - q * Vec3::x()).norm() < 1e-6);
    }

    #[test]
    fn test_orientation_keeps_position() {
        let mut stack = StateStack::new(RenderState::default(), 4);
        stack.set_position(&Vec3::new(1.0, 2.0, 3.0));
        stack.set_orientation(&UnitQuat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2));
        stack.set_orientation(&UnitQuat::identity());

        let pose = stack.current().pose;
        assert!((math::mat4_translation(&pose) - Vec3::new(1.0, 2.0, 3.0)).norm() < 1e-6);
        assert!((pose.transform_vector(&Vec3::x()) - Vec3::x()).norm() < 1e-6);
        assert!((pose.transform_vector(&Vec3::y()) - Vec3::y()).norm() < 1e-6);
    }

    #[test]
    fn test_view_projection_is_product() {
        let mut camera = CameraState::default();
        let view = math::look_at_rh(&Vec3::new(0.0, 1.0, 5.0), &Vec3::zeros(), &Vec3::y());
        let proj = math::perspective_rh(FRAC_PI_2, 1.5, 0.1, 100.0);
        camera.set_view(view);
        camera.set_projection(proj);
        assert_eq!(*camera.view_projection(), proj * view);

        let view2 = math::mat4_from_translation(Vec3::new(0.0, 0.0, -3.0));
        camera.set_view(view2);
        assert_eq!(*camera.view_projection(), proj * view2);
    }

    #[test]
    fn test_billboard_axes_require_view() {
        let mut camera = CameraState::default();
        assert!(camera.billboard_axes().is_none());
        camera.set_view(Mat4::identity());
        let (right, up) = camera.billboard_axes().unwrap();
        assert_eq!(right, Vec3::x());
        assert_eq!(up, Vec3::y());
    }
}
