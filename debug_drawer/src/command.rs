//! Recording of untyped debug draw calls.
//!
//! [`CommandRecorder`] implements [`RenderDebug`] by storing every call as a
//! [`DebugCommand`]. A recorded stream can be inspected, shipped elsewhere,
//! or replayed into any other [`RenderDebug`] implementation.

use std::collections::HashMap;

use render_debug_core::color::PackedColor;
use render_debug_core::math::{self, Mat4, RawMat4};

use crate::config::DebugDrawerConfig;
use crate::error::{RenderDebugError, Result};
use crate::render_debug::{AxesStyle, DrawGroupId, DrawGroupIds, RenderDebug};
use crate::state::{CameraState, RenderFlags, RenderState, StateStack};

/// One recorded call on [`RenderDebug`].
///
/// Camera matrices are local to each implementation and never appear here.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugCommand {
    Polygon {
        points: Vec<[f32; 3]>,
    },
    Line {
        p1: [f32; 3],
        p2: [f32; 3],
    },
    GradientLine {
        p1: [f32; 3],
        p2: [f32; 3],
        c1: PackedColor,
        c2: PackedColor,
    },
    Ray {
        p1: [f32; 3],
        p2: [f32; 3],
    },
    Cylinder {
        p1: [f32; 3],
        p2: [f32; 3],
        radius: f32,
    },
    ThickRay {
        p1: [f32; 3],
        p2: [f32; 3],
        ray_size: f32,
        arrow_tip: bool,
    },
    Plane {
        plane: [f32; 4],
        radius1: f32,
        radius2: f32,
    },
    Tri {
        points: [[f32; 3]; 3],
    },
    TriNormals {
        points: [[f32; 3]; 3],
        normals: [[f32; 3]; 3],
    },
    GradientTri {
        points: [[f32; 3]; 3],
        colors: [PackedColor; 3],
    },
    GradientTriNormals {
        points: [[f32; 3]; 3],
        normals: [[f32; 3]; 3],
        colors: [PackedColor; 3],
    },
    Bound {
        bounds: [[f32; 3]; 2],
    },
    Sphere {
        pos: [f32; 3],
        radius: f32,
        subdivision: u32,
    },
    Circle {
        center: [f32; 3],
        radius: f32,
        subdivision: u32,
    },
    Point {
        pos: [f32; 3],
        radius: f32,
    },
    PointScaled {
        pos: [f32; 3],
        scale: [f32; 3],
    },
    Quad {
        pos: [f32; 3],
        scale: [f32; 2],
        orientation: f32,
    },
    Axes {
        transform: RawMat4,
        style: AxesStyle,
    },
    Arc {
        center: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        arrow_size: f32,
        show_root: bool,
    },
    ThickArc {
        center: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        thickness: f32,
        show_root: bool,
    },
    Text {
        pos: [f32; 3],
        text: String,
    },
    Frustum {
        view: RawMat4,
        projection: RawMat4,
    },
    BeginDrawGroup {
        id: DrawGroupId,
        pose: RawMat4,
    },
    EndDrawGroup,
    SetDrawGroupPose {
        id: DrawGroupId,
        pose: RawMat4,
    },
    SetDrawGroupVisible {
        id: DrawGroupId,
        visible: bool,
    },
    ReleaseDrawGroup {
        id: DrawGroupId,
    },
    SetPose {
        pose: RawMat4,
    },
    SetPosition {
        position: [f32; 3],
    },
    SetOrientation {
        rotation: [f32; 4],
    },
    PushRenderState,
    PopRenderState,
    SetColor {
        color: PackedColor,
        arrow_color: PackedColor,
    },
    SetArrowSize {
        size: f32,
    },
    SetTextScale {
        scale: f32,
    },
    SetRenderFlags {
        flags: RenderFlags,
    },
}

impl DebugCommand {
    /// Whether the command draws something (as opposed to changing state).
    pub fn is_primitive(&self) -> bool {
        !matches!(
            self,
            Self::BeginDrawGroup { .. }
                | Self::EndDrawGroup
                | Self::SetDrawGroupPose { .. }
                | Self::SetDrawGroupVisible { .. }
                | Self::ReleaseDrawGroup { .. }
                | Self::SetPose { .. }
                | Self::SetPosition { .. }
                | Self::SetOrientation { .. }
                | Self::PushRenderState
                | Self::PopRenderState
                | Self::SetColor { .. }
                | Self::SetArrowSize { .. }
                | Self::SetTextScale { .. }
                | Self::SetRenderFlags { .. }
        )
    }

    /// Issue this command on `target`, mapping group ids through `ids`.
    fn apply(
        &self,
        target: &mut dyn RenderDebug,
        ids: &mut HashMap<DrawGroupId, DrawGroupId>,
    ) -> Result<()> {
        fn map(ids: &HashMap<DrawGroupId, DrawGroupId>, id: &DrawGroupId) -> DrawGroupId {
            ids.get(id).copied().unwrap_or(*id)
        }
        match self {
            Self::Polygon { points } => target.debug_polygon(points),
            Self::Line { p1, p2 } => target.debug_line(*p1, *p2),
            Self::GradientLine { p1, p2, c1, c2 } => target.debug_gradient_line(*p1, *p2, *c1, *c2),
            Self::Ray { p1, p2 } => target.debug_ray(*p1, *p2),
            Self::Cylinder { p1, p2, radius } => target.debug_cylinder(*p1, *p2, *radius),
            Self::ThickRay {
                p1,
                p2,
                ray_size,
                arrow_tip,
            } => target.debug_thick_ray(*p1, *p2, *ray_size, *arrow_tip),
            Self::Plane {
                plane,
                radius1,
                radius2,
            } => target.debug_plane(*plane, *radius1, *radius2),
            Self::Tri { points } => target.debug_tri(points[0], points[1], points[2]),
            Self::TriNormals { points, normals } => target.debug_tri_normals(*points, *normals),
            Self::GradientTri { points, colors } => target.debug_gradient_tri(*points, *colors),
            Self::GradientTriNormals {
                points,
                normals,
                colors,
            } => target.debug_gradient_tri_normals(*points, *normals, *colors),
            Self::Bound { bounds } => target.debug_bound(*bounds),
            Self::Sphere {
                pos,
                radius,
                subdivision,
            } => target.debug_sphere(*pos, *radius, *subdivision),
            Self::Circle {
                center,
                radius,
                subdivision,
            } => target.debug_circle(*center, *radius, *subdivision),
            Self::Point { pos, radius } => target.debug_point(*pos, *radius),
            Self::PointScaled { pos, scale } => target.debug_point_scaled(*pos, *scale),
            Self::Quad {
                pos,
                scale,
                orientation,
            } => target.debug_quad(*pos, *scale, *orientation),
            Self::Axes { transform, style } => target.debug_axes(transform, style),
            Self::Arc {
                center,
                p1,
                p2,
                arrow_size,
                show_root,
            } => target.debug_arc(*center, *p1, *p2, *arrow_size, *show_root),
            Self::ThickArc {
                center,
                p1,
                p2,
                thickness,
                show_root,
            } => target.debug_thick_arc(*center, *p1, *p2, *thickness, *show_root),
            Self::Text { pos, text } => target.debug_text(*pos, text),
            Self::Frustum { view, projection } => target.debug_frustum(view, projection),
            Self::BeginDrawGroup { id, pose } => {
                let new_id = target.begin_draw_group(pose);
                ids.insert(*id, new_id);
            }
            Self::EndDrawGroup => target.end_draw_group(),
            Self::SetDrawGroupPose { id, pose } => target.set_draw_group_pose(map(ids, id), pose)?,
            Self::SetDrawGroupVisible { id, visible } => {
                target.set_draw_group_visible(map(ids, id), *visible)?
            }
            Self::ReleaseDrawGroup { id } => {
                target.release_draw_group(map(ids, id))?;
                ids.remove(id);
            }
            Self::SetPose { pose } => target.set_pose(pose),
            Self::SetPosition { position } => target.set_position(*position),
            Self::SetOrientation { rotation } => target.set_orientation(*rotation),
            Self::PushRenderState => target.push_render_state()?,
            Self::PopRenderState => target.pop_render_state()?,
            Self::SetColor { color, arrow_color } => target.set_current_color(*color, *arrow_color),
            Self::SetArrowSize { size } => target.set_current_arrow_size(*size),
            Self::SetTextScale { scale } => target.set_current_text_scale(*scale),
            Self::SetRenderFlags { flags } => target.set_render_flags(*flags),
        }
        Ok(())
    }
}

/// [`RenderDebug`] implementation that records calls instead of drawing.
///
/// Render state, pose and group bookkeeping are tracked locally so that
/// queries answer the same way a drawing implementation would. Only calls
/// that succeed are recorded.
#[derive(Debug)]
pub struct CommandRecorder {
    commands: Vec<DebugCommand>,
    state: StateStack,
    camera: CameraState,
    group_ids: DrawGroupIds,
    groups: HashMap<DrawGroupId, Mat4>,
    open_group: Option<DrawGroupId>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::with_config(&DebugDrawerConfig::default())
    }

    /// Create a recorder whose render state starts from `config`.
    pub fn with_config(config: &DebugDrawerConfig) -> Self {
        Self {
            commands: Vec::new(),
            state: StateStack::new(config.initial_state, config.max_state_depth),
            camera: CameraState::default(),
            group_ids: DrawGroupIds::new(),
            groups: HashMap::new(),
            open_group: None,
        }
    }

    pub fn commands(&self) -> &[DebugCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recorder state untouched.
    pub fn take_commands(&mut self) -> Vec<DebugCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Pose of a live draw group.
    pub fn draw_group_pose(&self, id: DrawGroupId) -> Option<Mat4> {
        self.groups.get(&id).copied()
    }

    /// The group primitives currently go into, if any.
    pub fn open_draw_group(&self) -> Option<DrawGroupId> {
        self.open_group
    }

    /// Re-issue every recorded command on `target`, in order.
    ///
    /// Group ids allocated by `target` replace the recorded ones. Ids whose
    /// `BeginDrawGroup` is not part of this recording are passed through
    /// unchanged. Stops at the first call `target` rejects.
    pub fn replay(&self, target: &mut dyn RenderDebug) -> Result<()> {
        let mut ids = HashMap::new();
        for command in &self.commands {
            command.apply(target, &mut ids)?;
        }
        log::trace!("Replayed {} debug draw commands", self.commands.len());
        Ok(())
    }

    fn record(&mut self, command: DebugCommand) {
        self.commands.push(command);
    }

    fn check_group(&self, id: DrawGroupId) -> Result<()> {
        if self.groups.contains_key(&id) {
            Ok(())
        } else {
            log::warn!("Unknown draw group {}", id);
            Err(RenderDebugError::UnknownDrawGroup(id))
        }
    }
}

impl Default for CommandRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderDebug for CommandRecorder {
    fn debug_polygon(&mut self, points: &[[f32; 3]]) {
        self.record(DebugCommand::Polygon {
            points: points.to_vec(),
        });
    }

    fn debug_line(&mut self, p1: [f32; 3], p2: [f32; 3]) {
        self.record(DebugCommand::Line { p1, p2 });
    }

    fn debug_gradient_line(
        &mut self,
        p1: [f32; 3],
        p2: [f32; 3],
        c1: PackedColor,
        c2: PackedColor,
    ) {
        self.record(DebugCommand::GradientLine { p1, p2, c1, c2 });
    }

    fn debug_ray(&mut self, p1: [f32; 3], p2: [f32; 3]) {
        self.record(DebugCommand::Ray { p1, p2 });
    }

    fn debug_cylinder(&mut self, p1: [f32; 3], p2: [f32; 3], radius: f32) {
        self.record(DebugCommand::Cylinder { p1, p2, radius });
    }

    fn debug_thick_ray(&mut self, p1: [f32; 3], p2: [f32; 3], ray_size: f32, arrow_tip: bool) {
        self.record(DebugCommand::ThickRay {
            p1,
            p2,
            ray_size,
            arrow_tip,
        });
    }

    fn debug_plane(&mut self, plane: [f32; 4], radius1: f32, radius2: f32) {
        self.record(DebugCommand::Plane {
            plane,
            radius1,
            radius2,
        });
    }

    fn debug_tri(&mut self, p1: [f32; 3], p2: [f32; 3], p3: [f32; 3]) {
        self.record(DebugCommand::Tri {
            points: [p1, p2, p3],
        });
    }

    fn debug_tri_normals(&mut self, points: [[f32; 3]; 3], normals: [[f32; 3]; 3]) {
        self.record(DebugCommand::TriNormals { points, normals });
    }

    fn debug_gradient_tri(&mut self, points: [[f32; 3]; 3], colors: [PackedColor; 3]) {
        self.record(DebugCommand::GradientTri { points, colors });
    }

    fn debug_gradient_tri_normals(
        &mut self,
        points: [[f32; 3]; 3],
        normals: [[f32; 3]; 3],
        colors: [PackedColor; 3],
    ) {
        self.record(DebugCommand::GradientTriNormals {
            points,
            normals,
            colors,
        });
    }

    fn debug_bound(&mut self, bounds: [[f32; 3]; 2]) {
        self.record(DebugCommand::Bound { bounds });
    }

    fn debug_sphere(&mut self, pos: [f32; 3], radius: f32, subdivision: u32) {
        self.record(DebugCommand::Sphere {
            pos,
            radius,
            subdivision,
        });
    }

    fn debug_circle(&mut self, center: [f32; 3], radius: f32, subdivision: u32) {
        self.record(DebugCommand::Circle {
            center,
            radius,
            subdivision,
        });
    }

    fn debug_point(&mut self, pos: [f32; 3], radius: f32) {
        self.record(DebugCommand::Point { pos, radius });
    }

    fn debug_point_scaled(&mut self, pos: [f32; 3], scale: [f32; 3]) {
        self.record(DebugCommand::PointScaled { pos, scale });
    }

    fn debug_quad(&mut self, pos: [f32; 3], scale: [f32; 2], orientation: f32) {
        self.record(DebugCommand::Quad {
            pos,
            scale,
            orientation,
        });
    }

    fn debug_axes(&mut self, transform: &RawMat4, style: &AxesStyle) {
        self.record(DebugCommand::Axes {
            transform: *transform,
            style: *style,
        });
    }

    fn debug_arc(
        &mut self,
        center: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        arrow_size: f32,
        show_root: bool,
    ) {
        self.record(DebugCommand::Arc {
            center,
            p1,
            p2,
            arrow_size,
            show_root,
        });
    }

    fn debug_thick_arc(
        &mut self,
        center: [f32; 3],
        p1: [f32; 3],
        p2: [f32; 3],
        thickness: f32,
        show_root: bool,
    ) {
        self.record(DebugCommand::ThickArc {
            center,
            p1,
            p2,
            thickness,
            show_root,
        });
    }

    fn debug_text(&mut self, pos: [f32; 3], text: &str) {
        self.record(DebugCommand::Text {
            pos,
            text: text.to_string(),
        });
    }

    fn debug_frustum(&mut self, view: &RawMat4, projection: &RawMat4) {
        self.record(DebugCommand::Frustum {
            view: *view,
            projection: *projection,
        });
    }

    fn set_view_matrix(&mut self, view: &RawMat4) {
        self.camera.set_view(math::mat4_from_cols_array_2d(view));
    }

    fn set_projection_matrix(&mut self, projection: &RawMat4) {
        self.camera
            .set_projection(math::mat4_from_cols_array_2d(projection));
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
        if let Some(open) = self.open_group {
            log::warn!("Draw group {} still open; closing it", open);
            self.end_draw_group();
        }
        let id = self.group_ids.allocate();
        self.groups.insert(id, math::mat4_from_cols_array_2d(pose));
        self.open_group = Some(id);
        self.record(DebugCommand::BeginDrawGroup { id, pose: *pose });
        id
    }

    fn end_draw_group(&mut self) {
        if self.open_group.take().is_some() {
            self.record(DebugCommand::EndDrawGroup);
        }
    }

    fn set_draw_group_pose(&mut self, id: DrawGroupId, pose: &RawMat4) -> Result<()> {
        self.check_group(id)?;
        self.groups.insert(id, math::mat4_from_cols_array_2d(pose));
        self.record(DebugCommand::SetDrawGroupPose { id, pose: *pose });
        Ok(())
    }

    fn set_draw_group_visible(&mut self, id: DrawGroupId, visible: bool) -> Result<()> {
        self.check_group(id)?;
        self.record(DebugCommand::SetDrawGroupVisible { id, visible });
        Ok(())
    }

    fn release_draw_group(&mut self, id: DrawGroupId) -> Result<()> {
        self.check_group(id)?;
        if self.open_group == Some(id) {
            self.end_draw_group();
        }
        self.groups.remove(&id);
        self.record(DebugCommand::ReleaseDrawGroup { id });
        Ok(())
    }

    fn set_pose(&mut self, pose: &RawMat4) {
        self.state.set_pose(math::mat4_from_cols_array_2d(pose));
        self.record(DebugCommand::SetPose { pose: *pose });
    }

    fn set_position(&mut self, position: [f32; 3]) {
        self.state.set_position(&math::vec3_from_array(position));
        self.record(DebugCommand::SetPosition { position });
    }

    fn set_orientation(&mut self, rotation: [f32; 4]) {
        self.state
            .set_orientation(&math::unit_quat_from_array(rotation));
        self.record(DebugCommand::SetOrientation { rotation });
    }

    fn pose(&self) -> RawMat4 {
        math::mat4_to_cols_array_2d(&self.state.current().pose)
    }

    fn push_render_state(&mut self) -> Result<()> {
        self.state.push()?;
        self.record(DebugCommand::PushRenderState);
        Ok(())
    }

    fn pop_render_state(&mut self) -> Result<()> {
        self.state.pop()?;
        self.record(DebugCommand::PopRenderState);
        Ok(())
    }

    fn set_current_color(&mut self, color: PackedColor, arrow_color: PackedColor) {
        let state = self.state.current_mut();
        state.color = color;
        state.arrow_color = arrow_color;
        self.record(DebugCommand::SetColor { color, arrow_color });
    }

    fn set_current_arrow_size(&mut self, size: f32) {
        self.state.current_mut().arrow_size = size;
        self.record(DebugCommand::SetArrowSize { size });
    }

    fn set_current_text_scale(&mut self, scale: f32) {
        self.state.current_mut().text_scale = scale;
        self.record(DebugCommand::SetTextScale { scale });
    }

    fn set_render_flags(&mut self, flags: RenderFlags) {
        self.state.current_mut().flags = flags;
        self.record(DebugCommand::SetRenderFlags { flags });
    }

    fn render_state(&self) -> RenderState {
        *self.state.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawer::DebugDrawer;
    use render_debug_core::color;

    const IDENTITY: RawMat4 = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    #[test]
    fn test_records_in_order() {
        let mut r = CommandRecorder::new();
        r.set_current_color(color::RED, color::BLUE);
        r.debug_line([0.0; 3], [1.0; 3]);
        r.debug_point([2.0; 3], 0.5);

        assert_eq!(r.commands().len(), 3);
        assert!(!r.commands()[0].is_primitive());
        assert!(r.commands()[1].is_primitive());
        assert_eq!(r.render_state().color, color::RED);
        assert_eq!(r.render_state().arrow_color, color::BLUE);
    }

    #[test]
    fn test_camera_is_not_recorded() {
        let mut r = CommandRecorder::new();
        let mut view = IDENTITY;
        view[3] = [0.0, 0.0, -5.0, 1.0];
        r.set_view_matrix(&view);
        r.set_projection_matrix(&IDENTITY);
        assert!(r.commands().is_empty());
        assert_eq!(r.view_matrix(), view);
        assert_eq!(r.view_projection_matrix(), view);
    }

    #[test]
    fn test_group_ids_and_unknown_group() {
        let mut r = CommandRecorder::new();
        let a = r.begin_draw_group(&IDENTITY);
        let b = r.begin_draw_group(&IDENTITY); // closes `a`
        r.end_draw_group();
        assert!(a < b);
        assert_eq!(
            r.commands(),
            &[
                DebugCommand::BeginDrawGroup {
                    id: a,
                    pose: IDENTITY
                },
                DebugCommand::EndDrawGroup,
                DebugCommand::BeginDrawGroup {
                    id: b,
                    pose: IDENTITY
                },
                DebugCommand::EndDrawGroup,
            ]
        );

        r.release_draw_group(a).unwrap();
        let len = r.commands().len();
        assert_eq!(
            r.set_draw_group_visible(a, false),
            Err(RenderDebugError::UnknownDrawGroup(a))
        );
        assert_eq!(
            r.set_draw_group_pose(DrawGroupId::from_raw(99), &IDENTITY),
            Err(RenderDebugError::UnknownDrawGroup(DrawGroupId::from_raw(99)))
        );
        assert_eq!(r.commands().len(), len);

        // Released ids are never handed out again.
        let c = r.begin_draw_group(&IDENTITY);
        assert!(c > b);
    }

    #[test]
    fn test_failed_pop_not_recorded() {
        let mut r = CommandRecorder::new();
        assert!(r.pop_render_state().is_err());
        assert!(r.commands().is_empty());

        r.push_render_state().unwrap();
        r.set_current_arrow_size(0.5);
        r.pop_render_state().unwrap();
        assert_eq!(r.render_state().arrow_size, 0.1);
        assert_eq!(r.commands().len(), 3);
    }

    #[test]
    fn test_take_commands_keeps_state() {
        let mut r = CommandRecorder::new();
        r.set_render_flags(RenderFlags::SOLID_SHADED);
        r.debug_sphere([0.0; 3], 1.0, 2);
        let taken = r.take_commands();
        assert_eq!(taken.len(), 2);
        assert!(r.commands().is_empty());
        assert_eq!(r.render_state().flags, RenderFlags::SOLID_SHADED);
    }

    #[test]
    fn test_replay_reproduces_stream() {
        let mut source = CommandRecorder::new();
        source.push_render_state().unwrap();
        source.set_current_color(color::GREEN, color::YELLOW);
        source.debug_ray([0.0; 3], [0.0, 1.0, 0.0]);
        let group = source.begin_draw_group(&IDENTITY);
        source.debug_text([0.0; 3], "hello");
        source.end_draw_group();
        source.set_draw_group_visible(group, false).unwrap();
        source.pop_render_state().unwrap();

        // Target has already allocated a group, so replayed ids shift.
        let mut target = CommandRecorder::new();
        let existing = target.begin_draw_group(&IDENTITY);
        target.end_draw_group();
        target.clear();

        source.replay(&mut target).unwrap();
        assert_eq!(target.commands().len(), source.commands().len());
        let replayed_id = match &target.commands()[3] {
            DebugCommand::BeginDrawGroup { id, .. } => *id,
            other => panic!("unexpected command {other:?}"),
        };
        assert_ne!(replayed_id, existing);
        assert_eq!(
            target.commands()[6],
            DebugCommand::SetDrawGroupVisible {
                id: replayed_id,
                visible: false
            }
        );
        assert_eq!(target.render_state(), source.render_state());
    }

    #[test]
    fn test_replay_into_drawer_keeps_group() {
        let mut source = CommandRecorder::new();
        let recorded = source.begin_draw_group(&IDENTITY);
        source.debug_line([0.0; 3], [1.0, 0.0, 0.0]);
        source.end_draw_group();
        let lifted = math::mat4_from_translation(math::Vec3::new(0.0, 5.0, 0.0));
        source
            .set_draw_group_pose(recorded, &math::mat4_to_cols_array_2d(&lifted))
            .unwrap();

        // The drawer already owns a group, so the recorded id must be remapped.
        let drawer = DebugDrawer::new();
        let existing = {
            let mut ctx = drawer.context();
            let id = ctx.begin_draw_group(&IDENTITY);
            ctx.end_draw_group();
            id
        };
        assert_eq!(existing, recorded);
        source.replay(&mut drawer.context()).unwrap();
        assert_eq!(drawer.draw_group_count(), 2);

        for _ in 0..3 {
            drawer.advance_tick();
            let data = drawer.take_render_data();
            assert_eq!(data.lines.len(), 2);
            assert_eq!(data.lines[0].position, [0.0, 5.0, 0.0]);
            assert_eq!(data.lines[1].position, [1.0, 5.0, 0.0]);
        }

        // Releasing the existing group leaves the replayed lines in place.
        drawer.context().release_draw_group(existing).unwrap();
        drawer.advance_tick();
        assert_eq!(drawer.take_render_data().lines.len(), 2);
        assert_eq!(drawer.draw_group_count(), 1);
    }

    #[test]
    fn test_replay_stops_on_rejected_call() {
        let mut source = CommandRecorder::new();
        source.push_render_state().unwrap();
        let mut target = CommandRecorder::with_config(
            &DebugDrawerConfig::default().with_max_state_depth(0),
        );
        assert_eq!(
            source.replay(&mut target),
            Err(RenderDebugError::StateStackOverflow { max_depth: 0 })
        );
    }
}
