use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use render_debug_core::math::{self, Mat4, Vec3};

use crate::config::DebugDrawerConfig;
use crate::error::{RenderDebugError, Result};
use crate::render_debug::{DrawGroupId, DrawGroupIds};
use crate::state::{CameraState, StateStack};
use crate::vertex::{DebugSolidVertex, DebugUniforms, DebugVertex};

/// Accumulated vertex data for a single frame or draw group.
#[derive(Debug, Default)]
pub(crate) struct FrameData {
    pub lines: Vec<DebugVertex>,
    pub solids: Vec<DebugSolidVertex>,
}

impl FrameData {
    fn new() -> Self {
        Self::default()
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.solids.clear();
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.solids.is_empty()
    }

    fn append(&mut self, other: &FrameData) {
        self.lines.extend_from_slice(&other.lines);
        self.solids.extend_from_slice(&other.solids);
    }

    /// Append `other` with every position moved by `pose`.
    fn append_transformed(&mut self, other: &FrameData, pose: &Mat4) {
        self.lines.extend(other.lines.iter().map(|v| DebugVertex {
            position: transform_position(pose, v.position),
            color: v.color,
        }));
        self.solids.extend(other.solids.iter().map(|v| DebugSolidVertex {
            position: transform_position(pose, v.position),
            normal: transform_normal(pose, v.normal),
            color: v.color,
        }));
    }
}

fn transform_position(pose: &Mat4, p: [f32; 3]) -> [f32; 3] {
    math::vec3_to_array(&math::transform_point(pose, &math::vec3_from_array(p)))
}

fn transform_normal(pose: &Mat4, n: [f32; 3]) -> [f32; 3] {
    let n = pose.transform_vector(&math::vec3_from_array(n));
    math::vec3_to_array(&n.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros))
}

/// Vertex data handed to a renderer for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderData {
    /// Line list: every two vertices form one segment.
    pub lines: Vec<DebugVertex>,
    /// Triangle list: every three vertices form one triangle.
    pub solids: Vec<DebugSolidVertex>,
    pub uniforms: DebugUniforms,
}

impl RenderData {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.solids.is_empty()
    }
}

struct DrawGroup {
    pose: Mat4,
    visible: bool,
    data: FrameData,
}

/// Draw groups shared by every context of one drawer.
struct DrawGroups {
    ids: DrawGroupIds,
    groups: HashMap<DrawGroupId, DrawGroup>,
}

impl DrawGroups {
    fn new() -> Self {
        Self {
            ids: DrawGroupIds::new(),
            groups: HashMap::new(),
        }
    }

    fn get_mut(&mut self, id: DrawGroupId) -> Result<&mut DrawGroup> {
        match self.groups.get_mut(&id) {
            Some(group) => Ok(group),
            None => {
                log::warn!("Unknown draw group {}", id);
                Err(RenderDebugError::UnknownDrawGroup(id))
            }
        }
    }
}

/// Thread-safe debug drawing accumulator.
///
/// Uses double-buffered [`FrameData`]:
/// - `frames[current_tick % 2]` is being written to by [`DebugDrawerContext`]s
/// - `frames[(current_tick + 1) % 2]` holds previous tick data, ready for rendering
///
/// Call [`advance_tick`](Self::advance_tick) once per frame before creating any contexts.
/// The renderer reads the previous tick's data via [`take_render_data`](Self::take_render_data).
///
/// Draw groups are not tied to a tick: their vertices persist until
/// released and are emitted with every [`RenderData`] while visible.
pub struct DebugDrawer {
    current_tick: AtomicU64,
    frames: Mutex<[FrameData; 2]>,
    groups: Mutex<DrawGroups>,
    camera: Mutex<CameraState>,
    config: DebugDrawerConfig,
}

impl DebugDrawer {
    /// Create a new debug drawer starting at tick 0.
    pub fn new() -> Self {
        Self::with_config(DebugDrawerConfig::default())
    }

    pub fn with_config(config: DebugDrawerConfig) -> Self {
        Self {
            current_tick: AtomicU64::new(0),
            frames: Mutex::new([FrameData::new(), FrameData::new()]),
            groups: Mutex::new(DrawGroups::new()),
            camera: Mutex::new(CameraState::default()),
            config,
        }
    }

    pub fn config(&self) -> &DebugDrawerConfig {
        &self.config
    }

    /// Get the current tick.
    pub fn current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::Acquire)
    }

    /// Advance to the next tick.
    ///
    /// Increments the tick counter and clears the new write buffer.
    /// Call this once per frame at the start, before creating any contexts.
    pub fn advance_tick(&self) {
        let new_tick = self.current_tick.load(Ordering::Acquire) + 1;
        let write_index = (new_tick % 2) as usize;
        {
            let mut frames = self.frames.lock();
            frames[write_index].clear();
        }
        self.current_tick.store(new_tick, Ordering::Release);
    }

    /// Create a drawing context for the current tick.
    ///
    /// The context starts from the configured render state and the drawer's
    /// camera. It collects vertices locally and flushes them to the drawer
    /// on [`Drop`], so the mutex is only held briefly.
    pub fn context(&self) -> DebugDrawerContext<'_> {
        let tick = self.current_tick.load(Ordering::Acquire);
        DebugDrawerContext {
            drawer: self,
            tick,
            state: StateStack::new(self.config.initial_state, self.config.max_state_depth),
            camera: *self.camera.lock(),
            camera_dirty: false,
            frame: FrameData::new(),
            open_group: None,
            circle_segments: self.config.effective_circle_segments(),
        }
    }

    /// Take the previous tick's render data.
    ///
    /// Returns the accumulated vertices from tick N-1 (while tick N is being
    /// collected), followed by the vertices of every visible draw group
    /// moved to its current pose.
    pub fn take_render_data(&self) -> RenderData {
        let tick = self.current_tick.load(Ordering::Acquire);
        let render_index = ((tick + 1) % 2) as usize;
        let mut frame = {
            let mut frames = self.frames.lock();
            std::mem::take(&mut frames[render_index])
        };
        {
            let groups = self.groups.lock();
            for group in groups.groups.values().filter(|g| g.visible) {
                frame.append_transformed(&group.data, &group.pose);
            }
        }
        let view_proj = math::mat4_to_cols_array_2d(self.camera.lock().view_projection());
        RenderData {
            lines: frame.lines,
            solids: frame.solids,
            uniforms: DebugUniforms { view_proj },
        }
    }

    /// View and projection last written back by a context.
    pub fn camera(&self) -> CameraState {
        *self.camera.lock()
    }

    /// `projection * view` of the drawer's camera.
    pub fn view_projection(&self) -> Mat4 {
        *self.camera.lock().view_projection()
    }

    /// Number of live draw groups.
    pub fn draw_group_count(&self) -> usize {
        self.groups.lock().groups.len()
    }

    /// Append vertices from a finished context.
    fn flush(&self, tick: u64, frame: FrameData) {
        if frame.is_empty() {
            return;
        }
        let current = self.current_tick.load(Ordering::Acquire);
        if tick != current {
            log::warn!(
                "DebugDrawerContext flushed for tick {} but current is {}; discarding",
                tick,
                current
            );
            return;
        }
        let write_index = (tick % 2) as usize;
        let mut frames = self.frames.lock();
        frames[write_index].append(&frame);
    }

    fn store_camera(&self, camera: CameraState) {
        *self.camera.lock() = camera;
    }

    fn create_group(&self, pose: Mat4) -> DrawGroupId {
        let mut groups = self.groups.lock();
        let id = groups.ids.allocate();
        groups.groups.insert(
            id,
            DrawGroup {
                pose,
                visible: true,
                data: FrameData::new(),
            },
        );
        log::trace!("Created draw group {}", id);
        id
    }

    /// Store the content of a closed group.
    fn finish_group(&self, id: DrawGroupId, data: FrameData) {
        let mut groups = self.groups.lock();
        match groups.groups.get_mut(&id) {
            Some(group) => group.data.append(&data),
            None => log::warn!("Draw group {} was released while open; discarding", id),
        }
    }

    fn set_group_pose(&self, id: DrawGroupId, pose: Mat4) -> Result<()> {
        self.groups.lock().get_mut(id)?.pose = pose;
        Ok(())
    }

    fn set_group_visible(&self, id: DrawGroupId, visible: bool) -> Result<()> {
        self.groups.lock().get_mut(id)?.visible = visible;
        Ok(())
    }

    fn release_group(&self, id: DrawGroupId) -> Result<()> {
        let mut groups = self.groups.lock();
        groups.get_mut(id)?;
        groups.groups.remove(&id);
        log::trace!("Released draw group {}", id);
        Ok(())
    }
}

impl Default for DebugDrawer {
    fn default() -> Self {
        Self::new()
    }
}

/// A short-lived drawing context.
///
/// Implements [`RenderDebug`](crate::RenderDebug): primitives are tessellated
/// into a local batch. On [`Drop`], the batch is flushed to the parent
/// [`DebugDrawer`] under a brief lock, an open draw group is closed, and
/// camera changes are written back.
///
/// Obtain via [`DebugDrawer::context()`].
pub struct DebugDrawerContext<'a> {
    drawer: &'a DebugDrawer,
    tick: u64,
    pub(crate) state: StateStack,
    pub(crate) camera: CameraState,
    pub(crate) camera_dirty: bool,
    frame: FrameData,
    open_group: Option<(DrawGroupId, FrameData)>,
    pub(crate) circle_segments: u32,
}

impl DebugDrawerContext<'_> {
    /// Push two vertices forming a line segment, in world space.
    #[inline]
    pub fn push_line(&mut self, start: [f32; 3], end: [f32; 3], color: [f32; 4]) {
        self.push_gradient_line(start, end, color, color);
    }

    /// Push a line segment whose color changes along its length.
    #[inline]
    pub fn push_gradient_line(
        &mut self,
        start: [f32; 3],
        end: [f32; 3],
        start_color: [f32; 4],
        end_color: [f32; 4],
    ) {
        let lines = &mut self.target().lines;
        lines.push(DebugVertex {
            position: start,
            color: start_color,
        });
        lines.push(DebugVertex {
            position: end,
            color: end_color,
        });
    }

    /// Push one shaded vertex. Three consecutive pushes form a triangle.
    #[inline]
    pub fn push_solid_vertex(&mut self, position: [f32; 3], normal: [f32; 3], color: [f32; 4]) {
        self.target().solids.push(DebugSolidVertex {
            position,
            normal,
            color,
        });
    }

    /// Batch that primitives currently go into.
    fn target(&mut self) -> &mut FrameData {
        match &mut self.open_group {
            Some((_, data)) => data,
            None => &mut self.frame,
        }
    }

    pub(crate) fn begin_group(&mut self, pose: Mat4) -> DrawGroupId {
        if let Some(open) = self.open_group.as_ref().map(|(id, _)| *id) {
            log::warn!("Draw group {} still open; closing it", open);
            self.end_group();
        }
        let id = self.drawer.create_group(pose);
        self.open_group = Some((id, FrameData::new()));
        id
    }

    pub(crate) fn end_group(&mut self) {
        if let Some((id, data)) = self.open_group.take() {
            self.drawer.finish_group(id, data);
        }
    }

    pub(crate) fn set_group_pose(&mut self, id: DrawGroupId, pose: Mat4) -> Result<()> {
        self.drawer.set_group_pose(id, pose)
    }

    pub(crate) fn set_group_visible(&mut self, id: DrawGroupId, visible: bool) -> Result<()> {
        self.drawer.set_group_visible(id, visible)
    }

    pub(crate) fn release_group(&mut self, id: DrawGroupId) -> Result<()> {
        if matches!(&self.open_group, Some((open, _)) if *open == id) {
            self.open_group = None;
        }
        self.drawer.release_group(id)
    }
}

impl Drop for DebugDrawerContext<'_> {
    fn drop(&mut self) {
        self.end_group();
        if self.camera_dirty {
            self.drawer.store_camera(self.camera);
        }
        let frame = std::mem::take(&mut self.frame);
        self.drawer.flush(self.tick, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_debug::RenderDebug;
    use crate::typed::RenderDebugTyped;

    #[test]
    fn test_new_drawer() {
        let drawer = DebugDrawer::new();
        assert_eq!(drawer.current_tick(), 0);
        assert_eq!(drawer.draw_group_count(), 0);
    }

    #[test]
    fn test_advance_tick() {
        let drawer = DebugDrawer::new();
        drawer.advance_tick();
        assert_eq!(drawer.current_tick(), 1);
        drawer.advance_tick();
        assert_eq!(drawer.current_tick(), 2);
    }

    #[test]
    fn test_context_flush() {
        let drawer = DebugDrawer::new();
        drawer.advance_tick(); // tick = 1

        {
            let mut ctx = drawer.context();
            ctx.debug_line([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        } // ctx dropped, data flushed to tick 1's buffer

        // Advance to tick 2 so tick 1's data becomes the render data
        drawer.advance_tick();

        let data = drawer.take_render_data();
        assert_eq!(data.lines.len(), 2); // one line = 2 vertices
        assert!(data.solids.is_empty());
    }

    #[test]
    fn test_empty_render_data() {
        let drawer = DebugDrawer::new();
        let data = drawer.take_render_data();
        assert!(data.is_empty());
    }

    #[test]
    fn test_stale_context_discarded() {
        let drawer = DebugDrawer::new();
        let mut ctx = drawer.context(); // tick = 0
        ctx.push_line([0.0; 3], [1.0; 3], [1.0; 4]);

        drawer.advance_tick(); // tick = 1
        drawer.advance_tick(); // tick = 2
        drop(ctx); // tries to flush to tick 0, but current is 2 -> discarded

        let data = drawer.take_render_data();
        assert!(data.is_empty());
    }

    #[test]
    fn test_multiple_contexts() {
        let drawer = DebugDrawer::new();
        drawer.advance_tick(); // tick = 1

        {
            let mut ctx1 = drawer.context();
            ctx1.debug_line([0.0; 3], [1.0; 3]);

            let mut ctx2 = drawer.context();
            ctx2.debug_line([2.0; 3], [3.0; 3]);
        }

        drawer.advance_tick(); // tick = 2
        let data = drawer.take_render_data();
        assert_eq!(data.lines.len(), 4); // 2 lines = 4 vertices
    }

    #[test]
    fn test_contexts_on_many_threads() {
        let drawer = DebugDrawer::new();
        drawer.advance_tick();
        std::thread::scope(|s| {
            for i in 0..4 {
                let drawer = &drawer;
                s.spawn(move || {
                    let mut ctx = drawer.context();
                    ctx.debug_line([i as f32; 3], [0.0; 3]);
                });
            }
        });
        drawer.advance_tick();
        assert_eq!(drawer.take_render_data().lines.len(), 8);
    }

    #[test]
    fn test_camera_written_back() {
        let drawer = DebugDrawer::new();
        let view = math::look_at_rh(&Vec3::new(0.0, 0.0, 5.0), &Vec3::zeros(), &Vec3::y());
        let proj = math::perspective_rh(1.0, 1.0, 0.1, 10.0);
        {
            let mut ctx = drawer.context();
            ctx.set_view_transform(&view);
            ctx.set_projection_transform(&proj);
        }
        assert_eq!(drawer.view_projection(), proj * view);
        assert!(drawer.camera().has_view());

        // New contexts start from the stored camera.
        let ctx = drawer.context();
        assert_eq!(ctx.view_transform(), view);
        drop(ctx);

        let data = drawer.take_render_data();
        assert_eq!(data.uniforms.view_proj, math::mat4_to_cols_array_2d(&(proj * view)));
    }

    #[test]
    fn test_draw_group_persists_across_ticks() {
        let drawer = DebugDrawer::new();
        drawer.advance_tick();
        let id = {
            let mut ctx = drawer.context();
            let id = ctx.begin_draw_group_at(&Mat4::identity());
            ctx.debug_line([0.0; 3], [1.0, 0.0, 0.0]);
            ctx.end_draw_group();
            // Drawn outside the group: only for this tick.
            ctx.debug_line([0.0; 3], [0.0, 1.0, 0.0]);
            id
        };
        drawer.advance_tick();
        assert_eq!(drawer.take_render_data().lines.len(), 4);

        drawer.advance_tick();
        let data = drawer.take_render_data();
        assert_eq!(data.lines.len(), 2);

        {
            let mut ctx = drawer.context();
            let pose = math::mat4_from_translation(Vec3::new(0.0, 0.0, 3.0));
            ctx.set_draw_group_transform(id, &pose).unwrap();
        }
        let data = drawer.take_render_data();
        assert_eq!(data.lines[0].position, [0.0, 0.0, 3.0]);
        assert_eq!(data.lines[1].position, [1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_draw_group_pose_does_not_affect_others() {
        let drawer = DebugDrawer::new();
        let mut ctx = drawer.context();
        let a = ctx.begin_draw_group_at(&Mat4::identity());
        ctx.debug_point([0.0; 3], 1.0);
        let b = ctx.begin_draw_group_at(&Mat4::identity()); // closes `a`
        ctx.debug_point([0.0; 3], 1.0);
        ctx.end_draw_group();
        assert_ne!(a, b);

        let moved = math::mat4_from_translation(Vec3::x());
        ctx.set_draw_group_pose(a, &math::mat4_to_cols_array_2d(&moved))
            .unwrap();
        drop(ctx);

        let data = drawer.take_render_data();
        assert_eq!(data.lines.len(), 12);
        let xs: Vec<f32> = data.lines.iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().any(|x| *x > 1.5)); // moved group reaches x = 2
        assert!(xs.iter().all(|x| *x >= -1.0)); // untouched group still at origin
    }

    #[test]
    fn test_hidden_and_released_groups() {
        let drawer = DebugDrawer::new();
        let mut ctx = drawer.context();
        let id = ctx.begin_draw_group_at(&Mat4::identity());
        ctx.debug_line([0.0; 3], [1.0; 3]);
        ctx.end_draw_group();

        ctx.set_draw_group_visible(id, false).unwrap();
        assert!(drawer.take_render_data().is_empty());

        ctx.release_draw_group(id).unwrap();
        assert_eq!(drawer.draw_group_count(), 0);
        assert_eq!(
            ctx.set_draw_group_visible(id, true),
            Err(RenderDebugError::UnknownDrawGroup(id))
        );
        assert_eq!(
            ctx.release_draw_group(id),
            Err(RenderDebugError::UnknownDrawGroup(id))
        );

        let next = ctx.begin_draw_group_at(&Mat4::identity());
        assert!(next > id);
    }

    #[test]
    fn test_open_group_closed_on_drop() {
        let drawer = DebugDrawer::new();
        {
            let mut ctx = drawer.context();
            ctx.begin_draw_group_at(&Mat4::identity());
            ctx.debug_line([0.0; 3], [1.0; 3]);
        }
        assert_eq!(drawer.draw_group_count(), 1);
        assert_eq!(drawer.take_render_data().lines.len(), 2);
    }
}
