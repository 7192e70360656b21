//! # render-debug Demos
//!
//! Demo scenes showcasing the render-debug facade.
//!
//! ## Available Demos
//!
//! - `debug_draw_demo` - Draws an animated scene for a number of ticks and
//!   logs the vertex counts handed to the renderer

use render_debug::{
    debug_text, AxesStyle, DebugAxesRenderMode, DrawGroupId, HighlightAxis, RenderDebug,
    RenderDebugTyped, RenderFlags, DEFAULT_ARC_ARROW_SIZE, DEFAULT_THICK_RAY_SIZE,
};
use render_debug_core::color;
use render_debug_core::math::{self, Bounds3, Isometry, Mat4, Plane, UnitQuat, Vec2, Vec3};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for [`draw_scene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Sphere subdivision level.
    pub subdivision: u32,
    /// Fill shapes instead of drawing wireframes.
    pub solid: bool,
    /// Draw text labels.
    pub text: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            subdivision: render_debug::DEFAULT_SPHERE_SUBDIVISION,
            solid: false,
            text: true,
        }
    }
}

/// Camera looking at the origin from a fixed orbit.
pub fn camera(aspect: f32) -> (Mat4, Mat4) {
    let view = math::look_at_rh(&Vec3::new(4.0, 3.0, 6.0), &Vec3::zeros(), &Vec3::y());
    let projection = math::perspective_rh(60f32.to_radians(), aspect, 0.1, 100.0);
    (view, projection)
}

/// Create a static draw group holding a reference grid on the XZ plane.
pub fn build_grid(rd: &mut dyn RenderDebug, half_count: i32) -> DrawGroupId {
    let id = rd.begin_draw_group_at(&Mat4::identity());
    rd.set_current_color(color::DARK_GRAY, color::DARK_GRAY);
    let extent = half_count as f32;
    for i in -half_count..=half_count {
        let offset = i as f32;
        rd.draw_line(&Vec3::new(offset, 0.0, -extent), &Vec3::new(offset, 0.0, extent));
        rd.draw_line(&Vec3::new(-extent, 0.0, offset), &Vec3::new(extent, 0.0, offset));
    }
    rd.end_draw_group();
    id
}

/// Draw one frame of the demo scene at animation time `time` (seconds).
pub fn draw_scene(rd: &mut dyn RenderDebug, time: f32, options: &SceneOptions) {
    if rd.push_render_state().is_err() {
        return;
    }
    if options.solid {
        rd.add_render_flags(RenderFlags::SOLID_WIRE_SHADED);
    }

    // Spinning frame with a sphere, a box and a triangle attached.
    let spin = UnitQuat::from_axis_angle(&Vec3::y_axis(), time);
    rd.set_pose_isometry(&Isometry::from_parts(Vec3::new(0.0, 1.0, 0.0).into(), spin));
    rd.set_current_color(color::CYAN, color::YELLOW);
    rd.draw_sphere(&Vec3::new(1.5, 0.0, 0.0), 0.4, options.subdivision);
    rd.set_current_color(color::ORANGE, color::YELLOW);
    rd.draw_bound(&Bounds3::from_center_extents(
        &Vec3::new(-1.5, 0.0, 0.0),
        &Vec3::repeat(0.3),
    ));
    rd.draw_gradient_tri(
        &[
            Vec3::new(0.0, 0.5, 1.5),
            Vec3::new(-0.4, -0.3, 1.5),
            Vec3::new(0.4, -0.3, 1.5),
        ],
        [color::RED, color::GREEN, color::BLUE],
    );
    let frame = rd.pose_transform();
    rd.draw_axes(&frame, &AxesStyle::default().with_distance(0.5).with_labels(options.text));

    // Orientation only: position stays at (0, 1, 0).
    rd.set_pose_rotation(&UnitQuat::identity());
    rd.set_current_color(color::WHITE, color::YELLOW);
    let tip = Vec3::new(time.cos(), 0.0, time.sin()) * 1.2;
    rd.draw_ray(&Vec3::zeros(), &tip);
    rd.draw_thick_ray(&Vec3::zeros(), &Vec3::new(0.0, 1.0, 0.0), DEFAULT_THICK_RAY_SIZE, true);
    rd.draw_arc(
        &Vec3::zeros(),
        &Vec3::new(0.6, 0.0, 0.0),
        &(tip * 0.5),
        DEFAULT_ARC_ARROW_SIZE,
        true,
    );

    rd.set_pose_transform(&Mat4::identity());
    rd.set_current_color(color::MAGENTA, color::MAGENTA);
    rd.draw_plane(&Plane::new(Vec3::y(), 0.0), 0.5, 1.0);
    rd.draw_point(&Vec3::new(2.5, 0.0, 2.5), 0.1);
    rd.draw_point_scaled(&Vec3::new(-2.5, 0.0, 2.5), &Vec3::new(0.2, 0.05, 0.1));
    rd.draw_circle(&Vec3::new(0.0, 0.01, 0.0), 2.0, 48);
    rd.draw_quad(&Vec3::new(0.0, 2.5, 0.0), &Vec2::new(0.5, 0.5), time);
    rd.draw_axes(
        &math::mat4_from_translation(Vec3::new(-2.0, 0.0, -2.0)),
        &AxesStyle::default()
            .with_distance(0.4)
            .with_render_mode(DebugAxesRenderMode::Lines)
            .with_highlight(HighlightAxis::Y),
    );

    let (view, projection) = camera(16.0 / 9.0);
    rd.set_current_color(color::GRAY, color::GRAY);
    let near_view = math::look_at_rh(&Vec3::new(3.0, 1.0, -3.0), &Vec3::zeros(), &Vec3::y());
    let near_projection = math::perspective_rh(0.6, 1.5, 0.5, 2.0);
    rd.draw_frustum(&near_view, &near_projection);

    if options.text {
        rd.set_view_transform(&view);
        rd.set_projection_transform(&projection);
        rd.add_render_flags(RenderFlags::CAMERA_FACING | RenderFlags::CENTER_TEXT);
        rd.set_current_color(color::WHITE, color::WHITE);
        debug_text!(rd, &Vec3::new(0.0, 3.0, 0.0), "t = {:.2}", time);
    }

    if let Err(err) = rd.pop_render_state() {
        log::warn!("Scene left the render state unbalanced: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use render_debug::{CommandRecorder, DebugCommand, DebugDrawer, RenderData};
    use rstest::rstest;

    #[test]
    fn test_scene_restores_render_state() {
        let mut recorder = CommandRecorder::new();
        let before = recorder.render_state();
        draw_scene(&mut recorder, 0.5, &SceneOptions::default());
        assert_eq!(recorder.render_state(), before);
        assert!(recorder.commands().iter().any(|c| c.is_primitive()));
    }

    #[test]
    fn test_scene_text_is_formatted() {
        let mut recorder = CommandRecorder::new();
        draw_scene(&mut recorder, 1.0, &SceneOptions::default());
        assert!(recorder.commands().contains(&DebugCommand::Text {
            pos: [0.0, 3.0, 0.0],
            text: "t = 1.00".to_string(),
        }));
    }

    fn tessellate(options: &SceneOptions) -> RenderData {
        let drawer = DebugDrawer::new();
        {
            let mut ctx = drawer.context();
            draw_scene(&mut ctx, 0.0, options);
        }
        drawer.advance_tick();
        drawer.take_render_data()
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_scene_tessellates(#[case] solid: bool) {
        let data = tessellate(&SceneOptions {
            solid,
            ..SceneOptions::default()
        });
        assert!(!data.lines.is_empty());
        assert_eq!(data.lines.len() % 2, 0);
        assert_eq!(data.solids.len() % 3, 0);
    }

    #[test]
    fn test_solid_scene_fills_shapes() {
        let wire = tessellate(&SceneOptions::default());
        let solid = tessellate(&SceneOptions {
            solid: true,
            ..SceneOptions::default()
        });
        assert!(solid.solids.len() > wire.solids.len());
    }

    #[test]
    fn test_grid_group_persists() {
        let drawer = DebugDrawer::new();
        {
            let mut ctx = drawer.context();
            build_grid(&mut ctx, 2);
        }
        for _ in 0..3 {
            drawer.advance_tick();
            // 5 lines per axis, 2 axes, 2 vertices each
            assert_eq!(drawer.take_render_data().lines.len(), 20);
        }
    }
}
