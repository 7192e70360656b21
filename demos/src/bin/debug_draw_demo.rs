//! Debug Draw Demo
//!
//! Runs the demo scene through a [`DebugDrawer`] for a number of ticks and
//! logs what the renderer would receive each frame.
//!
//! Run with: cargo run -p render-debug-demos --bin debug_draw_demo -- --ticks 5 --solid

use clap::Parser;
use render_debug::{DebugDrawer, DebugDrawerConfig, RenderDebugTyped};
use render_debug_core::math::{self, Vec3};
use render_debug_demos::{build_grid, camera, draw_scene, SceneOptions};

/// Seconds of animation per tick.
const TICK_SECONDS: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(
    name = "debug_draw_demo",
    about = "Tessellates a debug-draw scene and reports the vertex counts",
    version
)]
struct Args {
    /// Number of ticks to simulate.
    #[arg(long, default_value = "3")]
    ticks: u64,

    /// Sphere subdivision level.
    #[arg(long, default_value = "2")]
    subdivision: u32,

    /// Segments used for cylinders and thick rays.
    #[arg(long, default_value = "16")]
    circle_segments: u32,

    /// Draw filled shapes instead of wireframes.
    #[arg(long)]
    solid: bool,

    /// Hide text labels.
    #[arg(long)]
    no_text: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    render_debug_core::init();

    let args = Args::parse();
    log::info!("Debug draw demo v{}", render_debug_demos::VERSION);

    let drawer = DebugDrawer::with_config(
        DebugDrawerConfig::new().with_circle_segments(args.circle_segments),
    );
    let options = SceneOptions {
        subdivision: args.subdivision,
        solid: args.solid,
        text: !args.no_text,
    };

    let grid = {
        let mut ctx = drawer.context();
        let (view, projection) = camera(16.0 / 9.0);
        ctx.set_view_transform(&view);
        ctx.set_projection_transform(&projection);
        build_grid(&mut ctx, 5)
    };

    for tick in 0..args.ticks {
        drawer.advance_tick();
        let time = tick as f32 * TICK_SECONDS;
        {
            let mut ctx = drawer.context();
            let lift = math::mat4_from_translation(Vec3::new(0.0, (time * 2.0).sin() * 0.1, 0.0));
            if let Err(err) = ctx.set_draw_group_transform(grid, &lift) {
                log::error!("Failed to move grid: {}", err);
            }
            draw_scene(&mut ctx, time, &options);
        }

        let data = drawer.take_render_data();
        log::info!(
            "Tick {}: {} line vertices, {} solid vertices",
            drawer.current_tick(),
            data.lines.len(),
            data.solids.len()
        );
    }

    log::info!("Draw groups alive: {}", drawer.draw_group_count());
}
