//! Debug drawing with typed math arguments.
//!
//! Provides an untyped, array-based debug drawing interface and a typed
//! facade over it, plus two implementations: a thread-safe tessellating
//! accumulator with one-frame latency and a command recorder.
//!
//! # Architecture
//!
//! - [`RenderDebug`] - Untyped interface (`[f32; 3]` points, packed `0xAARRGGBB` colors)
//! - [`RenderDebugTyped`] - Typed facade, implemented for every [`RenderDebug`]
//! - [`DebugDrawer`] - Thread-safe accumulator (store as a shared resource)
//! - [`DebugDrawerContext`] - Short-lived drawing context (created per-system)
//! - [`CommandRecorder`] - Records calls as [`DebugCommand`]s for inspection or replay
//!
//! # Usage
//!
//! ```ignore
//! // Setup (once)
//! let drawer = Arc::new(DebugDrawer::new());
//!
//! // Each frame:
//! drawer.advance_tick();
//!
//! // In any system (can run in parallel):
//! let mut ctx = drawer.context();
//! ctx.set_pose_translation(&Vec3::new(0.0, 1.0, 0.0));
//! ctx.draw_line(&Vec3::zeros(), &Vec3::new(1.0, 1.0, 1.0));
//! ctx.draw_bound(&Bounds3::new(Vec3::repeat(-1.0), Vec3::repeat(1.0)));
//! debug_text!(&mut ctx, &Vec3::zeros(), "tick {}", tick);
//! drop(ctx); // or let it go out of scope
//!
//! // At render time:
//! let render_data = drawer.take_render_data();
//! upload(&render_data.lines, &render_data.solids, render_data.uniforms);
//! ```

mod command;
mod config;
mod draw_api;
mod drawer;
mod error;
mod font;
mod render_debug;
mod state;
mod typed;
mod vertex;

pub use command::{CommandRecorder, DebugCommand};
pub use config::{
    DebugDrawerConfig, DEFAULT_CIRCLE_SEGMENTS, DEFAULT_MAX_STATE_DEPTH, MAX_CIRCLE_SEGMENTS,
    MIN_CIRCLE_SEGMENTS,
};
pub use drawer::{DebugDrawer, DebugDrawerContext, RenderData};
pub use error::{RenderDebugError, Result};
pub use render_debug::{
    AxesStyle, DebugAxesRenderMode, DrawGroupId, HighlightAxis, RenderDebug,
    DEFAULT_ARC_ARROW_SIZE, DEFAULT_ARC_THICKNESS, DEFAULT_SPHERE_SUBDIVISION,
    DEFAULT_THICK_RAY_SIZE,
};
pub use state::{CameraState, RenderFlags, RenderState, StateStack};
pub use typed::RenderDebugTyped;
pub use vertex::{DebugSolidVertex, DebugUniforms, DebugVertex};
