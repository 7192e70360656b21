//! Drawer configuration.

use crate::state::RenderState;

/// Default maximum number of saved render states per context.
pub const DEFAULT_MAX_STATE_DEPTH: usize = 32;

/// Default segment count for cylinders, arcs and plane rings.
pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 16;

/// Fewest segments any tessellated ring uses.
pub const MIN_CIRCLE_SEGMENTS: u32 = 3;

/// Most segments any tessellated ring or sphere circle uses.
pub const MAX_CIRCLE_SEGMENTS: u32 = 256;

/// Configuration for a [`DebugDrawer`](crate::DebugDrawer) and the contexts
/// and recorders created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugDrawerConfig {
    /// Render state every new context starts from.
    pub initial_state: RenderState,
    /// Maximum depth of the render-state stack.
    pub max_state_depth: usize,
    /// Segments used to tessellate cylinders, arcs and plane rings.
    pub circle_segments: u32,
}

impl DebugDrawerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_state(mut self, state: RenderState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_max_state_depth(mut self, depth: usize) -> Self {
        self.max_state_depth = depth;
        self
    }

    /// Set the circle segment count, clamped to
    /// [`MIN_CIRCLE_SEGMENTS`]..=[`MAX_CIRCLE_SEGMENTS`].
    pub fn with_circle_segments(mut self, segments: u32) -> Self {
        self.circle_segments = clamp_segments(segments);
        self
    }

    /// Segment count actually used for tessellation.
    ///
    /// `circle_segments` is public, so a value set directly is clamped here.
    pub fn effective_circle_segments(&self) -> u32 {
        clamp_segments(self.circle_segments)
    }
}

pub(crate) fn clamp_segments(segments: u32) -> u32 {
    segments.clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS)
}

impl Default for DebugDrawerConfig {
    fn default() -> Self {
        Self {
            initial_state: RenderState::default(),
            max_state_depth: DEFAULT_MAX_STATE_DEPTH,
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use render_debug_core::color;

    #[test]
    fn test_builder() {
        let config = DebugDrawerConfig::new()
            .with_initial_state(RenderState::default().with_color(color::RED))
            .with_max_state_depth(4)
            .with_circle_segments(1);
        assert_eq!(config.initial_state.color, color::RED);
        assert_eq!(config.max_state_depth, 4);
        assert_eq!(config.circle_segments, 3);
    }

    #[test]
    fn test_direct_segment_count_is_clamped() {
        let low = DebugDrawerConfig {
            circle_segments: 0,
            ..Default::default()
        };
        assert_eq!(low.effective_circle_segments(), MIN_CIRCLE_SEGMENTS);

        let high = DebugDrawerConfig {
            circle_segments: u32::MAX,
            ..Default::default()
        };
        assert_eq!(high.effective_circle_segments(), MAX_CIRCLE_SEGMENTS);
        assert_eq!(
            DebugDrawerConfig::new().with_circle_segments(1000).circle_segments,
            MAX_CIRCLE_SEGMENTS
        );
    }
}
