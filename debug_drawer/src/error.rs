//! Debug drawing error types.

use thiserror::Error;

use crate::render_debug::DrawGroupId;

/// Errors reported by state and draw-group operations.
///
/// Draw primitives never fail; degenerate input is skipped and logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderDebugError {
    #[error("unknown draw group {0}")]
    UnknownDrawGroup(DrawGroupId),
    #[error("render state stack underflow: pop without matching push")]
    StateStackUnderflow,
    #[error("render state stack overflow: maximum depth is {max_depth}")]
    StateStackOverflow { max_depth: usize },
}

pub type Result<T> = std::result::Result<T, RenderDebugError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderDebugError::UnknownDrawGroup(DrawGroupId::from_raw(7));
        assert_eq!(err.to_string(), "unknown draw group 7");

        let err = RenderDebugError::StateStackOverflow { max_depth: 4 };
        assert_eq!(
            err.to_string(),
            "render state stack overflow: maximum depth is 4"
        );
    }
}
