/// A debug draw vertex: position + color.
///
/// Used for line-list rendering. Every pair of consecutive vertices
/// forms one line segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// A shaded debug vertex: position + normal + color.
///
/// Used for triangle-list rendering. Every three consecutive vertices
/// form one triangle.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugSolidVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

/// Uniform buffer data for a debug draw shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugUniforms {
    /// Column-major 4x4 view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_sizes() {
        assert_eq!(std::mem::size_of::<DebugVertex>(), 28);
        assert_eq!(std::mem::size_of::<DebugSolidVertex>(), 40);
        assert_eq!(std::mem::size_of::<DebugUniforms>(), 64);
    }

    #[test]
    fn test_cast_to_bytes() {
        let vertices = [DebugVertex {
            position: [1.0, 2.0, 3.0],
            color: [1.0; 4],
        }; 2];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 56);
    }
}
