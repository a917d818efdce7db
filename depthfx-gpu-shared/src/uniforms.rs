use bytemuck::{Pod, Zeroable};

/// Circle-of-confusion parameters — CoC pass, group 0, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CocUniforms {
    pub focus_distance: f32,
    /// Must stay positive; the backend clamps it before upload.
    pub focus_range: f32,
    pub bokeh_radius: f32,
    pub _pad: f32,
}

impl Default for CocUniforms {
    fn default() -> Self {
        Self {
            focus_distance: 0.5,
            focus_range: 0.5,
            bokeh_radius: 8.0,
            _pad: 0.0,
        }
    }
}

/// Separable blur parameters — blur pass, group 0, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BlurUniforms {
    pub blur_intensity: f32,
    /// Reference depth that stays sharp; blur strength grows with distance
    /// from it.
    pub focal_point: f32,
    /// 0 = horizontal, 1 = vertical. Fixed at pass construction.
    pub axis: u32,
    pub _pad: f32,
}

impl Default for BlurUniforms {
    fn default() -> Self {
        Self {
            blur_intensity: 5.0,
            focal_point: 0.0,
            axis: 0,
            _pad: 0.0,
        }
    }
}

/// Bokeh gather parameters — bokeh pass, group 0, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BokehUniforms {
    /// Upper bound on the gather radius in pixels.
    pub bokeh_radius: f32,
    pub _pad: [f32; 3],
}

impl Default for BokehUniforms {
    fn default() -> Self {
        Self {
            bokeh_radius: 8.0,
            _pad: [0.0; 3],
        }
    }
}

/// Parallax occlusion parameters — parallax pass, group 0, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParallaxUniforms {
    /// Viewer displacement in UV units.
    pub offset: [f32; 2],
    /// Depth of the zero-parallax plane.
    pub focal_point: f32,
    pub _pad: f32,
}

impl Default for ParallaxUniforms {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            focal_point: 0.5,
            _pad: 0.0,
        }
    }
}

/// Full-screen quad vertex: clip-space position + UV.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// The four vertices of the screen-covering triangle strip. UV origin is the
/// top left, matching texture addressing.
pub const FULLSCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, -1.0],
        uv: [0.0, 1.0],
    },
    QuadVertex {
        position: [1.0, -1.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        uv: [1.0, 0.0],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_structs_match_wgsl_stride() {
        // WGSL uniform structs are laid out in 16-byte blocks.
        assert_eq!(std::mem::size_of::<CocUniforms>(), 16);
        assert_eq!(std::mem::size_of::<BlurUniforms>(), 16);
        assert_eq!(std::mem::size_of::<BokehUniforms>(), 16);
        assert_eq!(std::mem::size_of::<ParallaxUniforms>(), 16);
    }

    #[test]
    fn quad_vertex_stride() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
    }

    #[test]
    fn quad_covers_clip_space() {
        let xs: Vec<f32> = FULLSCREEN_QUAD.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = FULLSCREEN_QUAD.iter().map(|v| v.position[1]).collect();
        assert!(xs.contains(&-1.0) && xs.contains(&1.0));
        assert!(ys.contains(&-1.0) && ys.contains(&1.0));
        for v in FULLSCREEN_QUAD {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn quad_uv_follows_clip_position() {
        for v in FULLSCREEN_QUAD {
            assert_eq!(v.uv[0], (v.position[0] + 1.0) * 0.5);
            assert_eq!(v.uv[1], 1.0 - (v.position[1] + 1.0) * 0.5);
        }
    }

    #[test]
    fn defaults_are_safe() {
        assert!(CocUniforms::default().focus_range > 0.0);
        assert!(BokehUniforms::default().bokeh_radius >= 0.0);
        assert_eq!(ParallaxUniforms::default().offset, [0.0, 0.0]);
    }
}
