/// Embedded WGSL shader source strings for the depthfx render chain.
/// One fragment shader per pass, plus the shared full-screen quad vertex
/// stage.

pub const FULLSCREEN_QUAD_VERT: &str = include_str!("../shaders/fullscreen_quad.wgsl");
pub const COC_FRAG: &str = include_str!("../shaders/coc.wgsl");
pub const BLUR_FRAG: &str = include_str!("../shaders/blur.wgsl");
pub const BOKEH_FRAG: &str = include_str!("../shaders/bokeh.wgsl");
pub const POST_FILTER_FRAG: &str = include_str!("../shaders/post_filter.wgsl");
pub const COMPOSE_FRAG: &str = include_str!("../shaders/compose.wgsl");
pub const PARALLAX_OCCLUSION_FRAG: &str = include_str!("../shaders/parallax_occlusion.wgsl");
