//! Render target creation for the six-pass chain.
//! Every intermediate texture of a frame matches the output size; stale-sized
//! targets are reallocated through [`FrameTargets::create`] before the next
//! frame is encoded.

use depthfx_gpu_shared::uniforms::FULLSCREEN_QUAD;

use crate::error::RenderError;

/// Color format used throughout the pipeline.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Single-channel float format (depth maps, CoC).
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;

/// A texture usable as both a pass output and a sampled input of a later
/// pass.
pub struct RenderTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Create a render target with a specific format.
pub fn create_render_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    label: &str,
    format: wgpu::TextureFormat,
) -> RenderTarget {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    RenderTarget {
        texture,
        view,
        width,
        height,
    }
}

/// Check dimensions against the device limits before allocating.
pub fn validate_size(device: &wgpu::Device, width: u32, height: u32) -> Result<(), RenderError> {
    let max = device.limits().max_texture_dimension_2d;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(RenderError::ResourceAllocation {
            width,
            height,
            reason: format!("dimensions must be within 1..={max}"),
        });
    }
    Ok(())
}

/// Every intermediate texture of one frame, all sized to the output.
pub struct FrameTargets {
    /// Parallax-shifted color, the sharp input to the blur chain and to
    /// compose.
    pub parallax_color: RenderTarget,
    /// Parallax-shifted depth, input to CoC and to the blur chain.
    pub parallax_depth: RenderTarget,
    /// Per-pixel blur radius.
    pub coc: RenderTarget,
    /// Ping-pong between the two separable blur instances. Never bound as a
    /// pass's own input and output at once, and never the final output.
    pub blur_ping: RenderTarget,
    /// Fully blurred color after both axes.
    pub blurred: RenderTarget,
    /// Bokeh gather result.
    pub bokeh: RenderTarget,
    /// Cleaned depth-of-field color after the post filter.
    pub depth_of_field: RenderTarget,
    pub width: u32,
    pub height: u32,
}

impl FrameTargets {
    pub fn create(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, RenderError> {
        validate_size(device, width, height)?;

        Ok(Self {
            parallax_color: create_render_target(device, width, height, "Parallax Color", COLOR_FORMAT),
            parallax_depth: create_render_target(device, width, height, "Parallax Depth", DEPTH_FORMAT),
            coc: create_render_target(device, width, height, "CoC", DEPTH_FORMAT),
            blur_ping: create_render_target(device, width, height, "Blur Ping", COLOR_FORMAT),
            blurred: create_render_target(device, width, height, "Blurred", COLOR_FORMAT),
            bokeh: create_render_target(device, width, height, "Bokeh", COLOR_FORMAT),
            depth_of_field: create_render_target(device, width, height, "Depth of Field", COLOR_FORMAT),
            width,
            height,
        })
    }
}

/// Create the immutable full-screen quad vertex buffer shared by every pass.
pub fn create_fullscreen_quad_vbo(device: &wgpu::Device) -> wgpu::Buffer {
    use wgpu::util::DeviceExt;

    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Fullscreen Quad VBO"),
        contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
        usage: wgpu::BufferUsages::VERTEX,
    })
}
