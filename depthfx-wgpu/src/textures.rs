//! Source texture upload and result readback.
//!
//! Image decoding and presentation are external collaborators; this module is
//! the seam between them and the pipeline. Texels cross it as `f32` slices
//! and are converted to the pipeline's half-float formats in place.

use half::f16;

use crate::error::RenderError;
use crate::render_targets::{COLOR_FORMAT, DEPTH_FORMAT};

/// Create an Rgba16Float color texture from `width * height * 4` f32 texels.
pub fn create_color_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    texels: &[f32],
) -> Result<wgpu::Texture, RenderError> {
    create_source_texture(device, queue, width, height, texels, COLOR_FORMAT, 4, "Source Color")
}

/// Create an R16Float depth texture from `width * height` f32 texels.
pub fn create_depth_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    texels: &[f32],
) -> Result<wgpu::Texture, RenderError> {
    create_source_texture(device, queue, width, height, texels, DEPTH_FORMAT, 1, "Source Depth")
}

fn create_source_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    texels: &[f32],
    format: wgpu::TextureFormat,
    components: u32,
    label: &str,
) -> Result<wgpu::Texture, RenderError> {
    let expected = (width * height * components) as usize;
    if texels.len() != expected {
        return Err(RenderError::ResourceAllocation {
            width,
            height,
            reason: format!("expected {expected} texel values, got {}", texels.len()),
        });
    }

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let half_texels: Vec<f16> = texels.iter().map(|&v| f16::from_f32(v)).collect();
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        bytemuck::cast_slice(&half_texels),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(width * components * 2),
            rows_per_image: Some(height),
        },
        size,
    );

    Ok(texture)
}

/// Round a row byte count up to the buffer-copy alignment.
pub(crate) fn padded_bytes_per_row(unpadded: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Read a pipeline texture back to CPU memory as f32 texels, row-major.
///
/// Supports the two pipeline formats: Rgba16Float returns 4 values per pixel,
/// R16Float returns 1. Blocks until the copy completes.
pub fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
) -> Result<Vec<f32>, RenderError> {
    let width = texture.width();
    let height = texture.height();
    let components = match texture.format() {
        COLOR_FORMAT => 4u32,
        DEPTH_FORMAT => 1u32,
        other => {
            return Err(RenderError::ResourceAllocation {
                width,
                height,
                reason: format!("unsupported readback format {other:?}"),
            })
        }
    };

    let unpadded_bytes_per_row = width * components * 2;
    let padded = padded_bytes_per_row(unpadded_bytes_per_row);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size: (padded * height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = buffer.slice(..);
    let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    let _ = device.poll(wgpu::Maintain::Wait);
    pollster::block_on(receiver.receive())
        .ok_or_else(|| RenderError::DeviceUnavailable("readback channel closed".into()))?
        .map_err(|e| RenderError::DeviceUnavailable(format!("readback map failed: {e:?}")))?;

    let data = buffer_slice.get_mapped_range();
    let mut texels = Vec::with_capacity((width * height * components) as usize);
    for row in 0..height {
        let start = (row * padded) as usize;
        let end = start + unpadded_bytes_per_row as usize;
        let halves: &[f16] = bytemuck::cast_slice(&data[start..end]);
        texels.extend(halves.iter().map(|h| h.to_f32()));
    }
    drop(data);
    buffer.unmap();

    Ok(texels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_padding_rounds_up_to_alignment() {
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        assert_eq!(padded_bytes_per_row(1), align);
        assert_eq!(padded_bytes_per_row(align), align);
        assert_eq!(padded_bytes_per_row(align + 1), 2 * align);
        // 4x4 R16Float rows are 8 bytes
        assert_eq!(padded_bytes_per_row(8), align);
    }
}
