//! Circle-of-confusion pass: depth map → per-pixel blur radius.

use depthfx_gpu_shared::{shaders, uniforms::CocUniforms};

use crate::pipeline;
use crate::render_targets::{RenderTarget, DEPTH_FORMAT};

/// Smallest accepted focus range. Anything lower would divide by roughly zero
/// in the shader and spray NaNs down the rest of the chain.
pub const MIN_FOCUS_RANGE: f32 = 1e-4;

pub struct CircleOfConfusionPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    params: CocUniforms,
}

impl CircleOfConfusionPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = pipeline::create_effect_bind_group_layout(device, "CoC BGL", 1);
        let render_pipeline = pipeline::create_fullscreen_effect_pipeline(
            device,
            "CoC Pipeline",
            shaders::COC_FRAG,
            &bind_group_layout,
            DEPTH_FORMAT,
        );
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("CoC Params"),
            size: std::mem::size_of::<CocUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sampler = pipeline::create_clamp_sampler(device, "CoC Sampler");

        Self {
            pipeline: render_pipeline,
            bind_group_layout,
            params_buffer,
            sampler,
            params: CocUniforms::default(),
        }
    }

    /// Update the focus plane. `range` is clamped to a positive minimum.
    pub fn set_focus(&mut self, distance: f32, range: f32) {
        self.params.focus_distance = distance;
        self.params.focus_range = range.max(MIN_FOCUS_RANGE);
    }

    pub fn set_bokeh_radius(&mut self, radius: f32) {
        self.params.bokeh_radius = radius.max(0.0);
    }

    /// Upload the pending parameters, then record the pass.
    pub fn encode(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        quad: &wgpu::Buffer,
        depth_view: &wgpu::TextureView,
        target: &RenderTarget,
        clear_color: wgpu::Color,
    ) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&self.params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("CoC BG"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("CoC Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.set_vertex_buffer(0, quad.slice(..));
        pass.draw(0..4, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// CPU reference of the shader formula, used by the GPU tests as well.
    fn coc_reference(depth: f32, params: &CocUniforms) -> f32 {
        let range = params.focus_range.max(MIN_FOCUS_RANGE);
        ((depth - params.focus_distance).abs() / range).clamp(0.0, 1.0) * params.bokeh_radius
    }

    #[test]
    fn coc_is_zero_at_focus_distance() {
        let params = CocUniforms::default();
        assert_eq!(coc_reference(params.focus_distance, &params), 0.0);
    }

    #[test]
    fn coc_is_monotone_in_depth_distance() {
        let params = CocUniforms {
            focus_distance: 0.5,
            focus_range: 0.25,
            bokeh_radius: 8.0,
            _pad: 0.0,
        };
        let mut last = 0.0;
        for i in 0..=20 {
            let delta = i as f32 / 20.0;
            let coc = coc_reference(0.5 + delta, &params);
            assert!(coc >= last, "coc must not decrease as |d - fd| grows");
            last = coc;
        }
    }

    #[test]
    fn coc_saturates_outside_focus_range() {
        let params = CocUniforms {
            focus_distance: 0.5,
            focus_range: 0.1,
            bokeh_radius: 4.0,
            _pad: 0.0,
        };
        assert_eq!(coc_reference(1.0, &params), 4.0);
        assert_eq!(coc_reference(0.0, &params), 4.0);
    }
}
