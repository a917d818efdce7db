//! Parallax occlusion pass: shifts color and depth by the viewer offset,
//! writing both outputs in one render pass.

use depthfx_gpu_shared::{shaders, uniforms::ParallaxUniforms};

use crate::pipeline;
use crate::render_targets::RenderTarget;

pub struct ParallaxOcclusionPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    params: ParallaxUniforms,
}

impl ParallaxOcclusionPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout =
            pipeline::create_effect_bind_group_layout(device, "Parallax BGL", 2);
        let render_pipeline = pipeline::create_parallax_pipeline(device, &bind_group_layout);
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Parallax Params"),
            size: std::mem::size_of::<ParallaxUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sampler = pipeline::create_clamp_sampler(device, "Parallax Sampler");

        Self {
            pipeline: render_pipeline,
            bind_group_layout,
            params_buffer,
            sampler,
            params: ParallaxUniforms::default(),
        }
    }

    /// Viewer displacement in UV units.
    pub fn set_offset(&mut self, offset_x: f32, offset_y: f32) {
        self.params.offset = [offset_x, offset_y];
    }

    /// Depth of the zero-parallax plane.
    pub fn set_focal_point(&mut self, focal_point: f32) {
        self.params.focal_point = focal_point;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn encode(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        quad: &wgpu::Buffer,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        color_target: &RenderTarget,
        depth_target: &RenderTarget,
        clear_color: wgpu::Color,
    ) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&self.params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Parallax BG"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Parallax Occlusion Pass"),
            color_attachments: &[
                Some(wgpu::RenderPassColorAttachment {
                    view: &color_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                }),
                Some(wgpu::RenderPassColorAttachment {
                    view: &depth_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                }),
            ],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.set_vertex_buffer(0, quad.slice(..));
        pass.draw(0..4, 0..1);
    }
}
