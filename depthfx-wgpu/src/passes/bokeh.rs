//! Bokeh pass: disc gather over the blurred color, tap radius driven by the
//! CoC map.

use depthfx_gpu_shared::{shaders, uniforms::BokehUniforms};

use crate::pipeline;
use crate::render_targets::{RenderTarget, COLOR_FORMAT};

pub struct BokehPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    params: BokehUniforms,
}

impl BokehPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = pipeline::create_effect_bind_group_layout(device, "Bokeh BGL", 2);
        let render_pipeline = pipeline::create_fullscreen_effect_pipeline(
            device,
            "Bokeh Pipeline",
            shaders::BOKEH_FRAG,
            &bind_group_layout,
            COLOR_FORMAT,
        );
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Bokeh Params"),
            size: std::mem::size_of::<BokehUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sampler = pipeline::create_clamp_sampler(device, "Bokeh Sampler");

        Self {
            pipeline: render_pipeline,
            bind_group_layout,
            params_buffer,
            sampler,
            params: BokehUniforms::default(),
        }
    }

    pub fn set_bokeh_radius(&mut self, radius: f32) {
        self.params.bokeh_radius = radius.max(0.0);
    }

    pub fn encode(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        quad: &wgpu::Buffer,
        blurred_view: &wgpu::TextureView,
        coc_view: &wgpu::TextureView,
        target: &RenderTarget,
        clear_color: wgpu::Color,
    ) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&self.params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bokeh BG"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(blurred_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(coc_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Bokeh Pass"),
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
