//! Compose pass: lerp sharp color against the depth-of-field result by the
//! CoC value. Renders into the caller-provided output view.

use depthfx_gpu_shared::shaders;

use crate::pipeline;
use crate::render_targets::COLOR_FORMAT;

pub struct ComposePass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl ComposePass {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = pipeline::create_compose_bgl(device);
        let render_pipeline = pipeline::create_fullscreen_effect_pipeline(
            device,
            "Compose Pipeline",
            shaders::COMPOSE_FRAG,
            &bind_group_layout,
            COLOR_FORMAT,
        );
        let sampler = pipeline::create_clamp_sampler(device, "Compose Sampler");

        Self {
            pipeline: render_pipeline,
            bind_group_layout,
            sampler,
        }
    }

    pub fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        quad: &wgpu::Buffer,
        sharp_view: &wgpu::TextureView,
        dof_view: &wgpu::TextureView,
        coc_view: &wgpu::TextureView,
        output: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Compose BG"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(sharp_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(dof_view),
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
            label: Some("Compose Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output,
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
