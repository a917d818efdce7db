//! Post-filter pass: fixed smoothing kernel over the bokeh result. No
//! settable parameters, hence no uniform buffer.

use depthfx_gpu_shared::shaders;

use crate::pipeline;
use crate::render_targets::{RenderTarget, COLOR_FORMAT};

pub struct PostFilterPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl PostFilterPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = pipeline::create_post_filter_bgl(device);
        let render_pipeline = pipeline::create_fullscreen_effect_pipeline(
            device,
            "Post Filter Pipeline",
            shaders::POST_FILTER_FRAG,
            &bind_group_layout,
            COLOR_FORMAT,
        );
        let sampler = pipeline::create_clamp_sampler(device, "Post Filter Sampler");

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
        bokeh_view: &wgpu::TextureView,
        target: &RenderTarget,
        clear_color: wgpu::Color,
    ) {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Post Filter BG"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(bokeh_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Post Filter Pass"),
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
