//! Separable depth-aware blur pass. One type, parameterized by axis; the
//! orchestrator chains a vertical and a horizontal instance through a
//! ping-pong texture.

use depthfx_gpu_shared::{shaders, uniforms::BlurUniforms};

use crate::pipeline;
use crate::render_targets::{RenderTarget, COLOR_FORMAT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurAxis {
    Horizontal,
    Vertical,
}

impl BlurAxis {
    fn as_uniform(self) -> u32 {
        match self {
            BlurAxis::Horizontal => 0,
            BlurAxis::Vertical => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            BlurAxis::Horizontal => "Horizontal",
            BlurAxis::Vertical => "Vertical",
        }
    }
}

pub struct BlurPass {
    axis: BlurAxis,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    params: BlurUniforms,
}

impl BlurPass {
    /// The axis is baked in at construction and never changes afterwards.
    pub fn new(device: &wgpu::Device, axis: BlurAxis) -> Self {
        let bind_group_layout = pipeline::create_effect_bind_group_layout(
            device,
            &format!("{} Blur BGL", axis.label()),
            2,
        );
        let render_pipeline = pipeline::create_fullscreen_effect_pipeline(
            device,
            &format!("{} Blur Pipeline", axis.label()),
            shaders::BLUR_FRAG,
            &bind_group_layout,
            COLOR_FORMAT,
        );
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Blur Params", axis.label())),
            size: std::mem::size_of::<BlurUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sampler = pipeline::create_clamp_sampler(device, "Blur Sampler");

        Self {
            axis,
            pipeline: render_pipeline,
            bind_group_layout,
            params_buffer,
            sampler,
            params: BlurUniforms {
                axis: axis.as_uniform(),
                ..BlurUniforms::default()
            },
        }
    }

    pub fn axis(&self) -> BlurAxis {
        self.axis
    }

    /// Kernel radius scale. Zero makes the pass an exact identity.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.params.blur_intensity = intensity.max(0.0);
    }

    pub fn set_focal_point(&mut self, focal_point: f32) {
        self.params.focal_point = focal_point;
    }

    pub fn encode(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        quad: &wgpu::Buffer,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        target: &RenderTarget,
        clear_color: wgpu::Color,
    ) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&self.params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blur BG"),
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
            label: Some(match self.axis {
                BlurAxis::Horizontal => "Horizontal Blur Pass",
                BlurAxis::Vertical => "Vertical Blur Pass",
            }),
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
