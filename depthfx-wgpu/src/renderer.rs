//! Frame orchestration.
//!
//! [`ParallaxRenderer`] exclusively owns every pass and every intermediate
//! texture, encodes the fixed six-stage sequence into one command buffer per
//! frame, and reallocates targets across output-size changes.
//!
//! Concurrency: setters take `&mut self` on the control path and `render`
//! takes `&mut self` on the render path, so a parameter write overlapping an
//! encode cannot be expressed in safe Rust. Pending parameter values are
//! uploaded at the start of each pass's encode, never mid-frame.

use glam::Vec2;

use crate::error::RenderError;
use crate::passes::{
    BlurAxis, BlurPass, BokehPass, CircleOfConfusionPass, ComposePass, ParallaxOcclusionPass,
    PostFilterPass,
};
use crate::render_targets::{self, FrameTargets};

/// The source image pair feeding a frame: color plus per-pixel depth.
pub struct SourceImage<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

/// Control-path parameter snapshot. Held by the renderer so a device rebuild
/// can re-apply the current values to freshly created passes.
#[derive(Clone, Copy, Debug)]
pub struct PipelineParams {
    pub focus_distance: f32,
    pub focus_range: f32,
    pub bokeh_radius: f32,
    pub blur_intensity: f32,
    /// Drives the blur passes and the parallax pass alike; use the per-pass
    /// setters on the passes for independent tuning.
    pub focal_point: f32,
    pub viewer_offset: Vec2,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            focus_distance: 0.5,
            focus_range: 0.5,
            bokeh_radius: 8.0,
            blur_intensity: 5.0,
            focal_point: 0.5,
            viewer_offset: Vec2::ZERO,
        }
    }
}

pub struct ParallaxRenderer {
    params: PipelineParams,
    targets: FrameTargets,
    quad_vbo: wgpu::Buffer,
    parallax: ParallaxOcclusionPass,
    coc: CircleOfConfusionPass,
    blur_vertical: BlurPass,
    blur_horizontal: BlurPass,
    bokeh: BokehPass,
    post_filter: PostFilterPass,
    compose: ComposePass,
    clear_color: wgpu::Color,
}

impl ParallaxRenderer {
    /// Build all passes and intermediate targets for the given output size.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, RenderError> {
        let targets = FrameTargets::create(device, width, height)?;
        let quad_vbo = render_targets::create_fullscreen_quad_vbo(device);

        let mut renderer = Self {
            params: PipelineParams::default(),
            targets,
            quad_vbo,
            parallax: ParallaxOcclusionPass::new(device),
            coc: CircleOfConfusionPass::new(device),
            blur_vertical: BlurPass::new(device, BlurAxis::Vertical),
            blur_horizontal: BlurPass::new(device, BlurAxis::Horizontal),
            bokeh: BokehPass::new(device),
            post_filter: PostFilterPass::new(device),
            compose: ComposePass::new(device),
            clear_color: wgpu::Color::BLACK,
        };
        renderer.apply_params();

        log::info!("parallax pipeline created ({width}x{height})");
        Ok(renderer)
    }

    fn apply_params(&mut self) {
        let p = self.params;
        self.coc.set_focus(p.focus_distance, p.focus_range);
        self.coc.set_bokeh_radius(p.bokeh_radius);
        self.bokeh.set_bokeh_radius(p.bokeh_radius);
        self.blur_vertical.set_intensity(p.blur_intensity);
        self.blur_horizontal.set_intensity(p.blur_intensity);
        self.blur_vertical.set_focal_point(p.focal_point);
        self.blur_horizontal.set_focal_point(p.focal_point);
        self.parallax.set_focal_point(p.focal_point);
        self.parallax.set_offset(p.viewer_offset.x, p.viewer_offset.y);
    }

    pub fn params(&self) -> PipelineParams {
        self.params
    }

    /// Focus plane for the depth-of-field effect. `range` is clamped to a
    /// positive minimum by the CoC pass.
    pub fn set_focus(&mut self, distance: f32, range: f32) {
        self.params.focus_distance = distance;
        self.params.focus_range = range;
        self.coc.set_focus(distance, range);
    }

    pub fn set_bokeh_radius(&mut self, radius: f32) {
        self.params.bokeh_radius = radius;
        self.coc.set_bokeh_radius(radius);
        self.bokeh.set_bokeh_radius(radius);
    }

    pub fn set_blur_intensity(&mut self, intensity: f32) {
        self.params.blur_intensity = intensity;
        self.blur_vertical.set_intensity(intensity);
        self.blur_horizontal.set_intensity(intensity);
    }

    /// Reference depth plane shared by the blur and parallax passes.
    pub fn set_focal_point(&mut self, focal_point: f32) {
        self.params.focal_point = focal_point;
        self.blur_vertical.set_focal_point(focal_point);
        self.blur_horizontal.set_focal_point(focal_point);
        self.parallax.set_focal_point(focal_point);
    }

    /// Viewer displacement in UV units.
    pub fn set_viewer_offset(&mut self, offset: Vec2) {
        self.params.viewer_offset = offset;
        self.parallax.set_offset(offset.x, offset.y);
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    pub fn output_size(&self) -> (u32, u32) {
        (self.targets.width, self.targets.height)
    }

    /// Reallocate every intermediate target at the new output size. Must run
    /// before the next `render` whenever the output size changes.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> Result<(), RenderError> {
        if width == self.targets.width && height == self.targets.height {
            return Ok(());
        }
        self.targets = FrameTargets::create(device, width, height)?;
        log::info!("parallax pipeline resized to {width}x{height}");
        Ok(())
    }

    /// Device-loss recovery: recreate every pass and target against the given
    /// (new) device, keeping the current parameter values.
    pub fn rebuild(&mut self, device: &wgpu::Device) -> Result<(), RenderError> {
        let mut next = Self::new(device, self.targets.width, self.targets.height)?;
        next.params = self.params;
        next.clear_color = self.clear_color;
        next.apply_params();
        *self = next;
        log::info!("parallax pipeline rebuilt after device change");
        Ok(())
    }

    /// Encode and submit one frame:
    /// parallax → CoC → blur(V) → blur(H) → bokeh → post filter → compose.
    ///
    /// `output_size` must match the current intermediate allocations; a
    /// mismatch (or degenerate size) drops the frame with
    /// [`RenderError::ResourceAllocation`] and submits nothing.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        source: &SourceImage<'_>,
        output: &wgpu::TextureView,
        output_size: (u32, u32),
    ) -> Result<(), RenderError> {
        let (width, height) = output_size;
        if width != self.targets.width || height != self.targets.height {
            log::debug!(
                "dropping frame: output {width}x{height} vs targets {}x{}",
                self.targets.width,
                self.targets.height
            );
            return Err(RenderError::ResourceAllocation {
                width,
                height,
                reason: format!(
                    "output size does not match allocated targets ({}x{}); call resize first",
                    self.targets.width, self.targets.height
                ),
            });
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("depthfx Frame Encoder"),
        });
        let clear = self.clear_color;
        let t = &self.targets;

        self.parallax.encode(
            device,
            queue,
            &mut encoder,
            &self.quad_vbo,
            source.color,
            source.depth,
            &t.parallax_color,
            &t.parallax_depth,
            clear,
        );
        self.coc.encode(
            device,
            queue,
            &mut encoder,
            &self.quad_vbo,
            &t.parallax_depth.view,
            &t.coc,
            clear,
        );
        self.blur_vertical.encode(
            device,
            queue,
            &mut encoder,
            &self.quad_vbo,
            &t.parallax_color.view,
            &t.parallax_depth.view,
            &t.blur_ping,
            clear,
        );
        self.blur_horizontal.encode(
            device,
            queue,
            &mut encoder,
            &self.quad_vbo,
            &t.blur_ping.view,
            &t.parallax_depth.view,
            &t.blurred,
            clear,
        );
        self.bokeh.encode(
            device,
            queue,
            &mut encoder,
            &self.quad_vbo,
            &t.blurred.view,
            &t.coc.view,
            &t.bokeh,
            clear,
        );
        self.post_filter.encode(
            device,
            &mut encoder,
            &self.quad_vbo,
            &t.bokeh.view,
            &t.depth_of_field,
            clear,
        );
        self.compose.encode(
            device,
            &mut encoder,
            &self.quad_vbo,
            &t.parallax_color.view,
            &t.depth_of_field.view,
            &t.coc.view,
            output,
            clear,
        );

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
