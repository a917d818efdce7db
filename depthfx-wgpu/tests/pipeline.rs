//! GPU integration tests for the six-pass chain.
//!
//! Every test acquires a headless device and skips with a note when the host
//! has no usable adapter, so the suite stays green on GPU-less CI runners.

use glam::Vec2;

use depthfx_wgpu::passes::{BlurAxis, BlurPass, CircleOfConfusionPass, ComposePass, ParallaxOcclusionPass};
use depthfx_wgpu::render_targets::{self, COLOR_FORMAT, DEPTH_FORMAT};
use depthfx_wgpu::{textures, GpuContext, ParallaxRenderer, RenderError, SourceImage};

/// Tolerance for values that ride through Rgba16Float/R16Float targets.
const TOL: f32 = 2e-2;

fn gpu() -> Option<GpuContext> {
    let _ = env_logger::builder().is_test(true).try_init();
    match GpuContext::new() {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("skipping GPU test: {e}");
            None
        }
    }
}

fn encode_and_submit(ctx: &GpuContext, f: impl FnOnce(&mut wgpu::CommandEncoder)) {
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Test Encoder"),
        });
    f(&mut encoder);
    ctx.queue.submit(std::iter::once(encoder.finish()));
}

fn view(texture: &wgpu::Texture) -> wgpu::TextureView {
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Deterministic non-flat color pattern, 4 channels per pixel, alpha 1.
fn color_pattern(width: u32, height: u32) -> Vec<f32> {
    let mut texels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            texels.push((x as f32 + 0.5) / width as f32);
            texels.push((y as f32 + 0.5) / height as f32);
            texels.push(((x + y) % 4) as f32 / 4.0);
            texels.push(1.0);
        }
    }
    texels
}

/// Linear depth gradient over all pixels, 0.0 at the first, 1.0 at the last.
fn depth_gradient(width: u32, height: u32) -> Vec<f32> {
    let count = width * height;
    (0..count).map(|i| i as f32 / (count - 1) as f32).collect()
}

fn assert_texels_close(actual: &[f32], expected: &[f32], tol: f32, what: &str) {
    assert_eq!(actual.len(), expected.len(), "{what}: length mismatch");
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "{what}: texel value {i} is {a}, expected {e} (tol {tol})"
        );
    }
}

#[test]
fn coc_matches_formula_on_depth_gradient() {
    let Some(ctx) = gpu() else { return };

    // The 4x4 end-to-end scenario: linear gradient 0..1, focus at the middle.
    let depth_values = depth_gradient(4, 4);
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 4, 4, &depth_values).unwrap();
    let depth_view = view(&depth);
    let target = render_targets::create_render_target(&ctx.device, 4, 4, "CoC Out", DEPTH_FORMAT);
    let quad = render_targets::create_fullscreen_quad_vbo(&ctx.device);

    let mut pass = CircleOfConfusionPass::new(&ctx.device);
    pass.set_focus(0.5, 0.5);
    pass.set_bokeh_radius(8.0);
    encode_and_submit(&ctx, |enc| {
        pass.encode(&ctx.device, &ctx.queue, enc, &quad, &depth_view, &target, wgpu::Color::BLACK);
    });

    let result = textures::read_texture(&ctx.device, &ctx.queue, &target.texture).unwrap();
    let expected: Vec<f32> = depth_values
        .iter()
        .map(|&d| ((d - 0.5).abs() / 0.5).clamp(0.0, 1.0) * 8.0)
        .collect();
    // f16 storage of values up to 8.0 needs a slightly wider tolerance.
    assert_texels_close(&result, &expected, 0.05, "coc");

    // Gradient extremes blur the most; the depth closest to the focus plane
    // confuses the least.
    assert!(result[0] > 7.9 && result[15] > 7.9);
    let min = result.iter().cloned().fold(f32::INFINITY, f32::min);
    assert!(min < 1.2, "depth nearest the focus plane must confuse least, got {min}");
}

#[test]
fn coc_is_zero_at_the_focus_plane() {
    let Some(ctx) = gpu() else { return };

    let depth_values = vec![0.5f32; 16];
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 4, 4, &depth_values).unwrap();
    let depth_view = view(&depth);
    let target = render_targets::create_render_target(&ctx.device, 4, 4, "CoC Out", DEPTH_FORMAT);
    let quad = render_targets::create_fullscreen_quad_vbo(&ctx.device);

    let mut pass = CircleOfConfusionPass::new(&ctx.device);
    pass.set_focus(0.5, 0.5);
    pass.set_bokeh_radius(8.0);
    encode_and_submit(&ctx, |enc| {
        pass.encode(&ctx.device, &ctx.queue, enc, &quad, &depth_view, &target, wgpu::Color::BLACK);
    });

    let result = textures::read_texture(&ctx.device, &ctx.queue, &target.texture).unwrap();
    assert_texels_close(&result, &vec![0.0; 16], 1e-4, "coc at focus plane");
}

#[test]
fn coc_is_defended_against_degenerate_focus_range() {
    let Some(ctx) = gpu() else { return };

    let depth_values = vec![0.25; 16];
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 4, 4, &depth_values).unwrap();
    let depth_view = view(&depth);
    let target = render_targets::create_render_target(&ctx.device, 4, 4, "CoC Out", DEPTH_FORMAT);
    let quad = render_targets::create_fullscreen_quad_vbo(&ctx.device);

    let mut pass = CircleOfConfusionPass::new(&ctx.device);
    // Invalid parameters: clamped locally, not propagated.
    pass.set_focus(0.5, 0.0);
    pass.set_bokeh_radius(-3.0);
    encode_and_submit(&ctx, |enc| {
        pass.encode(&ctx.device, &ctx.queue, enc, &quad, &depth_view, &target, wgpu::Color::BLACK);
    });

    let result = textures::read_texture(&ctx.device, &ctx.queue, &target.texture).unwrap();
    for &v in &result {
        assert!(v.is_finite(), "degenerate focus range must not produce NaN/Inf");
        assert!(v >= 0.0);
    }
}

#[test]
fn compose_extremes_select_exact_inputs() {
    let Some(ctx) = gpu() else { return };

    let sharp_texels = vec![[0.25f32, 0.5, 0.75, 1.0]; 16].concat();
    let dof_texels = vec![[0.9f32, 0.1, 0.3, 1.0]; 16].concat();
    let sharp = textures::create_color_texture(&ctx.device, &ctx.queue, 4, 4, &sharp_texels).unwrap();
    let dof = textures::create_color_texture(&ctx.device, &ctx.queue, 4, 4, &dof_texels).unwrap();
    let quad = render_targets::create_fullscreen_quad_vbo(&ctx.device);
    let pass = ComposePass::new(&ctx.device);

    for (coc_value, expected) in [(0.0f32, &sharp_texels), (1.0f32, &dof_texels)] {
        let coc_texels = vec![coc_value; 16];
        let coc = textures::create_depth_texture(&ctx.device, &ctx.queue, 4, 4, &coc_texels).unwrap();
        let target = render_targets::create_render_target(&ctx.device, 4, 4, "Compose Out", COLOR_FORMAT);

        encode_and_submit(&ctx, |enc| {
            pass.encode(
                &ctx.device,
                enc,
                &quad,
                &view(&sharp),
                &view(&dof),
                &view(&coc),
                &target.view,
                wgpu::Color::BLACK,
            );
        });

        let result = textures::read_texture(&ctx.device, &ctx.queue, &target.texture).unwrap();
        assert_texels_close(&result, expected, 1e-3, &format!("compose coc={coc_value}"));
    }
}

#[test]
fn blur_with_zero_intensity_is_identity() {
    let Some(ctx) = gpu() else { return };

    let color_texels = color_pattern(8, 8);
    let depth_texels = depth_gradient(8, 8);
    let color = textures::create_color_texture(&ctx.device, &ctx.queue, 8, 8, &color_texels).unwrap();
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 8, 8, &depth_texels).unwrap();
    let target = render_targets::create_render_target(&ctx.device, 8, 8, "Blur Out", COLOR_FORMAT);
    let quad = render_targets::create_fullscreen_quad_vbo(&ctx.device);

    let mut pass = BlurPass::new(&ctx.device, BlurAxis::Vertical);
    pass.set_intensity(0.0);
    pass.set_focal_point(0.0);
    encode_and_submit(&ctx, |enc| {
        pass.encode(
            &ctx.device,
            &ctx.queue,
            enc,
            &quad,
            &view(&color),
            &view(&depth),
            &target,
            wgpu::Color::BLACK,
        );
    });

    let result = textures::read_texture(&ctx.device, &ctx.queue, &target.texture).unwrap();
    assert_texels_close(&result, &color_texels, 1e-3, "blur identity");
}

fn run_blur_chain(
    ctx: &GpuContext,
    first: &BlurPass,
    second: &BlurPass,
    color_view: &wgpu::TextureView,
    depth_view: &wgpu::TextureView,
    quad: &wgpu::Buffer,
) -> Vec<f32> {
    let ping = render_targets::create_render_target(&ctx.device, 8, 8, "Ping", COLOR_FORMAT);
    let out = render_targets::create_render_target(&ctx.device, 8, 8, "Out", COLOR_FORMAT);

    encode_and_submit(ctx, |enc| {
        first.encode(&ctx.device, &ctx.queue, enc, quad, color_view, depth_view, &ping, wgpu::Color::BLACK);
        second.encode(&ctx.device, &ctx.queue, enc, quad, &ping.view, depth_view, &out, wgpu::Color::BLACK);
    });

    textures::read_texture(&ctx.device, &ctx.queue, &out.texture).unwrap()
}

#[test]
fn separable_blur_axis_order_commutes() {
    let Some(ctx) = gpu() else { return };

    let color_texels = color_pattern(8, 8);
    // Uniform depth: a constant kernel radius across the image.
    let depth_texels = vec![1.0f32; 64];
    let color = textures::create_color_texture(&ctx.device, &ctx.queue, 8, 8, &color_texels).unwrap();
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 8, 8, &depth_texels).unwrap();
    let quad = render_targets::create_fullscreen_quad_vbo(&ctx.device);

    let mut vertical = BlurPass::new(&ctx.device, BlurAxis::Vertical);
    let mut horizontal = BlurPass::new(&ctx.device, BlurAxis::Horizontal);
    for pass in [&mut vertical, &mut horizontal] {
        pass.set_intensity(2.0);
        pass.set_focal_point(0.0);
    }

    let v_then_h = run_blur_chain(&ctx, &vertical, &horizontal, &view(&color), &view(&depth), &quad);
    let h_then_v = run_blur_chain(&ctx, &horizontal, &vertical, &view(&color), &view(&depth), &quad);

    assert_texels_close(&v_then_h, &h_then_v, TOL, "blur commutativity");
}

#[test]
fn parallax_with_zero_offset_is_identity() {
    let Some(ctx) = gpu() else { return };

    let color_texels = color_pattern(8, 8);
    let depth_texels = depth_gradient(8, 8);
    let color = textures::create_color_texture(&ctx.device, &ctx.queue, 8, 8, &color_texels).unwrap();
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 8, 8, &depth_texels).unwrap();
    let color_target = render_targets::create_render_target(&ctx.device, 8, 8, "Shifted Color", COLOR_FORMAT);
    let depth_target = render_targets::create_render_target(&ctx.device, 8, 8, "Shifted Depth", DEPTH_FORMAT);
    let quad = render_targets::create_fullscreen_quad_vbo(&ctx.device);

    let mut pass = ParallaxOcclusionPass::new(&ctx.device);
    pass.set_offset(0.0, 0.0);
    pass.set_focal_point(0.5);
    encode_and_submit(&ctx, |enc| {
        pass.encode(
            &ctx.device,
            &ctx.queue,
            enc,
            &quad,
            &view(&color),
            &view(&depth),
            &color_target,
            &depth_target,
            wgpu::Color::BLACK,
        );
    });

    let shifted_color = textures::read_texture(&ctx.device, &ctx.queue, &color_target.texture).unwrap();
    let shifted_depth = textures::read_texture(&ctx.device, &ctx.queue, &depth_target.texture).unwrap();
    assert_texels_close(&shifted_color, &color_texels, 1e-3, "parallax color identity");
    assert_texels_close(&shifted_depth, &depth_texels, 1e-3, "parallax depth identity");
}

#[test]
fn flat_color_survives_the_whole_chain() {
    let Some(ctx) = gpu() else { return };

    let flat = [0.2f32, 0.4, 0.6, 1.0];
    let color_texels: Vec<f32> = flat.iter().cycle().take(8 * 8 * 4).copied().collect();
    let depth_texels = depth_gradient(8, 8);
    let color = textures::create_color_texture(&ctx.device, &ctx.queue, 8, 8, &color_texels).unwrap();
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 8, 8, &depth_texels).unwrap();
    let output = render_targets::create_render_target(&ctx.device, 8, 8, "Final", COLOR_FORMAT);

    let mut renderer = ParallaxRenderer::new(&ctx.device, 8, 8).unwrap();
    renderer.set_viewer_offset(Vec2::new(0.02, -0.01));
    let color_view = view(&color);
    let depth_view = view(&depth);
    renderer
        .render(
            &ctx.device,
            &ctx.queue,
            &SourceImage {
                color: &color_view,
                depth: &depth_view,
            },
            &output.view,
            (8, 8),
        )
        .unwrap();

    // A uniform image has no edges to blur or bokeh-distort: the composite
    // must be that same color everywhere.
    let result = textures::read_texture(&ctx.device, &ctx.queue, &output.texture).unwrap();
    let expected: Vec<f32> = flat.iter().cycle().take(8 * 8 * 4).copied().collect();
    assert_texels_close(&result, &expected, TOL, "flat end-to-end");
}

#[test]
fn full_pipeline_is_deterministic() {
    let Some(ctx) = gpu() else { return };

    let color_texels = color_pattern(8, 8);
    let depth_texels = depth_gradient(8, 8);
    let color = textures::create_color_texture(&ctx.device, &ctx.queue, 8, 8, &color_texels).unwrap();
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 8, 8, &depth_texels).unwrap();
    let color_view = view(&color);
    let depth_view = view(&depth);

    let mut renderer = ParallaxRenderer::new(&ctx.device, 8, 8).unwrap();
    renderer.set_viewer_offset(Vec2::new(0.03, 0.01));
    renderer.set_focus(0.4, 0.3);

    let mut runs = Vec::new();
    for _ in 0..2 {
        let output = render_targets::create_render_target(&ctx.device, 8, 8, "Final", COLOR_FORMAT);
        renderer
            .render(
                &ctx.device,
                &ctx.queue,
                &SourceImage {
                    color: &color_view,
                    depth: &depth_view,
                },
                &output.view,
                (8, 8),
            )
            .unwrap();
        runs.push(textures::read_texture(&ctx.device, &ctx.queue, &output.texture).unwrap());
    }

    assert_eq!(runs[0], runs[1], "identical inputs must produce identical frames");
}

#[test]
fn render_drops_frame_on_output_size_mismatch() {
    let Some(ctx) = gpu() else { return };

    let color_texels = color_pattern(8, 8);
    let depth_texels = depth_gradient(8, 8);
    let color = textures::create_color_texture(&ctx.device, &ctx.queue, 8, 8, &color_texels).unwrap();
    let depth = textures::create_depth_texture(&ctx.device, &ctx.queue, 8, 8, &depth_texels).unwrap();
    let output = render_targets::create_render_target(&ctx.device, 8, 8, "Final", COLOR_FORMAT);
    let color_view = view(&color);
    let depth_view = view(&depth);

    let mut renderer = ParallaxRenderer::new(&ctx.device, 8, 8).unwrap();
    let result = renderer.render(
        &ctx.device,
        &ctx.queue,
        &SourceImage {
            color: &color_view,
            depth: &depth_view,
        },
        &output.view,
        (16, 16),
    );
    assert!(matches!(
        result,
        Err(RenderError::ResourceAllocation { width: 16, height: 16, .. })
    ));

    // After resizing the intermediate targets the same call goes through.
    renderer.resize(&ctx.device, 16, 16).unwrap();
    let output = render_targets::create_render_target(&ctx.device, 16, 16, "Final", COLOR_FORMAT);
    renderer
        .render(
            &ctx.device,
            &ctx.queue,
            &SourceImage {
                color: &color_view,
                depth: &depth_view,
            },
            &output.view,
            (16, 16),
        )
        .unwrap();
}

#[test]
fn degenerate_target_sizes_are_rejected() {
    let Some(ctx) = gpu() else { return };

    assert!(matches!(
        ParallaxRenderer::new(&ctx.device, 0, 8),
        Err(RenderError::ResourceAllocation { width: 0, .. })
    ));
    let limit = ctx.device.limits().max_texture_dimension_2d;
    assert!(matches!(
        ParallaxRenderer::new(&ctx.device, limit + 1, 8),
        Err(RenderError::ResourceAllocation { .. })
    ));
}

#[test]
fn rebuild_preserves_parameters() {
    let Some(ctx) = gpu() else { return };

    let mut renderer = ParallaxRenderer::new(&ctx.device, 8, 8).unwrap();
    renderer.set_focus(0.7, 0.2);
    renderer.set_bokeh_radius(4.0);
    renderer.set_viewer_offset(Vec2::new(0.01, 0.02));

    renderer.rebuild(&ctx.device).unwrap();

    let params = renderer.params();
    assert_eq!(params.focus_distance, 0.7);
    assert_eq!(params.focus_range, 0.2);
    assert_eq!(params.bokeh_radius, 4.0);
    assert_eq!(params.viewer_offset, Vec2::new(0.01, 0.02));
    assert_eq!(renderer.output_size(), (8, 8));
}

#[test]
fn texture_upload_rejects_wrong_texel_count() {
    let Some(ctx) = gpu() else { return };

    let result = textures::create_depth_texture(&ctx.device, &ctx.queue, 4, 4, &[0.0; 15]);
    assert!(matches!(result, Err(RenderError::ResourceAllocation { .. })));
}
