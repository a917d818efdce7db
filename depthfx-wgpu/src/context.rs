//! GPU context acquisition.

use crate::error::RenderError;

/// Owns the wgpu instance, adapter, device and queue.
///
/// Every pass and texture in the pipeline is created against this context and
/// must not outlive it; dropping the context tears the whole pipeline down.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Acquire a headless device.
    ///
    /// Presentation is the caller's concern, so adapter selection does not
    /// require a surface. Fails with [`RenderError::DeviceUnavailable`] when
    /// no adapter or device can be obtained.
    pub fn new() -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| RenderError::DeviceUnavailable("no suitable GPU adapter".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("depthfx Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::DeviceUnavailable(format!("failed to create device: {e}")))?;

        log::info!(
            "depthfx initialized: {} ({})",
            adapter.get_info().name,
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}
