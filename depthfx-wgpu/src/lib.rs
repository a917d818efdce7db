//! depthfx wgpu backend.
//!
//! Renders a synthetic depth-of-field and parallax "3D photo" effect from a
//! color image plus a per-pixel depth map, as a fixed chain of six
//! texture-to-texture render passes:
//!
//! parallax occlusion → circle of confusion → blur (vertical) →
//! blur (horizontal) → bokeh → post filter → compose.
//!
//! [`ParallaxRenderer`] owns the whole chain. Image decoding, window
//! management and presentation are the caller's responsibility; sources come
//! in through [`textures`] upload helpers (or any compatible texture) and the
//! composed frame lands in a caller-provided texture view.

pub mod animation;
pub mod context;
pub mod error;
pub mod passes;
pub mod pipeline;
pub mod render_targets;
pub mod renderer;
pub mod textures;

pub use context::GpuContext;
pub use error::RenderError;
pub use renderer::{ParallaxRenderer, PipelineParams, SourceImage};
