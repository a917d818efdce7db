//! Platform-independent GPU data for the depthfx pipeline.
//!
//! Uniform structs here are `#[repr(C)]` + bytemuck-`Pod` and must match the
//! WGSL struct layouts in `shaders/` byte for byte.

pub mod shaders;
pub mod uniforms;
