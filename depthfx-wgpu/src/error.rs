use thiserror::Error;

/// Errors surfaced by the pipeline.
///
/// Parameter drift (non-positive focus range, negative radii) is clamped at
/// the setters and never reaches this type; only device and resource failures
/// propagate.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The graphics device could not be acquired or has been lost. Fatal for
    /// the current pipeline instance — rebuild all passes and textures
    /// against a new device before resuming.
    #[error("graphics device unavailable: {0}")]
    DeviceUnavailable(String),

    /// An intermediate texture could not be allocated at the requested size,
    /// or the requested output size does not match the current allocations.
    /// Fatal for the current frame only; the frame is dropped and the next
    /// frame may retry once sizes are corrected.
    #[error("cannot use {width}x{height} render target: {reason}")]
    ResourceAllocation {
        width: u32,
        height: u32,
        reason: String,
    },
}
