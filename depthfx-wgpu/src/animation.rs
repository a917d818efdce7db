//! Viewer-offset animation programs.
//!
//! Pure math: the host owns timing and feeds a cycle progress in, getting the
//! viewer offset for [`crate::ParallaxRenderer::set_viewer_offset`] back.

use glam::Vec2;

/// Largest offset magnitude the interactive (gesture-driven) path should feed
/// the parallax pass; larger shifts expose too much disoccluded border.
pub const MAX_INTERACTIVE_OFFSET: f32 = 0.06;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    /// Circular orbit of the viewpoint.
    TurnTable,
    /// Sweep left-right and back.
    HorizontalSwitch,
    /// Sweep up-down and back.
    VerticalSwitch,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 3] = [
        AnimationKind::TurnTable,
        AnimationKind::HorizontalSwitch,
        AnimationKind::VerticalSwitch,
    ];

    /// Viewer offset at `progress` (one full cycle per unit, any real value
    /// accepted), scaled by `intensity`.
    pub fn offset_at(self, progress: f32, intensity: f32) -> Vec2 {
        let p = progress.rem_euclid(1.0);
        let offset = match self {
            AnimationKind::TurnTable => {
                let angle = p * std::f32::consts::TAU;
                Vec2::new(angle.sin(), angle.cos())
            }
            AnimationKind::HorizontalSwitch => Vec2::new(switch_wave(p), 0.0),
            AnimationKind::VerticalSwitch => Vec2::new(0.0, switch_wave(p)),
        };
        offset * intensity
    }
}

/// Triangle wave over one cycle: -1 at 0, +1 at 0.5, back to -1 at 1.
fn switch_wave(p: f32) -> f32 {
    if p < 0.5 {
        4.0 * p - 1.0
    } else {
        -4.0 * p + 3.0
    }
}

/// Clamp a gesture-driven offset into the interactive range.
pub fn clamp_viewer_offset(offset: Vec2) -> Vec2 {
    offset.clamp(
        Vec2::splat(-MAX_INTERACTIVE_OFFSET),
        Vec2::splat(MAX_INTERACTIVE_OFFSET),
    )
}
