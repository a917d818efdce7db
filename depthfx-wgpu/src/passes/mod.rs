//! The six passes of the chain. Each pass owns its compiled pipeline and its
//! uniform buffer; setters update pending CPU-side values that `encode`
//! uploads before recording the render pass.

pub mod blur;
pub mod bokeh;
pub mod coc;
pub mod compose;
pub mod parallax;
pub mod post_filter;

pub use blur::{BlurAxis, BlurPass};
pub use bokeh::BokehPass;
pub use coc::CircleOfConfusionPass;
pub use compose::ComposePass;
pub use parallax::ParallaxOcclusionPass;
pub use post_filter::PostFilterPass;
