//! Frame-to-grid sampling.
//!
//! 1. **Frame sampling** - scale the current frame into a small [`SampleSurface`]
//! 2. **Pixel extraction** - read the surface back as an [`RgbaSample`]
//!
//! The sample is what both renderers consume.

mod dimensions;
mod sampler;
mod surface;

pub use dimensions::{
    clamp_sample_width, display_rows, sample_height, DEFAULT_CHAR_ASPECT_RATIO, MAX_SAMPLE_SIDE,
    TEXT_SAMPLE_WIDTH,
};
pub use sampler::{draw_scaled, FrameSampler};
pub use surface::{RgbaSample, SampleSurface};
