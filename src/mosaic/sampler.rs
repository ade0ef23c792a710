//! Frame sampling: scaling a source frame into a small sample surface.

use crate::source::Frame;

use super::dimensions::{clamp_sample_width, sample_height};
use super::surface::SampleSurface;

/// Draws source frames into a reusable [`SampleSurface`].
#[derive(Debug, Default)]
pub struct FrameSampler {
    surface: SampleSurface,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the surface for `requested_width` and draw `frame` into it.
    ///
    /// The surface is `max(requested_width, 1)` wide and
    /// `round(width * frame.height / frame.width)` tall. A frame without
    /// pixels leaves a degenerate surface of height 0.
    pub fn sample(&mut self, frame: &Frame, requested_width: u32) -> &SampleSurface {
        let width = clamp_sample_width(requested_width);
        let height = sample_height(width, frame.width, frame.height);
        self.surface.resize(width, height);
        draw_scaled(frame, &mut self.surface);
        &self.surface
    }

    /// The surface as left by the last [`sample`](Self::sample) call.
    pub fn surface(&self) -> &SampleSurface {
        &self.surface
    }
}

/// Scale `frame` into `surface`.
///
/// Each surface cell averages the block of source pixels it covers. When the
/// surface is larger than the frame a cell covers less than one pixel, so the
/// block is widened to the nearest source pixel.
pub fn draw_scaled(frame: &Frame, surface: &mut SampleSurface) {
    let (out_w, out_h) = (surface.width(), surface.height());
    if out_w == 0 || out_h == 0 || frame.width == 0 || frame.height == 0 || frame.data.is_empty() {
        return;
    }

    let cell_w = frame.width as f32 / out_w as f32;
    let cell_h = frame.height as f32 / out_h as f32;

    for cy in 0..out_h {
        let (start_y, end_y) = cell_span(cy, cell_h, frame.height);
        for cx in 0..out_w {
            let (start_x, end_x) = cell_span(cx, cell_w, frame.width);

            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for py in start_y..end_y {
                for px in start_x..end_x {
                    let p = frame.pixel(px, py);
                    for (acc, v) in sum.iter_mut().zip(p) {
                        *acc += v as u32;
                    }
                    count += 1;
                }
            }

            let rgba = if count > 0 {
                [
                    (sum[0] / count) as u8,
                    (sum[1] / count) as u8,
                    (sum[2] / count) as u8,
                    (sum[3] / count) as u8,
                ]
            } else {
                [0; 4]
            };
            surface.put_pixel(cx, cy, rgba);
        }
    }
}

/// Source pixel range `[start, end)` covered by output cell `index`; never empty.
fn cell_span(index: u32, cell_size: f32, limit: u32) -> (u32, u32) {
    let start = ((index as f32 * cell_size) as u32).min(limit - 1);
    let end = (((index + 1) as f32 * cell_size) as u32).clamp(start + 1, limit);
    (start, end)
}
