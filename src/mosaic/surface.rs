//! Off-screen sample surface and RGBA pixel extraction.

/// A flat RGBA8 sample, `width * height * 4` bytes, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RgbaSample {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RgbaSample {
    /// RGBA of the pixel at (x, y).
    ///
    /// # Panics
    /// Panics if the coordinates are outside the sample.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Whether the sample has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Low-resolution off-screen pixel buffer the current frame is drawn into.
#[derive(Debug, Clone, Default)]
pub struct SampleSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SampleSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize the surface, clearing it. No-op if the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize((width as usize) * (height as usize) * 4, 0);
    }

    /// Write one RGBA pixel. Out-of-range writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Read back the whole surface.
    pub fn extract(&self) -> RgbaSample {
        RgbaSample {
            data: self.data.clone(),
            width: self.width,
            height: self.height,
        }
    }
}
