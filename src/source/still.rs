//! Single-image source.
//!
//! Behaves like a video that never advances: metadata is available
//! immediately and every frame is the same picture.

use std::path::Path;
use std::sync::Arc;

use super::types::{Frame, SourceError};
use super::PlaybackSource;

/// A source serving one decoded picture.
#[derive(Debug, Clone)]
pub struct StillSource {
    frame: Arc<Frame>,
    paused: bool,
}

impl StillSource {
    /// Wrap an already decoded frame. The source starts paused.
    pub fn new(frame: Frame) -> Self {
        Self {
            frame: Arc::new(frame),
            paused: true,
        }
    }

    /// Decode an image file (PNG, JPEG, GIF, ...) with the `image` crate.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::InputNotFound(path.to_path_buf()));
        }
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let frame = Frame::from_rgba(rgba.into_raw(), width, height).ok_or_else(|| {
            SourceError::InvalidMetadata(format!("{}: inconsistent buffer size", path.display()))
        })?;
        Ok(Self::new(frame))
    }
}

impl PlaybackSource for StillSource {
    fn dimensions(&self) -> Option<(u32, u32)> {
        if self.frame.width == 0 || self.frame.height == 0 {
            None
        } else {
            Some((self.frame.width, self.frame.height))
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<(), SourceError> {
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn current_frame(&self) -> Option<Arc<Frame>> {
        Some(Arc::clone(&self.frame))
    }
}

/// Whether `path` looks like a still image the `image` crate can decode.
pub fn is_still_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(image::ImageFormat::from_extension)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_source_play_pause() {
        let frame = Frame::from_rgba(vec![255; 4 * 6], 3, 2).unwrap();
        let mut source = StillSource::new(frame);
        assert!(source.is_paused());
        assert_eq!(source.dimensions(), Some((3, 2)));

        source.play().unwrap();
        assert!(!source.is_paused());
        source.pause();
        assert!(source.is_paused());
    }

    #[test]
    fn test_still_source_empty_frame_not_ready() {
        let frame = Frame::from_rgba(Vec::new(), 0, 0).unwrap();
        let source = StillSource::new(frame);
        assert_eq!(source.dimensions(), None);
    }

    #[test]
    fn test_still_source_open_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let source = StillSource::open(&path).unwrap();
        assert_eq!(source.dimensions(), Some((4, 2)));
        let frame = source.current_frame().unwrap();
        assert_eq!(frame.pixel(3, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_still_source_open_missing() {
        let result = StillSource::open(Path::new("/nope/missing.png"));
        assert!(matches!(result, Err(SourceError::InputNotFound(_))));
    }

    #[test]
    fn test_is_still_image() {
        assert!(is_still_image(Path::new("a.png")));
        assert!(is_still_image(Path::new("a.JPG")));
        assert!(!is_still_image(Path::new("a.mp4")));
        assert!(!is_still_image(Path::new("noext")));
    }
}
