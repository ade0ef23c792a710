//! Playback source types and data structures.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Stream metadata reported once the source has loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    /// Native width in pixels
    pub width: u32,
    /// Native height in pixels
    pub height: u32,
    /// Frames per second (0.0 for still images)
    pub fps: f64,
}

impl VideoInfo {
    /// Time between two decoded frames, or `None` for a still image.
    pub fn frame_duration(&self) -> Option<std::time::Duration> {
        if self.fps > 0.0 && self.fps.is_finite() {
            Some(std::time::Duration::from_secs_f64(1.0 / self.fps))
        } else {
            None
        }
    }
}

impl fmt::Display for VideoInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fps > 0.0 {
            write!(f, "{}x{} @ {:.2} fps", self.width, self.height, self.fps)
        } else {
            write!(f, "{}x{} (still)", self.width, self.height)
        }
    }
}

/// A decoded RGBA frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data, 4 bytes per pixel (R, G, B, A), row-major
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// When the frame was decoded
    pub timestamp: Instant,
}

impl Frame {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wrap an RGBA buffer. Returns `None` if the length doesn't match.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize) * (height as usize) * Self::BYTES_PER_PIXEL;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        })
    }

    /// RGBA value at (x, y). Out-of-range coordinates read as transparent black.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * Self::BYTES_PER_PIXEL;
        match self.data.get(idx..idx + 4) {
            Some(p) => [p[0], p[1], p[2], p[3]],
            None => [0; 4],
        }
    }
}

/// Notifications emitted by a source, independent of any control input.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// Dimensions and frame rate are now known
    MetadataLoaded(VideoInfo),
    /// Playback reached the end of the stream; the source is now paused
    Ended,
    /// The decoder gave up
    Failed(String),
}

/// Errors that can occur while opening or driving a playback source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("FFmpeg not found. Please install ffmpeg (which provides ffmpeg and ffprobe) and make sure it is on PATH")]
    FfmpegNotFound,

    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("ffprobe failed for '{input}': {message}")]
    ProbeFailed { input: String, message: String },

    #[error("No video stream in '{0}'")]
    NoVideoStream(String),

    #[error("Invalid stream metadata: {0}")]
    InvalidMetadata(String),

    #[error("Failed to spawn decoder: {0}")]
    SpawnFailed(std::io::Error),

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_from_rgba_checks_length() {
        assert!(Frame::from_rgba(vec![0; 16], 2, 2).is_some());
        assert!(Frame::from_rgba(vec![0; 15], 2, 2).is_none());
        assert!(Frame::from_rgba(Vec::new(), 0, 0).is_some());
    }

    #[test]
    fn test_frame_pixel_lookup() {
        let frame = Frame::from_rgba(vec![1, 2, 3, 4, 5, 6, 7, 8], 2, 1).unwrap();
        assert_eq!(frame.pixel(0, 0), [1, 2, 3, 4]);
        assert_eq!(frame.pixel(1, 0), [5, 6, 7, 8]);
        assert_eq!(frame.pixel(2, 0), [0, 0, 0, 0]);
        assert_eq!(frame.pixel(0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_frame_duration() {
        let info = VideoInfo { width: 640, height: 360, fps: 25.0 };
        assert_eq!(info.frame_duration(), Some(std::time::Duration::from_millis(40)));

        let still = VideoInfo { width: 640, height: 360, fps: 0.0 };
        assert_eq!(still.frame_duration(), None);
    }

    #[test]
    fn test_video_info_display() {
        let info = VideoInfo { width: 1920, height: 1080, fps: 30.0 };
        assert_eq!(info.to_string(), "1920x1080 @ 30.00 fps");
        let still = VideoInfo { width: 10, height: 5, fps: 0.0 };
        assert_eq!(still.to_string(), "10x5 (still)");
    }

    #[test]
    fn test_source_error_display() {
        let msg = SourceError::FfmpegNotFound.to_string();
        assert!(msg.contains("FFmpeg not found"));

        let msg = SourceError::NoVideoStream("song.mp3".to_string()).to_string();
        assert!(msg.contains("song.mp3"));
    }
}
