//! Playback sources: where frames come from.
//!
//! - [`FfmpegSource`] decodes a video file or URL through an ffmpeg child process
//! - [`StillSource`] serves a single decoded image
//! - [`probe_video`] reads stream metadata with ffprobe

mod decoder;
mod probe;
mod still;
mod types;

pub use decoder::{decoder_args, DecoderSettings, FfmpegSource};
pub use probe::{parse_probe_output, probe_video};
pub use still::{is_still_image, StillSource};
pub use types::{Frame, SourceError, SourceEvent, VideoInfo};

use std::sync::Arc;

/// The live picture the mosaic is sampled from.
///
/// Read-only to the pipeline apart from the play/pause controls.
pub trait PlaybackSource {
    /// Native (width, height), or `None` until metadata has loaded.
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// Whether playback is currently paused (or has ended).
    fn is_paused(&self) -> bool;

    /// Start or resume playback.
    fn play(&mut self) -> Result<(), SourceError>;

    /// Pause playback.
    fn pause(&mut self);

    /// The most recent frame, if one has been decoded. Shared, not copied.
    fn current_frame(&self) -> Option<Arc<Frame>>;
}
