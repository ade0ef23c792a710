//! FFmpeg-backed video source.
//!
//! A background thread probes the input, spawns `ffmpeg` to decode it to raw
//! RGBA on stdout, and paces frames at the stream's frame rate into a shared
//! latest-frame buffer. Pausing simply stops reading; ffmpeg then blocks on
//! the full pipe.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;

use super::probe::probe_video;
use super::types::{Frame, SourceError, SourceEvent, VideoInfo};
use super::PlaybackSource;

/// How long a paused decode thread sleeps between checks of its flags.
const PAUSE_POLL: Duration = Duration::from_millis(10);

/// Settings for the decoder.
#[derive(Debug, Clone)]
pub struct DecoderSettings {
    /// File path or URL understood by ffmpeg
    pub input: String,
    /// Restart from the beginning instead of ending
    pub looping: bool,
}

/// State shared between the source handle and its decode thread.
#[derive(Clone)]
struct Shared {
    frame: Arc<Mutex<Option<Arc<Frame>>>>,
    info: Arc<Mutex<Option<VideoInfo>>>,
    paused: Arc<AtomicBool>,
    ended: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

/// Video source decoded by an `ffmpeg` child process.
pub struct FfmpegSource {
    settings: DecoderSettings,
    shared: Shared,
    decode_thread: Option<JoinHandle<()>>,
    events: UnboundedSender<SourceEvent>,
}

impl std::fmt::Debug for FfmpegSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSource")
            .field("settings", &self.settings)
            .field("paused", &self.is_paused())
            .finish_non_exhaustive()
    }
}

impl FfmpegSource {
    /// Open `settings.input` and start loading it in the background.
    ///
    /// The source starts paused. Metadata arrives asynchronously as
    /// [`SourceEvent::MetadataLoaded`]; until then [`PlaybackSource::dimensions`]
    /// returns `None`.
    ///
    /// # Errors
    /// * `SourceError::InputNotFound` - If a local input path doesn't exist
    pub fn open(
        settings: DecoderSettings,
        events: UnboundedSender<SourceEvent>,
    ) -> Result<Self, SourceError> {
        if !is_url(&settings.input) && !Path::new(&settings.input).exists() {
            return Err(SourceError::InputNotFound(settings.input.clone().into()));
        }

        let shared = Shared {
            frame: Arc::new(Mutex::new(None)),
            info: Arc::new(Mutex::new(None)),
            paused: Arc::new(AtomicBool::new(true)),
            ended: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(AtomicBool::new(false)),
        };

        let mut source = Self {
            settings,
            shared,
            decode_thread: None,
            events,
        };
        source.spawn_decoder();
        Ok(source)
    }

    fn spawn_decoder(&mut self) {
        let settings = self.settings.clone();
        let shared = self.shared.clone();
        let events = self.events.clone();
        self.decode_thread = Some(thread::spawn(move || {
            run_decode_loop(settings, shared, events);
        }));
    }

    /// Stop the decode thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.decode_thread.take() {
            let _ = handle.join();
        }
    }

}

impl PlaybackSource for FfmpegSource {
    fn dimensions(&self) -> Option<(u32, u32)> {
        let info = self.shared.info.lock().ok()?;
        info.map(|i| (i.width, i.height))
    }

    fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    fn play(&mut self) -> Result<(), SourceError> {
        if self.shared.ended.load(Ordering::SeqCst) {
            // Playing an ended stream restarts it from the beginning. The old
            // thread is past its read loop once `ended` is set, so it is left
            // to finish reaping ffmpeg on its own.
            if let Some(old) = self.decode_thread.take() {
                if old.is_finished() {
                    let _ = old.join();
                }
            }
            self.shared.ended.store(false, Ordering::SeqCst);
            self.spawn_decoder();
        }
        self.shared.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&mut self) {
        self.shared.paused.store(true, Ordering::SeqCst);
    }

    fn current_frame(&self) -> Option<Arc<Frame>> {
        let buffer = self.shared.frame.lock().ok()?;
        buffer.as_ref().map(Arc::clone)
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn is_url(input: &str) -> bool {
    input.contains("://")
}

/// Build the ffmpeg arguments that decode `settings.input` to raw RGBA on stdout.
pub fn decoder_args(settings: &DecoderSettings) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-nostdin"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    if settings.looping {
        args.extend(["-stream_loop".to_string(), "-1".to_string()]);
    }
    args.extend([
        "-i".to_string(),
        settings.input.clone(),
        "-an".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgba".to_string(),
        "-".to_string(),
    ]);
    args
}

/// Body of the decode thread.
fn run_decode_loop(settings: DecoderSettings, shared: Shared, events: UnboundedSender<SourceEvent>) {
    let info = match probe_video(&settings.input) {
        Ok(info) => info,
        Err(e) => {
            log::error!("Failed to load '{}': {}", settings.input, e);
            let _ = events.send(SourceEvent::Failed(e.to_string()));
            return;
        }
    };

    if let Ok(mut slot) = shared.info.lock() {
        *slot = Some(info);
    }
    log::info!("video metadata loaded: {}", info);
    let _ = events.send(SourceEvent::MetadataLoaded(info));

    let mut child = match spawn_ffmpeg(&settings) {
        Ok(child) => child,
        Err(e) => {
            log::error!("{}", e);
            let _ = events.send(SourceEvent::Failed(e.to_string()));
            return;
        }
    };

    let stderr_thread = child.stderr.take().map(|stderr| {
        thread::spawn(move || {
            let reader = BufReader::new(stderr);
            for line in reader.lines().map_while(Result::ok) {
                log::warn!("[ffmpeg] {}", line);
            }
        })
    });

    let Some(mut stdout) = child.stdout.take() else {
        let _ = events.send(SourceEvent::Failed("ffmpeg stdout unavailable".to_string()));
        let _ = shutdown_child(&mut child);
        return;
    };

    let frame_size = (info.width as usize) * (info.height as usize) * Frame::BYTES_PER_PIXEL;
    let frame_duration = info.frame_duration().unwrap_or(Duration::from_millis(40));
    let mut buf = vec![0u8; frame_size];
    let mut next_deadline: Option<Instant> = None;

    while !shared.stop.load(Ordering::Relaxed) {
        if shared.paused.load(Ordering::Relaxed) {
            // Re-anchor pacing after a pause so we don't burst to catch up
            next_deadline = None;
            thread::sleep(PAUSE_POLL);
            continue;
        }

        match stdout.read_exact(&mut buf) {
            Ok(()) => {
                if let Some(frame) = Frame::from_rgba(buf.clone(), info.width, info.height) {
                    let frame = Arc::new(frame);
                    if let Ok(mut slot) = shared.frame.lock() {
                        *slot = Some(frame);
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                log::info!("Reached end of '{}'", settings.input);
                shared.paused.store(true, Ordering::SeqCst);
                shared.ended.store(true, Ordering::SeqCst);
                let _ = events.send(SourceEvent::Ended);
                break;
            }
            Err(e) => {
                log::error!("Decoder read failed: {}", e);
                shared.paused.store(true, Ordering::SeqCst);
                let _ = events.send(SourceEvent::Failed(e.to_string()));
                break;
            }
        }

        let now = Instant::now();
        let deadline = next_deadline.map_or(now + frame_duration, |d| d + frame_duration);
        if deadline > now {
            thread::sleep(deadline - now);
            next_deadline = Some(deadline);
        } else {
            // Falling behind: drop the backlog instead of racing
            next_deadline = Some(now);
        }
    }

    drop(stdout);
    if let Err(e) = shutdown_child(&mut child) {
        log::warn!("ffmpeg shutdown: {}", e);
    }
    if let Some(handle) = stderr_thread {
        let _ = handle.join();
    }
}

fn spawn_ffmpeg(settings: &DecoderSettings) -> Result<Child, SourceError> {
    Command::new("ffmpeg")
        .args(decoder_args(settings))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::FfmpegNotFound
            } else {
                SourceError::SpawnFailed(e)
            }
        })
}

/// Ask ffmpeg to exit with SIGINT, killing it if it hasn't gone within 2 seconds.
fn shutdown_child(child: &mut Child) -> std::io::Result<ExitStatus> {
    if let Some(status) = child.try_wait()? {
        return Ok(status);
    }

    #[cfg(unix)]
    {
        unsafe {
            libc::kill(child.id() as i32, libc::SIGINT);
        }
    }

    #[cfg(not(unix))]
    {
        let _ = child.kill();
    }

    let start = Instant::now();
    let timeout = Duration::from_secs(2);
    loop {
        match child.try_wait()? {
            Some(status) => return Ok(status),
            None => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    return child.wait();
                }
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}
