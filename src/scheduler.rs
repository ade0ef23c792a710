//! Render scheduling: the Stopped/Running state machine and the per-tick pipeline.
//!
//! The [`Scheduler`] owns all mutable render state. It doesn't own a clock:
//! it publishes a [`Timer`] descriptor and the event loop drives
//! [`Scheduler::tick`] at that period. A new generation means the timer was
//! (re)started and any running interval must be replaced.

use std::io;
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::Deserialize;

use crate::console::{Console, ConsoleEntry};
use crate::mosaic::{clamp_sample_width, FrameSampler, MAX_SAMPLE_SIDE, TEXT_SAMPLE_WIDTH};
use crate::render::{render_text, ImageRenderer, RenderError};
use crate::source::PlaybackSource;

/// Tick period in Image mode.
pub const IMAGE_INTERVAL: Duration = Duration::from_millis(100);
/// Tick period in Text mode. Console text is the bottleneck, hence the slower cadence.
pub const TEXT_INTERVAL: Duration = Duration::from_millis(300);
/// Frames between console clears in Image mode.
pub const IMAGE_CLEAR_THRESHOLD: u32 = 100;
/// Blank lines logged right after each clear.
pub const BLANK_LINES: usize = 60;

/// Accepted values for the Image mode sample width control.
pub const SAMPLE_WIDTH_RANGE: RangeInclusive<u32> = 1..=MAX_SAMPLE_SIDE;
/// Accepted values for the Text mode clear threshold control.
pub const CLEAR_THRESHOLD_RANGE: RangeInclusive<u32> = 1..=100;

pub const DEFAULT_SAMPLE_WIDTH: u32 = 100;
pub const DEFAULT_TEXT_CLEAR_THRESHOLD: u32 = 20;

/// How frames are written to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Image,
    Text,
}

impl OutputMode {
    /// Fixed tick period for this mode.
    pub fn interval(self) -> Duration {
        match self {
            OutputMode::Image => IMAGE_INTERVAL,
            OutputMode::Text => TEXT_INTERVAL,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            OutputMode::Image => OutputMode::Text,
            OutputMode::Text => OutputMode::Image,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputMode::Image => "image",
            OutputMode::Text => "text",
        }
    }
}

/// Mutable render settings plus the frames-since-clear counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub output_mode: OutputMode,
    /// Image mode sampling width
    pub sample_width: u32,
    /// Text mode clear threshold
    pub text_clear_threshold: u32,
    /// Frames logged since the console was last cleared; 0 forces a clear on the next tick
    pub frames_since_clear: u32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::default(),
            sample_width: DEFAULT_SAMPLE_WIDTH,
            text_clear_threshold: DEFAULT_TEXT_CLEAR_THRESHOLD,
            frames_since_clear: 0,
        }
    }
}

impl RenderState {
    /// Tick period for the current mode.
    pub fn interval(&self) -> Duration {
        self.output_mode.interval()
    }

    /// Frames allowed on screen before the next clear.
    pub fn clear_threshold(&self) -> u32 {
        match self.output_mode {
            OutputMode::Image => IMAGE_CLEAR_THRESHOLD,
            OutputMode::Text => self.text_clear_threshold,
        }
    }

    /// Width the sampler should use for the current mode.
    pub fn effective_width(&self) -> u32 {
        match self.output_mode {
            OutputMode::Image => clamp_sample_width(self.sample_width),
            OutputMode::Text => TEXT_SAMPLE_WIDTH,
        }
    }

    /// Count one more frame. Returns `true` when the console must be cleared first.
    pub fn advance_counter(&mut self) -> bool {
        if self.frames_since_clear == 0 || self.frames_since_clear >= self.clear_threshold() {
            self.frames_since_clear = 1;
            true
        } else {
            self.frames_since_clear += 1;
            false
        }
    }
}

/// A repeating timer requested by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub period: Duration,
    /// Increases every time a timer is started
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No timer is active
    Stopped,
    /// The source has no dimensions or frame yet
    NotReady,
    /// The frame's shape gave an empty sample (e.g. far too tall); nothing was logged
    Skipped,
    /// A frame was sampled and logged
    Rendered { cleared: bool },
}

/// Owns [`RenderState`], the timer descriptor and the sampling/render pipeline.
#[derive(Debug)]
pub struct Scheduler {
    state: RenderState,
    timer: Option<Timer>,
    generations: u64,
    sampler: FrameSampler,
    image: ImageRenderer,
}

impl Scheduler {
    /// `columns` is the on-screen width of Image mode output.
    pub fn new(state: RenderState, columns: u16) -> Self {
        Self {
            state,
            timer: None,
            generations: 0,
            sampler: FrameSampler::new(),
            image: ImageRenderer::new(columns),
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn status(&self) -> SchedulerState {
        if self.timer.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// The active timer, if running.
    pub fn timer(&self) -> Option<Timer> {
        self.timer
    }

    fn start_timer(&mut self) {
        self.generations += 1;
        self.timer = Some(Timer {
            period: self.state.interval(),
            generation: self.generations,
        });
    }

    /// Source started playing. Starting an already running scheduler keeps its timer.
    pub fn play(&mut self) {
        if self.timer.is_none() {
            self.start_timer();
            log::info!(
                "Scheduler running ({} mode, every {:?})",
                self.state.output_mode.name(),
                self.state.interval()
            );
        }
    }

    /// Source paused or ended.
    pub fn pause(&mut self) {
        if self.timer.take().is_some() {
            log::info!("Scheduler stopped");
        }
    }

    /// Switch output mode.
    ///
    /// Cancels the timer, clears the console and resets the counter; a new
    /// timer at the mode's interval starts only if the source is playing.
    pub fn switch_mode<C: Console + ?Sized>(
        &mut self,
        mode: OutputMode,
        source_playing: bool,
        console: &mut C,
    ) -> io::Result<()> {
        self.timer = None;
        self.state.output_mode = mode;
        console.clear()?;
        self.state.frames_since_clear = 0;
        if source_playing {
            self.start_timer();
        }
        log::info!("Switched to {} mode", mode.name());
        Ok(())
    }

    /// Set the Image mode sample width, clamped to [`SAMPLE_WIDTH_RANGE`].
    pub fn set_sample_width(&mut self, width: u32) -> u32 {
        let width = width.clamp(*SAMPLE_WIDTH_RANGE.start(), *SAMPLE_WIDTH_RANGE.end());
        self.state.sample_width = width;
        width
    }

    /// Set the Text mode clear threshold, clamped to [`CLEAR_THRESHOLD_RANGE`].
    pub fn set_clear_threshold(&mut self, frames: u32) -> u32 {
        let frames = frames.clamp(*CLEAR_THRESHOLD_RANGE.start(), *CLEAR_THRESHOLD_RANGE.end());
        self.state.text_clear_threshold = frames;
        frames
    }

    /// One sample → extract → render pass.
    pub fn tick<S, C>(&mut self, source: &S, console: &mut C) -> Result<TickOutcome, RenderError>
    where
        S: PlaybackSource + ?Sized,
        C: Console + ?Sized,
    {
        if self.timer.is_none() {
            return Ok(TickOutcome::Stopped);
        }
        if !matches!(source.dimensions(), Some((w, h)) if w > 0 && h > 0) {
            return Ok(TickOutcome::NotReady);
        }
        let Some(frame) = source.current_frame() else {
            return Ok(TickOutcome::NotReady);
        };

        let sample = self
            .sampler
            .sample(&frame, self.state.effective_width())
            .extract();
        if sample.is_empty() {
            return Ok(TickOutcome::Skipped);
        }

        let cleared = self.state.advance_counter();
        if cleared {
            log::debug!("Clearing console");
            console.clear()?;
            console.log(ConsoleEntry::Text("\n".repeat(BLANK_LINES)))?;
        }

        let entry = match self.state.output_mode {
            OutputMode::Image => self.image.render(&sample)?,
            OutputMode::Text => render_text(&sample),
        };
        if let Some(entry) = entry {
            console.log(entry)?;
        }

        Ok(TickOutcome::Rendered { cleared })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intervals() {
        assert_eq!(OutputMode::Image.interval(), Duration::from_millis(100));
        assert_eq!(OutputMode::Text.interval(), Duration::from_millis(300));
    }

    #[test]
    fn test_toggled() {
        assert_eq!(OutputMode::Image.toggled(), OutputMode::Text);
        assert_eq!(OutputMode::Text.toggled(), OutputMode::Image);
    }

    #[test]
    fn test_clear_threshold_by_mode() {
        let mut state = RenderState {
            text_clear_threshold: 7,
            ..RenderState::default()
        };
        assert_eq!(state.clear_threshold(), 100);
        state.output_mode = OutputMode::Text;
        assert_eq!(state.clear_threshold(), 7);
    }

    #[test]
    fn test_effective_width_by_mode() {
        let mut state = RenderState {
            sample_width: 120,
            ..RenderState::default()
        };
        assert_eq!(state.effective_width(), 120);
        state.output_mode = OutputMode::Text;
        assert_eq!(state.effective_width(), 40);
        state.output_mode = OutputMode::Image;
        state.sample_width = 0;
        assert_eq!(state.effective_width(), 1);
    }

    #[test]
    fn test_advance_counter_cycle() {
        let mut state = RenderState::default();
        assert!(state.advance_counter());
        assert_eq!(state.frames_since_clear, 1);
        for expected in 2..=100 {
            assert!(!state.advance_counter());
            assert_eq!(state.frames_since_clear, expected);
        }
        assert!(state.advance_counter());
        assert_eq!(state.frames_since_clear, 1);
    }

    #[test]
    fn test_play_pause_timer() {
        let mut scheduler = Scheduler::new(RenderState::default(), 64);
        assert_eq!(scheduler.status(), SchedulerState::Stopped);
        assert!(scheduler.timer().is_none());

        scheduler.play();
        let timer = scheduler.timer().unwrap();
        assert_eq!(timer.period, IMAGE_INTERVAL);
        assert_eq!(scheduler.status(), SchedulerState::Running);

        // Repeated play keeps the same timer
        scheduler.play();
        assert_eq!(scheduler.timer(), Some(timer));

        scheduler.pause();
        assert!(scheduler.timer().is_none());
        assert_eq!(scheduler.status(), SchedulerState::Stopped);
    }

    #[test]
    fn test_set_sample_width_clamps() {
        let mut scheduler = Scheduler::new(RenderState::default(), 64);
        assert_eq!(scheduler.set_sample_width(0), 1);
        assert_eq!(scheduler.set_sample_width(10_000), 400);
        assert_eq!(scheduler.set_sample_width(80), 80);
        assert_eq!(scheduler.state().sample_width, 80);
    }

    #[test]
    fn test_set_clear_threshold_clamps() {
        let mut scheduler = Scheduler::new(RenderState::default(), 64);
        assert_eq!(scheduler.set_clear_threshold(0), 1);
        assert_eq!(scheduler.set_clear_threshold(500), 100);
        assert_eq!(scheduler.set_clear_threshold(15), 15);
        assert_eq!(scheduler.state().text_clear_threshold, 15);
    }
}
