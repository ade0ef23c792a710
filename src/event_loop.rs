//! Async event loop driving playback.
//!
//! A single task multiplexes three inputs with `tokio::select!`:
//! 1. Control events (keyboard, Ctrl+C) from the input port channel
//! 2. Source events (metadata loaded, ended, failed)
//! 3. The scheduler's repeating timer
//!
//! Each tick runs the whole sample → extract → render pass before the loop
//! polls again, so passes never overlap; ticks missed meanwhile are skipped.

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::console::Console;
use crate::error::AppError;
use crate::input::{handle_key_event, ControlEvent};
use crate::scheduler::{Scheduler, Timer, TickOutcome};
use crate::source::{PlaybackSource, SourceEvent};

/// Whether the loop should keep going after handling an event.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The tokio interval currently backing the scheduler's [`Timer`].
struct ActiveTimer {
    generation: u64,
    interval: Interval,
}

/// Run until a `Quit` control event arrives or the control channel closes.
pub async fn run<S, C>(
    source: &mut S,
    scheduler: &mut Scheduler,
    console: &mut C,
    mut controls: UnboundedReceiver<ControlEvent>,
    mut source_events: UnboundedReceiver<SourceEvent>,
) -> Result<(), AppError>
where
    S: PlaybackSource + ?Sized,
    C: Console + ?Sized,
{
    let mut ticker: Option<ActiveTimer> = None;
    let mut source_open = true;

    loop {
        sync_timer(scheduler.timer(), &mut ticker);

        tokio::select! {
            maybe_control = controls.recv() => {
                match maybe_control {
                    Some(event) => {
                        if handle_control(event, source, scheduler, console)? == Flow::Quit {
                            break;
                        }
                    }
                    None => break,
                }
            }

            maybe_event = source_events.recv(), if source_open => {
                match maybe_event {
                    Some(event) => handle_source_event(event, scheduler)?,
                    None => source_open = false,
                }
            }

            _ = next_tick(&mut ticker) => {
                match scheduler.tick(&*source, console)? {
                    TickOutcome::NotReady => log::debug!("Source not ready, skipping tick"),
                    TickOutcome::Skipped => log::debug!("Degenerate frame, skipping tick"),
                    TickOutcome::Stopped | TickOutcome::Rendered { .. } => {}
                }
            }
        }
    }

    Ok(())
}

fn handle_control<S, C>(
    event: ControlEvent,
    source: &mut S,
    scheduler: &mut Scheduler,
    console: &mut C,
) -> Result<Flow, AppError>
where
    S: PlaybackSource + ?Sized,
    C: Console + ?Sized,
{
    match event {
        ControlEvent::TogglePlayback => {
            let next = if source.is_paused() {
                ControlEvent::Play
            } else {
                ControlEvent::Pause
            };
            return handle_control(next, source, scheduler, console);
        }
        ControlEvent::Play => {
            source.play()?;
            scheduler.play();
        }
        ControlEvent::Pause => {
            source.pause();
            scheduler.pause();
        }
        ControlEvent::SetMode(mode) => {
            scheduler.switch_mode(mode, !source.is_paused(), console)?;
        }
        ControlEvent::ToggleMode => {
            let mode = scheduler.state().output_mode.toggled();
            scheduler.switch_mode(mode, !source.is_paused(), console)?;
        }
        ControlEvent::AdjustSampleWidth(delta) => {
            let current = scheduler.state().sample_width as i64;
            let width = scheduler.set_sample_width((current + delta as i64).max(0) as u32);
            log::info!("Sample width: {}", width);
        }
        ControlEvent::AdjustClearThreshold(delta) => {
            let current = scheduler.state().text_clear_threshold as i64;
            let frames = scheduler.set_clear_threshold((current + delta as i64).max(0) as u32);
            log::info!("Text clear threshold: {} frames", frames);
        }
        ControlEvent::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn handle_source_event(event: SourceEvent, scheduler: &mut Scheduler) -> Result<(), AppError> {
    match event {
        SourceEvent::MetadataLoaded(info) => {
            log::debug!("Source ready: {}", info);
        }
        SourceEvent::Ended => {
            scheduler.pause();
        }
        SourceEvent::Failed(message) => {
            scheduler.pause();
            return Err(AppError::Playback(message));
        }
    }
    Ok(())
}

/// Rebuild the interval whenever the scheduler's timer generation changes.
fn sync_timer(desired: Option<Timer>, ticker: &mut Option<ActiveTimer>) {
    match (desired, ticker.as_ref()) {
        (None, _) => *ticker = None,
        (Some(timer), Some(active)) if active.generation == timer.generation => {}
        (Some(timer), _) => {
            // First firing is one full period after start
            let mut interval = interval_at(Instant::now() + timer.period, timer.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            *ticker = Some(ActiveTimer {
                generation: timer.generation,
                interval,
            });
        }
    }
}

async fn next_tick(ticker: &mut Option<ActiveTimer>) {
    match ticker {
        Some(active) => {
            active.interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Forward terminal key presses to the control channel.
///
/// The task ends when the terminal event stream ends or the receiver is dropped.
pub fn spawn_keyboard_reader(tx: UnboundedSender<ControlEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = EventStream::new();
        while let Some(event) = events.next().await {
            match event {
                Ok(Event::Key(key)) => {
                    if let Some(control) = handle_key_event(key) {
                        if tx.send(control).is_err() {
                            break;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Terminal input error: {}", e);
                    let _ = tx.send(ControlEvent::Quit);
                    break;
                }
            }
        }
    })
}

/// Turn SIGINT into a `Quit` control event (used when stdin isn't a terminal).
pub fn install_ctrlc_handler(tx: UnboundedSender<ControlEvent>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let _ = tx.send(ControlEvent::Quit);
    })
}
