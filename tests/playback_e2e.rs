//! End-to-end tests of the event loop with a still source, an in-memory
//! console and tokio's paused clock.
//!
//! Control events are sent from a spawned task at fixed offsets; with the
//! clock paused, time only advances when every task is idle, so tick counts
//! are exact.

use std::time::Duration;

use console_mosaic::console::MemoryConsole;
use console_mosaic::error::AppError;
use console_mosaic::event_loop;
use console_mosaic::input::ControlEvent;
use console_mosaic::scheduler::{OutputMode, RenderState, Scheduler};
use console_mosaic::source::{Frame, PlaybackSource, SourceEvent, StillSource, VideoInfo};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::sleep;

fn still() -> StillSource {
    let data = [120u8, 80, 40, 255].repeat(32 * 18);
    StillSource::new(Frame::from_rgba(data, 32, 18).unwrap())
}

fn scheduler() -> Scheduler {
    let state = RenderState {
        sample_width: 16,
        ..RenderState::default()
    };
    Scheduler::new(state, 32)
}

/// Send each event after waiting its delay (relative to the previous one).
fn script(tx: UnboundedSender<ControlEvent>, steps: Vec<(u64, ControlEvent)>) {
    tokio::spawn(async move {
        for (delay_ms, event) in steps {
            sleep(Duration::from_millis(delay_ms)).await;
            if tx.send(event).is_err() {
                break;
            }
        }
    });
}

#[tokio::test(start_paused = true)]
async fn test_image_ticks_every_100ms() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (_source_tx, source_rx) = mpsc::unbounded_channel();

    script(
        control_tx,
        vec![(0, ControlEvent::Play), (350, ControlEvent::Quit)],
    );

    event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap();

    // Ticks at 100, 200 and 300ms; only the first clears
    assert_eq!(console.images(), 3);
    assert_eq!(console.clears, 1);
    assert_eq!(console.total_logged, 4);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticks() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (_source_tx, source_rx) = mpsc::unbounded_channel();

    script(
        control_tx,
        vec![
            (0, ControlEvent::Play),
            (250, ControlEvent::Pause),
            (500, ControlEvent::Quit),
        ],
    );

    event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap();

    assert_eq!(console.images(), 2);
    assert!(scheduler.timer().is_none());
    assert!(source.is_paused());
}

#[tokio::test(start_paused = true)]
async fn test_toggle_playback_resumes() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (_source_tx, source_rx) = mpsc::unbounded_channel();

    script(
        control_tx,
        vec![
            (0, ControlEvent::TogglePlayback),
            (150, ControlEvent::TogglePlayback),
            (1000, ControlEvent::TogglePlayback),
            (250, ControlEvent::Quit),
        ],
    );

    event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap();

    // One tick before the pause, two after resuming
    assert_eq!(console.images(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_switch_to_text_mid_playback() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (_source_tx, source_rx) = mpsc::unbounded_channel();

    script(
        control_tx,
        vec![
            (0, ControlEvent::Play),
            (150, ControlEvent::SetMode(OutputMode::Text)),
            (650, ControlEvent::Quit),
        ],
    );

    event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap();

    // Image tick at 100ms; switch at 150ms clears; text ticks at 450 and 750ms
    assert_eq!(scheduler.state().output_mode, OutputMode::Text);
    assert_eq!(console.clears, 3);
    assert_eq!(console.styled(), 2);
    assert_eq!(console.images(), 0);
    assert_eq!(console.total_logged, 5);
}

#[tokio::test(start_paused = true)]
async fn test_switch_mode_while_paused_stays_silent() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (_source_tx, source_rx) = mpsc::unbounded_channel();

    script(
        control_tx,
        vec![
            (0, ControlEvent::ToggleMode),
            (1000, ControlEvent::Quit),
        ],
    );

    event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap();

    assert_eq!(scheduler.state().output_mode, OutputMode::Text);
    assert_eq!(console.clears, 1);
    assert_eq!(console.total_logged, 0);
}

#[tokio::test(start_paused = true)]
async fn test_source_end_stops_scheduler() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (source_tx, source_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        source_tx
            .send(SourceEvent::MetadataLoaded(VideoInfo {
                width: 32,
                height: 18,
                fps: 0.0,
            }))
            .unwrap();
        sleep(Duration::from_millis(250)).await;
        source_tx.send(SourceEvent::Ended).unwrap();
    });
    script(
        control_tx,
        vec![(0, ControlEvent::Play), (1000, ControlEvent::Quit)],
    );

    event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap();

    assert_eq!(console.images(), 2);
    assert!(scheduler.timer().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_source_failure_ends_session() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (_control_tx, control_rx) = mpsc::unbounded_channel();
    let (source_tx, source_rx) = mpsc::unbounded_channel();

    source_tx
        .send(SourceEvent::Failed("decoder crashed".to_string()))
        .unwrap();

    let err = event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Playback(ref m) if m == "decoder crashed"));
}

#[tokio::test(start_paused = true)]
async fn test_adjust_controls_update_state() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (_source_tx, source_rx) = mpsc::unbounded_channel();

    script(
        control_tx,
        vec![
            (0, ControlEvent::AdjustSampleWidth(10)),
            (0, ControlEvent::AdjustClearThreshold(-50)),
            (0, ControlEvent::Quit),
        ],
    );

    event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap();

    assert_eq!(scheduler.state().sample_width, 26);
    assert_eq!(scheduler.state().text_clear_threshold, 1);
}

#[tokio::test(start_paused = true)]
async fn test_closed_control_channel_ends_loop() {
    let mut source = still();
    let mut scheduler = scheduler();
    let mut console = MemoryConsole::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel::<ControlEvent>();
    let (_source_tx, source_rx) = mpsc::unbounded_channel();
    drop(control_tx);

    event_loop::run(&mut source, &mut scheduler, &mut console, control_rx, source_rx)
        .await
        .unwrap();
    assert_eq!(console.total_logged, 0);
}
