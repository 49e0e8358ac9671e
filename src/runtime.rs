//! The single-task event loop driving the engine.
//!
//! DESIGN
//! ======
//! One Tokio task owns the whole engine and `select!`s over host input,
//! inbound bus payloads, and the two periodic timers (expiry sweep,
//! emission sampler). Everything interleaves on that task, so the engine
//! needs no locks. Both intervals use delayed missed-tick behavior: under
//! lag the sampler keeps its steady rate instead of bursting a backlog of
//! reactions onto the canvas.
//!
//! LIFECYCLE
//! =========
//! 1. [`spawn`] moves the engine into the loop task
//! 2. The host sends [`InputEvent`]s through [`LiveHandle::sender`] and
//!    forwards raw bus payloads to the remote channel
//! 3. Closing the input channel (or [`LiveHandle::shutdown`]) exits the
//!    loop, which drops both intervals and the engine
//!
//! Nothing in the loop blocks, so teardown needs no explicit cancellation
//! of in-flight work.

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::consts::{SAMPLE_INTERVAL_MS, SWEEP_INTERVAL_MS};
use crate::cursor::{Key, MenuAction};
use crate::engine::LiveEngine;
use crate::geometry::Point;
use crate::threads::ThreadId;

/// Bounded capacity of the host input queue.
const INPUT_QUEUE_CAPACITY: usize = 256;

/// Timing knobs for the periodic tasks, overridable via environment
/// variables. Unparseable values fall back to the compiled defaults.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Period of the reaction expiry sweep.
    pub sweep_interval: Duration,
    /// Period of the emission sampler.
    pub sample_interval: Duration,
}

impl RuntimeConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            sweep_interval: Duration::from_millis(env_parse("REACTION_SWEEP_INTERVAL_MS", SWEEP_INTERVAL_MS)),
            sample_interval: Duration::from_millis(env_parse("REACTION_SAMPLE_INTERVAL_MS", SAMPLE_INTERVAL_MS)),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(SWEEP_INTERVAL_MS),
            sample_interval: Duration::from_millis(SAMPLE_INTERVAL_MS),
        }
    }
}

/// Host input delivered to the live loop.
#[derive(Debug, Clone)]
pub enum InputEvent {
    PointerMove(Point),
    PointerDown(Point),
    PointerUp,
    PointerLeave,
    KeyUp(Key),
    MenuAction(MenuAction),
    SelectGlyph(String),
    ChatInput(String),
    ChatSubmit,
    FocusThread(ThreadId),
    SetThreadResolved { id: ThreadId, resolved: bool },
}

/// Handle to a spawned live loop.
pub struct LiveHandle {
    events: mpsc::Sender<InputEvent>,
    task: JoinHandle<()>,
}

impl LiveHandle {
    /// A sender for host input events. Cloneable; the loop exits once all
    /// senders are dropped.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<InputEvent> {
        self.events.clone()
    }

    /// Close the input channel and wait for the loop to exit.
    pub async fn shutdown(self) {
        drop(self.events);
        if let Err(err) = self.task.await {
            warn!(%err, "live loop join failed");
        }
    }
}

/// Spawn the live loop. `remote` carries raw inbound bus payloads; the
/// host's bus adapter pushes every received ephemeral event there.
#[must_use]
pub fn spawn(
    engine: LiveEngine,
    remote: mpsc::Receiver<serde_json::Value>,
    config: RuntimeConfig,
) -> LiveHandle {
    let (events, events_rx) = mpsc::channel(INPUT_QUEUE_CAPACITY);
    let task = tokio::spawn(run_loop(engine, events_rx, remote, config));
    LiveHandle { events, task }
}

async fn run_loop(
    mut engine: LiveEngine,
    mut events: mpsc::Receiver<InputEvent>,
    mut remote: mpsc::Receiver<serde_json::Value>,
    config: RuntimeConfig,
) {
    // First tick lands one full period after mount, matching the steady
    // cadence rather than firing immediately.
    let start = tokio::time::Instant::now();
    let mut sweep = tokio::time::interval_at(start + config.sweep_interval, config.sweep_interval);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sample = tokio::time::interval_at(start + config.sample_interval, config.sample_interval);
    sample.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        sweep_ms = config.sweep_interval.as_millis() as u64,
        sample_ms = config.sample_interval.as_millis() as u64,
        "live loop started"
    );

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                dispatch(&mut engine, event);
            }
            Some(payload) = remote.recv() => {
                engine.on_remote_event(&payload, now_ms());
            }
            _ = sweep.tick() => engine.sweep_tick(now_ms()),
            _ = sample.tick() => engine.sample_tick(now_ms()),
        }
    }

    info!("live loop stopped");
}

fn dispatch(engine: &mut LiveEngine, event: InputEvent) {
    match event {
        InputEvent::PointerMove(point) => engine.on_pointer_move(point),
        InputEvent::PointerDown(point) => engine.on_pointer_down(point),
        InputEvent::PointerUp => engine.on_pointer_up(),
        InputEvent::PointerLeave => engine.on_pointer_leave(),
        InputEvent::KeyUp(key) => engine.on_key_up(&key),
        InputEvent::MenuAction(action) => engine.on_menu_action(action),
        InputEvent::SelectGlyph(glyph) => engine.select_glyph(&glyph),
        InputEvent::ChatInput(text) => engine.chat_input(&text),
        InputEvent::ChatSubmit => engine.chat_submit(),
        InputEvent::FocusThread(id) => engine.focus_thread(id),
        InputEvent::SetThreadResolved { id, resolved } => engine.set_thread_resolved(id, resolved),
    }
}

/// Current time as milliseconds since the Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
