//! Simulated media backend
//!
//! A headless backend that keeps every handle's state and an event log in
//! memory. Playheads only move when [`SimulatedBackend::advance`] is called.
//! Open and start failures can be injected per URL pattern, and starts can
//! be held behind a gate to exercise late completions.

use crate::engine::media::{MediaBackend, MediaHandle};
use crate::error::{Result, SceneError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Something that happened to a simulated handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    Opened { handle: usize, url: String },
    Played { handle: usize },
    StartFailed { handle: usize },
    Paused { handle: usize },
    Rewound { handle: usize },
    Muted { handle: usize, muted: bool },
    Closed { handle: usize },
}

/// Snapshot of one simulated handle
#[derive(Debug, Clone, PartialEq)]
pub struct HandleState {
    pub url: String,
    pub gain: f32,
    pub muted: bool,
    pub looping: bool,
    pub playing: bool,
    pub position: Duration,
    pub closed: bool,

    /// Number of `play` calls made on this handle
    pub starts: usize,
}

#[derive(Debug, Default)]
struct SimState {
    handles: Vec<HandleState>,
    events: Vec<MediaEvent>,
    fail_open: Vec<String>,
    fail_start: Vec<String>,
    first_start_delay: Option<Duration>,
}

impl SimState {
    fn matches(patterns: &[String], url: &str) -> bool {
        patterns.iter().any(|p| url.contains(p.as_str()))
    }
}

/// In-memory media backend
#[derive(Clone, Default)]
pub struct SimulatedBackend {
    state: Arc<Mutex<SimState>>,
    gate: Option<Arc<watch::Sender<bool>>>,
}

impl SimulatedBackend {
    /// Backend whose starts settle as soon as they are polled
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose starts wait until [`open_gate`](Self::open_gate)
    pub fn gated() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            gate: Some(Arc::new(tx)),
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail `open` for URLs containing `pattern`
    pub fn fail_opens_for(&self, pattern: impl Into<String>) {
        self.lock().fail_open.push(pattern.into());
    }

    /// Fail `play` for URLs containing `pattern`
    pub fn fail_starts_for(&self, pattern: impl Into<String>) {
        self.lock().fail_start.push(pattern.into());
    }

    /// Make the first `play` of every handle settle `delay` later than the rest
    pub fn slow_first_start(&self, delay: Duration) {
        self.lock().first_start_delay = Some(delay);
    }

    /// Let every held start proceed
    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.send_replace(true);
        }
    }

    /// Move the playhead of every playing handle forward
    pub fn advance(&self, by: Duration) {
        for handle in self.lock().handles.iter_mut() {
            if handle.playing && !handle.closed {
                handle.position += by;
            }
        }
    }

    /// Number of handles ever opened
    pub fn opened(&self) -> usize {
        self.lock().handles.len()
    }

    /// Number of handles opened and not yet closed
    pub fn live_handles(&self) -> usize {
        self.lock().handles.iter().filter(|h| !h.closed).count()
    }

    pub fn handle_state(&self, handle: usize) -> Option<HandleState> {
        self.lock().handles.get(handle).cloned()
    }

    pub fn handle_states(&self) -> Vec<HandleState> {
        self.lock().handles.clone()
    }

    /// Full event log in order
    pub fn events(&self) -> Vec<MediaEvent> {
        self.lock().events.clone()
    }
}

impl MediaBackend for SimulatedBackend {
    fn open(&self, url: &str) -> Result<Arc<dyn MediaHandle>> {
        let mut state = self.lock();
        if SimState::matches(&state.fail_open, url) {
            return Err(SceneError::MediaOpen {
                url: url.to_string(),
                reason: "simulated open failure".to_string(),
            });
        }

        let id = state.handles.len();
        state.handles.push(HandleState {
            url: url.to_string(),
            gain: 1.0,
            muted: false,
            looping: false,
            playing: false,
            position: Duration::ZERO,
            closed: false,
            starts: 0,
        });
        state.events.push(MediaEvent::Opened {
            handle: id,
            url: url.to_string(),
        });

        Ok(Arc::new(SimulatedHandle {
            id,
            state: Arc::clone(&self.state),
            gate: self.gate.as_ref().map(|g| g.subscribe()),
        }))
    }
}

struct SimulatedHandle {
    id: usize,
    state: Arc<Mutex<SimState>>,
    gate: Option<watch::Receiver<bool>>,
}

impl SimulatedHandle {
    fn with<R>(&self, f: impl FnOnce(&mut HandleState, &mut Vec<MediaEvent>) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let SimState {
            handles, events, ..
        } = &mut *guard;
        f(&mut handles[self.id], events)
    }
}

#[async_trait]
impl MediaHandle for SimulatedHandle {
    fn set_volume(&self, gain: f32) {
        self.with(|h, _| h.gain = gain);
    }

    fn set_muted(&self, muted: bool) {
        let id = self.id;
        self.with(|h, events| {
            h.muted = muted;
            events.push(MediaEvent::Muted { handle: id, muted });
        });
    }

    fn set_looping(&self, looping: bool) {
        self.with(|h, _| h.looping = looping);
    }

    async fn play(&self) -> Result<()> {
        if let Some(gate) = &self.gate {
            let mut gate = gate.clone();
            // Sender is owned by the backend; a closed gate just lets us through
            let _ = gate.wait_for(|open| *open).await;
        }

        let delay = {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let first_start_delay = guard.first_start_delay;
            let handle = &mut guard.handles[self.id];
            handle.starts += 1;
            first_start_delay.filter(|_| handle.starts == 1)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let fail = SimState::matches(&guard.fail_start, &guard.handles[self.id].url);
        let SimState {
            handles, events, ..
        } = &mut *guard;
        let handle = &mut handles[self.id];

        if handle.closed || fail {
            events.push(MediaEvent::StartFailed { handle: self.id });
            return Err(SceneError::MediaPlayback {
                channel: handle.url.clone(),
                reason: if handle.closed {
                    "handle closed".to_string()
                } else {
                    "simulated decode failure".to_string()
                },
            });
        }

        handle.playing = true;
        events.push(MediaEvent::Played { handle: self.id });
        Ok(())
    }

    fn pause(&self) {
        let id = self.id;
        self.with(|h, events| {
            h.playing = false;
            events.push(MediaEvent::Paused { handle: id });
        });
    }

    fn seek_to_start(&self) {
        let id = self.id;
        self.with(|h, events| {
            h.position = Duration::ZERO;
            events.push(MediaEvent::Rewound { handle: id });
        });
    }

    fn position(&self) -> Duration {
        self.with(|h, _| h.position)
    }

    fn close(&self) {
        let id = self.id;
        self.with(|h, events| {
            h.playing = false;
            h.closed = true;
            events.push(MediaEvent::Closed { handle: id });
        });
    }
}
