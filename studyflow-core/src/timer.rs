//! Pomodoro countdown engine.
//!
//! Four live states: work/break crossed with running/paused. The engine owns
//! an explicit recurring one-second [`Ticker`]; stopping the engine (or
//! dropping it) cancels any pending tick, so nothing fires after teardown.
//! Session completion is reported as a [`SessionCompleted`] event for the
//! caller to render; the engine itself never talks to the UI.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::store::{PersistenceStore, StorageBackend, StoreError};

pub const WORK_SECS: u32 = 25 * 60;
pub const BREAK_SECS: u32 = 5 * 60;

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    pub fn duration_secs(self) -> u32 {
        match self {
            SessionKind::Work => WORK_SECS,
            SessionKind::Break => BREAK_SECS,
        }
    }

    pub fn flip(self) -> SessionKind {
        match self {
            SessionKind::Work => SessionKind::Break,
            SessionKind::Break => SessionKind::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::Break => "Break",
        }
    }

    /// Hours added to `totalHours` when a session of this kind finishes.
    pub fn hours_credit(self) -> f64 {
        match self {
            SessionKind::Work => 0.25,
            SessionKind::Break => 0.05,
        }
    }
}

/// Emitted when a countdown reaches zero, naming the finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCompleted {
    pub kind: SessionKind,
}

/// Explicit recurring timer. Armed with [`start`](Ticker::start), it fires
/// once per period until [`stop`](Ticker::stop); `poll` reports how many
/// periods elapsed since the last call and re-arms for the next one.
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of periods that elapsed up to `now`. Returns 0 while stopped.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }
}

/// The countdown state machine.
pub struct TimerEngine {
    session: SessionKind,
    time_left: u32,
    running: bool,
    ticker: Ticker,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// Starts paused at the top of a work session.
    pub fn new() -> Self {
        Self {
            session: SessionKind::Work,
            time_left: WORK_SECS,
            running: false,
            ticker: Ticker::new(TICK_PERIOD),
        }
    }

    pub fn session(&self) -> SessionKind {
        self.session
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fraction of the current session already elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let total = self.session.duration_secs();
        f64::from(total - self.time_left) / f64::from(total)
    }

    /// Start/pause. Arms or cancels the ticker; `time_left` is untouched.
    pub fn toggle(&mut self, now: Instant) {
        self.running = !self.running;
        if self.running {
            self.ticker.start(now);
        } else {
            self.ticker.stop();
        }
    }

    /// Back to the top of the current session kind, paused. Stats are never
    /// touched here.
    pub fn reset(&mut self) {
        self.running = false;
        self.ticker.stop();
        self.time_left = self.session.duration_secs();
    }

    /// Drives the countdown from wall-clock time; called from the event
    /// loop. Applies every tick the ticker reports due.
    pub fn poll<B: StorageBackend>(
        &mut self,
        now: Instant,
        store: &mut PersistenceStore<B>,
    ) -> Result<Option<SessionCompleted>, StoreError> {
        for _ in 0..self.ticker.poll(now) {
            if let Some(done) = self.tick(store)? {
                return Ok(Some(done));
            }
        }
        Ok(None)
    }

    /// One one-second step. On hitting zero: pause, credit the stats slot,
    /// flip the session kind and reload its default duration.
    pub fn tick<B: StorageBackend>(
        &mut self,
        store: &mut PersistenceStore<B>,
    ) -> Result<Option<SessionCompleted>, StoreError> {
        if !self.running || self.time_left == 0 {
            return Ok(None);
        }
        self.time_left -= 1;
        if self.time_left > 0 {
            return Ok(None);
        }

        self.running = false;
        self.ticker.stop();
        let finished = self.session;
        let mut stats = store.load_stats()?;
        stats.record_session(finished);
        store.save_stats(&stats)?;
        self.session = finished.flip();
        self.time_left = self.session.duration_secs();
        debug!(kind = finished.label(), "session completed");
        Ok(Some(SessionCompleted { kind: finished }))
    }
}

/// `MM:SS`, both zero-padded; minutes run past 59 without rolling into hours.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

    fn store() -> PersistenceStore<MemoryBackend> {
        PersistenceStore::new(MemoryBackend::default())
    }

    fn tick_n(
        engine: &mut TimerEngine,
        store: &mut PersistenceStore<MemoryBackend>,
        n: u32,
    ) -> Option<SessionCompleted> {
        let mut last = None;
        for _ in 0..n {
            if let Some(done) = engine.tick(store).unwrap() {
                last = Some(done);
            }
        }
        last
    }

    #[test]
    fn starts_paused_at_a_full_work_session() {
        let engine = TimerEngine::new();
        assert_eq!(engine.session(), SessionKind::Work);
        assert_eq!(engine.time_left(), 1500);
        assert!(!engine.is_running());
    }

    #[test]
    fn toggle_starts_and_pauses_without_touching_time() {
        let mut engine = TimerEngine::new();
        let now = Instant::now();
        engine.toggle(now);
        assert!(engine.is_running());
        engine.toggle(now);
        assert!(!engine.is_running());
        assert_eq!(engine.time_left(), 1500);
    }

    #[test]
    fn ticks_are_ignored_while_paused() {
        let mut engine = TimerEngine::new();
        let mut store = store();
        assert!(tick_n(&mut engine, &mut store, 10).is_none());
        assert_eq!(engine.time_left(), 1500);
    }

    #[test]
    fn work_session_completes_into_a_paused_break() {
        let mut engine = TimerEngine::new();
        let mut store = store();
        engine.toggle(Instant::now());

        let done = tick_n(&mut engine, &mut store, 1500).unwrap();
        assert_eq!(done.kind, SessionKind::Work);
        assert_eq!(engine.session(), SessionKind::Break);
        assert_eq!(engine.time_left(), 300);
        assert!(!engine.is_running());

        let stats = store.load_stats().unwrap();
        assert_eq!(stats.sessions_completed, 1);
        assert!((stats.total_hours - 0.25).abs() < 1e-9);
    }

    #[test]
    fn break_session_completes_into_a_paused_work_session() {
        let mut engine = TimerEngine::new();
        let mut store = store();
        engine.toggle(Instant::now());
        tick_n(&mut engine, &mut store, 1500);

        engine.toggle(Instant::now());
        let done = tick_n(&mut engine, &mut store, 300).unwrap();
        assert_eq!(done.kind, SessionKind::Break);
        assert_eq!(engine.session(), SessionKind::Work);
        assert_eq!(engine.time_left(), 1500);
        assert!(!engine.is_running());

        let stats = store.load_stats().unwrap();
        assert_eq!(stats.sessions_completed, 2);
        assert!((stats.total_hours - 0.30).abs() < 1e-9);
    }

    #[test]
    fn reset_restores_the_current_session_default() {
        let mut engine = TimerEngine::new();
        let mut store = store();
        engine.toggle(Instant::now());
        tick_n(&mut engine, &mut store, 758);
        assert_eq!(engine.time_left(), 742);

        engine.reset();
        assert_eq!(engine.session(), SessionKind::Work);
        assert_eq!(engine.time_left(), 1500);
        assert!(!engine.is_running());

        // Same during a break, which reset must not flip back to work.
        tick_n(&mut engine, &mut store, 0);
        engine.toggle(Instant::now());
        tick_n(&mut engine, &mut store, 1500);
        engine.toggle(Instant::now());
        tick_n(&mut engine, &mut store, 182);
        assert_eq!(engine.time_left(), 118);
        engine.reset();
        assert_eq!(engine.session(), SessionKind::Break);
        assert_eq!(engine.time_left(), 300);
        assert!(!engine.is_running());
    }

    #[test]
    fn reset_never_touches_stats() {
        let mut engine = TimerEngine::new();
        let mut store = store();
        engine.toggle(Instant::now());
        tick_n(&mut engine, &mut store, 100);
        engine.reset();
        assert_eq!(store.load_stats().unwrap(), crate::Stats::default());
    }

    #[test]
    fn ticker_cadence() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let t0 = Instant::now();
        assert!(!ticker.is_armed());
        assert_eq!(ticker.poll(t0 + Duration::from_secs(5)), 0);

        ticker.start(t0);
        assert_eq!(ticker.poll(t0 + Duration::from_millis(900)), 0);
        assert_eq!(ticker.poll(t0 + Duration::from_millis(1100)), 1);
        // Catches up when polled late.
        assert_eq!(ticker.poll(t0 + Duration::from_millis(4500)), 3);
    }

    #[test]
    fn stopped_ticker_never_fires() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let t0 = Instant::now();
        ticker.start(t0);
        ticker.stop();
        assert!(!ticker.is_armed());
        assert_eq!(ticker.poll(t0 + Duration::from_secs(60)), 0);
    }

    #[test]
    fn poll_drives_ticks_from_wall_clock() {
        let mut engine = TimerEngine::new();
        let mut store = store();
        let t0 = Instant::now();
        engine.toggle(t0);
        engine
            .poll(t0 + Duration::from_millis(3200), &mut store)
            .unwrap();
        assert_eq!(engine.time_left(), 1497);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(3600), "60:00");
        assert_eq!(format_time(1500), "25:00");
    }
}
