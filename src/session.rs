//! Typing session engine.
//!
//! A [`Session`] is a plain value. Every transition consumes the current
//! session and returns the next one, so callers never observe a half-updated
//! state. Metrics are derived from the fields on demand.

use crate::metrics::Metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    /// No reference text loaded
    Empty,
    /// Reference loaded, waiting for start
    Ready,
    Running,
    /// Typed text matched the reference exactly
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    reference: String,
    typed: String,
    elapsed_secs: u64,
    running: bool,
    cursor: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(text: impl Into<String>) -> Self {
        Self::new().load_reference(text)
    }

    /// Replace the reference text, discarding any session in progress.
    pub fn load_reference(self, text: impl Into<String>) -> Self {
        let reference = text.into();
        if self.running {
            tracing::info!("reference replaced mid-session, stopping");
        }
        tracing::debug!(chars = reference.chars().count(), "reference loaded");
        Self {
            reference,
            ..Self::default()
        }
    }

    pub fn start(self) -> Self {
        if !self.can_start() {
            return self;
        }
        tracing::info!(
            chars = self.reference.chars().count(),
            "session started"
        );
        Self {
            typed: String::new(),
            elapsed_secs: 0,
            cursor: 0,
            running: true,
            ..self
        }
    }

    /// One second of wall time passed.
    pub fn tick(self) -> Self {
        if !self.running {
            return self;
        }
        Self {
            elapsed_secs: self.elapsed_secs + 1,
            ..self
        }
    }

    /// Take a new snapshot of the entry surface.
    pub fn apply_input(self, typed: impl Into<String>, cursor: usize) -> Self {
        if !self.running {
            return self;
        }
        let typed = typed.into();
        let cursor = cursor.min(typed.chars().count());
        let running = typed != self.reference;

        if !running {
            let metrics = Metrics::compute(&self.reference, &typed, self.elapsed_secs);
            tracing::info!(
                elapsed_secs = self.elapsed_secs,
                wpm = metrics.wpm,
                accuracy = metrics.accuracy,
                "session finished"
            );
        }

        Self {
            typed,
            cursor,
            running,
            ..self
        }
    }

    /// Move the caret without changing the typed text.
    pub fn move_cursor(self, cursor: usize) -> Self {
        if !self.running {
            return self;
        }
        let cursor = cursor.min(self.typed_len());
        Self { cursor, ..self }
    }

    pub fn reset(self) -> Self {
        if self.running {
            tracing::info!(elapsed_secs = self.elapsed_secs, "session reset");
        }
        Self {
            typed: String::new(),
            elapsed_secs: 0,
            running: false,
            cursor: 0,
            ..self
        }
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::compute(&self.reference, &self.typed, self.elapsed_secs)
    }

    pub fn can_start(&self) -> bool {
        !self.running && !self.reference.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        !self.reference.is_empty() && self.typed == self.reference
    }

    pub fn phase(&self) -> Phase {
        if self.reference.is_empty() {
            Phase::Empty
        } else if self.running {
            Phase::Running
        } else if self.is_complete() {
            Phase::Finished
        } else {
            Phase::Ready
        }
    }

    /// Fraction of the reference covered by typed text, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let total = self.reference_len();
        if total == 0 {
            return 0.0;
        }
        (self.typed_len().min(total) as f64) / total as f64
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn reference_len(&self) -> usize {
        self.reference.chars().count()
    }

    pub fn typed_len(&self) -> usize {
        self.typed.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(reference: &str) -> Session {
        Session::with_reference(reference).start()
    }

    #[test]
    fn test_new_session_is_empty() {
        let s = Session::new();
        assert_eq!(s.phase(), Phase::Empty);
        assert!(!s.can_start());
        assert_eq!(s.metrics(), Metrics::default());
    }

    #[test]
    fn test_start_requires_reference() {
        let s = Session::new().start();
        assert!(!s.is_running());
        assert_eq!(s.phase(), Phase::Empty);

        let s = Session::with_reference("").start();
        assert!(!s.is_running());
    }

    #[test]
    fn test_start_clears_previous_attempt() {
        let s = running("hello").apply_input("hex", 3).tick().tick();
        let s = s.reset().start();

        assert!(s.is_running());
        assert_eq!(s.typed(), "");
        assert_eq!(s.elapsed_secs(), 0);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let s = running("hello").apply_input("he", 2).tick();
        let again = s.clone().start();
        assert_eq!(s, again);
    }

    #[test]
    fn test_tick_only_counts_while_running() {
        let s = Session::with_reference("abc").tick();
        assert_eq!(s.elapsed_secs(), 0);

        let s = s.start().tick().tick();
        assert_eq!(s.elapsed_secs(), 2);
    }

    #[test]
    fn test_apply_input_ignored_when_not_running() {
        let s = Session::with_reference("abc").apply_input("ab", 2);
        assert_eq!(s.typed(), "");
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_apply_input_clamps_cursor() {
        let s = running("abcdef").apply_input("ab", 10);
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn test_wpm_zero_before_first_tick() {
        let s = running(&"x".repeat(100)).apply_input("x".repeat(40), 40);
        assert_eq!(s.metrics().wpm, 0);
    }

    #[test]
    fn test_wpm_after_one_minute() {
        let mut s = running(&"x".repeat(100));
        for _ in 0..60 {
            s = s.tick();
        }
        let s = s.apply_input("x".repeat(25), 25);
        assert_eq!(s.metrics().wpm, 5);
    }

    #[test]
    fn test_accuracy_partial_match() {
        let s = running("abcd").apply_input("abd", 3);
        assert_eq!(s.metrics().accuracy, 67);
    }

    #[test]
    fn test_accuracy_defaults_to_100_with_empty_input() {
        let s = running("abc").apply_input("ab", 2).apply_input("", 0);
        assert_eq!(s.metrics().accuracy, 100);
    }

    #[test]
    fn test_completion_stops_session() {
        let s = running("hi").tick().apply_input("hi", 2);

        assert!(!s.is_running());
        assert!(s.is_complete());
        assert_eq!(s.phase(), Phase::Finished);
        let final_metrics = s.metrics();

        let s = s.tick().tick().apply_input("h", 1);
        assert_eq!(s.elapsed_secs(), 1);
        assert_eq!(s.typed(), "hi");
        assert_eq!(s.metrics(), final_metrics);
    }

    #[test]
    fn test_overtyping_does_not_complete() {
        let s = running("hi").apply_input("hi!", 3);
        assert!(s.is_running());
        assert!(!s.is_complete());
    }

    #[test]
    fn test_reset_from_any_state() {
        let states = [
            Session::new(),
            Session::with_reference("abc"),
            running("abc").apply_input("ab", 1).tick(),
            running("abc").apply_input("abc", 3),
        ];

        for s in states {
            let s = s.reset();
            assert_eq!(s.typed(), "");
            assert_eq!(s.elapsed_secs(), 0);
            assert_eq!(s.metrics().wpm, 0);
            assert_eq!(s.metrics().accuracy, 100);
            assert!(!s.is_running());
            assert_eq!(s.cursor(), 0);
        }
    }

    #[test]
    fn test_reset_keeps_reference() {
        let s = running("abc").reset();
        assert_eq!(s.reference(), "abc");
        assert!(s.can_start());
    }

    #[test]
    fn test_load_reference_while_running_stops_session() {
        let s = running("abc").apply_input("ax", 2).tick().tick();
        let s = s.load_reference("something else");

        assert!(!s.is_running());
        assert_eq!(s.reference(), "something else");
        assert_eq!(s.typed(), "");
        assert_eq!(s.elapsed_secs(), 0);
        assert_eq!(s.metrics(), Metrics::default());
        assert_eq!(s.phase(), Phase::Ready);
    }

    #[test]
    fn test_move_cursor() {
        let s = running("abcdef").apply_input("abc", 3).move_cursor(1);
        assert_eq!(s.cursor(), 1);
        let s = s.move_cursor(99);
        assert_eq!(s.cursor(), 3);

        let idle = Session::with_reference("abc").move_cursor(2);
        assert_eq!(idle.cursor(), 0);
    }

    #[test]
    fn test_progress() {
        assert_eq!(Session::new().progress(), 0.0);
        let s = running("abcd").apply_input("ab", 2);
        assert_eq!(s.progress(), 0.5);
        let s = s.apply_input("abcdzz", 6);
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Running.to_string(), "Running");
        assert_eq!(Phase::Finished.to_string(), "Finished");
    }
}
