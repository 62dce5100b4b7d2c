//! Typewriter-style incremental reveal of a piece of text.
//!
//! A task is tied to the content it was started with. Handing it different
//! content restarts the reveal from the beginning; cancelling it freezes the
//! visible prefix and stops further ticks.

use std::time::Duration;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealCadence {
    pub chars_per_tick: usize,
    pub tick: Duration,
}

impl Default for RevealCadence {
    fn default() -> Self {
        Self {
            chars_per_tick: 3,
            tick: Duration::from_millis(20),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RevealTask {
    text: String,
    total_chars: usize,
    shown_chars: usize,
    cadence: RevealCadence,
    next_tick_at: Instant,
    cancelled: bool,
}

impl RevealTask {
    pub fn start(text: impl Into<String>, cadence: RevealCadence, now: Instant) -> Self {
        let text = text.into();
        let total_chars = text.chars().count();
        Self {
            text,
            total_chars,
            shown_chars: 0,
            cadence: RevealCadence {
                chars_per_tick: cadence.chars_per_tick.max(1),
                tick: cadence.tick,
            },
            next_tick_at: now,
            cancelled: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.text
    }

    /// Restarts the reveal if `text` differs from the current content.
    pub fn retarget(&mut self, text: &str, now: Instant) -> bool {
        if self.text == text {
            return false;
        }
        *self = Self::start(text, self.cadence, now);
        true
    }

    /// Advances by every tick that has elapsed since the last poll.
    ///
    /// Returns `true` when the visible prefix grew.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.cancelled || self.is_complete() || now < self.next_tick_at {
            return false;
        }
        let elapsed = now.saturating_duration_since(self.next_tick_at);
        let ticks = if self.cadence.tick.is_zero() {
            self.total_chars
        } else {
            (elapsed.as_nanos() / self.cadence.tick.as_nanos()) as usize + 1
        };
        let before = self.shown_chars;
        self.shown_chars = self
            .shown_chars
            .saturating_add(ticks.saturating_mul(self.cadence.chars_per_tick))
            .min(self.total_chars);
        self.next_tick_at = now + self.cadence.tick;
        self.shown_chars > before
    }

    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.shown_chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.shown_chars >= self.total_chars
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled && !self.is_complete()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cadence() -> RevealCadence {
        RevealCadence {
            chars_per_tick: 2,
            tick: Duration::from_millis(10),
        }
    }

    #[test]
    fn prefix_grows_each_tick() {
        let t0 = Instant::now();
        let mut task = RevealTask::start("hello", cadence(), t0);
        assert_eq!(task.visible(), "");

        assert!(task.poll(t0));
        assert_eq!(task.visible(), "he");

        assert!(!task.poll(t0 + Duration::from_millis(5)));
        assert_eq!(task.visible(), "he");

        assert!(task.poll(t0 + Duration::from_millis(10)));
        assert_eq!(task.visible(), "hell");

        assert!(task.poll(t0 + Duration::from_millis(20)));
        assert_eq!(task.visible(), "hello");
        assert!(task.is_complete());
        assert!(!task.poll(t0 + Duration::from_millis(30)));
    }

    #[test]
    fn late_poll_catches_up() {
        let t0 = Instant::now();
        let mut task = RevealTask::start("abcdefghij", cadence(), t0);
        task.poll(t0 + Duration::from_millis(25));
        assert_eq!(task.visible(), "abcdef");
    }

    #[test]
    fn retarget_restarts_only_on_new_content() {
        let t0 = Instant::now();
        let mut task = RevealTask::start("first", cadence(), t0);
        task.poll(t0);
        assert!(!task.retarget("first", t0));
        assert_eq!(task.visible(), "fi");

        assert!(task.retarget("second", t0));
        assert_eq!(task.visible(), "");
        assert_eq!(task.content(), "second");
    }

    #[test]
    fn cancelled_task_stops_advancing() {
        let t0 = Instant::now();
        let mut task = RevealTask::start("hello", cadence(), t0);
        task.poll(t0);
        task.cancel();
        assert!(!task.poll(t0 + Duration::from_millis(100)));
        assert_eq!(task.visible(), "he");
        assert!(!task.is_active());
    }

    #[test]
    fn multibyte_text_slices_on_char_boundaries() {
        let t0 = Instant::now();
        let mut task = RevealTask::start("héllo ✓", cadence(), t0);
        task.poll(t0);
        assert_eq!(task.visible(), "hé");
        task.poll(t0 + Duration::from_millis(30));
        assert_eq!(task.visible(), "héllo ✓");
    }
}
