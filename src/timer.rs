// timer.rs
use std::time::Instant;

/// Wall-clock practice timer. The frame loop polls `tick`; the elapsed reading
/// is always recomputed from the recorded start instant, so missed polls never
/// accumulate drift.
#[derive(Debug, Default)]
pub struct PracticeTimer {
    started_at: Option<Instant>,
    elapsed_seconds: u64,
}

impl PracticeTimer {
    pub fn new() -> Self { Self::default() }

    /// Records the start instant. No-op while already running.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
            self.elapsed_seconds = 0;
        }
    }

    /// Stops ticking but keeps the last elapsed reading. No-op while stopped.
    pub fn stop(&mut self) { self.started_at = None; }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.elapsed_seconds = 0;
    }

    pub fn is_running(&self) -> bool { self.started_at.is_some() }

    pub fn elapsed_seconds(&self) -> u64 { self.elapsed_seconds }

    /// Recomputes elapsed whole seconds; returns the new reading only when it
    /// changed since the last poll.
    pub fn tick(&mut self, now: Instant) -> Option<u64> {
        let started = self.started_at?;
        let seconds = now.duration_since(started).as_secs();
        if seconds != self.elapsed_seconds {
            self.elapsed_seconds = seconds;
            Some(seconds)
        } else {
            None
        }
    }
}

pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn start_is_idempotent() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new();
        timer.start(t0);
        timer.start(t0 + Duration::from_secs(5));
        assert_eq!(timer.tick(t0 + Duration::from_secs(7)), Some(7));
    }

    #[test]
    fn stop_keeps_last_reading_and_is_idempotent() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new();
        timer.start(t0);
        timer.tick(t0 + Duration::from_secs(3));
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_seconds(), 3);
        assert_eq!(timer.tick(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn reset_zeroes_everything() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new();
        timer.start(t0);
        timer.tick(t0 + Duration::from_secs(9));
        timer.reset();
        assert_eq!(timer.elapsed_seconds(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn restart_after_stop_measures_fresh() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new();
        timer.start(t0);
        timer.tick(t0 + Duration::from_secs(4));
        timer.stop();
        let t1 = t0 + Duration::from_secs(100);
        timer.start(t1);
        assert_eq!(timer.tick(t1 + Duration::from_secs(2)), Some(2));
    }

    #[test]
    fn tick_reports_each_second_once() {
        let t0 = Instant::now();
        let mut timer = PracticeTimer::new();
        timer.start(t0);
        assert_eq!(timer.tick(t0 + Duration::from_millis(400)), None);
        assert_eq!(timer.tick(t0 + Duration::from_millis(1100)), Some(1));
        assert_eq!(timer.tick(t0 + Duration::from_millis(1600)), None);
        assert_eq!(timer.tick(t0 + Duration::from_millis(2050)), Some(2));
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(600), "10:00");
    }
}
