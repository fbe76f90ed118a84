use std::time::{Duration, Instant};

/// Pause-aware stopwatch for the active part of a session.
///
/// Every operation has an `_at` form taking the current instant explicitly;
/// the plain forms read the wall clock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionTimer {
    start: Option<Instant>,
    paused_accumulated: Duration,
    paused_at: Option<Instant>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Starts counting from `now`. A timer that is already running keeps its origin.
    pub fn start_at(&mut self, now: Instant) {
        if self.start.is_none() {
            self.start = Some(now);
            self.paused_accumulated = Duration::ZERO;
            self.paused_at = None;
        }
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.start.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn resume_at(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_accumulated += now.saturating_duration_since(paused_at);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Active time up to `now`, frozen at the pause instant while paused.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let Some(start) = self.start else {
            return Duration::ZERO;
        };
        let until = self.paused_at.unwrap_or(now);
        until
            .saturating_duration_since(start)
            .saturating_sub(self.paused_accumulated)
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Formats a duration as `mm:ss`. Minutes are not capped at 60.
pub fn format_mm_ss(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Parses an `mm:ss` duration back into whole seconds.
pub fn parse_mm_ss(text: &str) -> Option<u64> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Rounds to the nearest whole second.
pub fn round_secs(duration: Duration) -> u64 {
    (duration + Duration::from_millis(500)).as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn unstarted_timer_reports_zero() {
        let timer = SessionTimer::new();
        assert_eq!(timer.elapsed_at(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn pause_freezes_elapsed_time() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start_at(t0);

        timer.pause_at(t0 + secs(10));
        assert_eq!(timer.elapsed_at(t0 + secs(15)), secs(10));
        assert_eq!(format_mm_ss(timer.elapsed_at(t0 + secs(15))), "00:10");

        timer.resume_at(t0 + secs(15));
        assert_eq!(timer.elapsed_at(t0 + secs(17)), secs(12));
        assert_eq!(format_mm_ss(timer.elapsed_at(t0 + secs(17))), "00:12");
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start_at(t0);
        timer.resume_at(t0 + secs(1));
        timer.pause_at(t0 + secs(4));
        timer.pause_at(t0 + secs(6));
        timer.resume_at(t0 + secs(8));
        timer.resume_at(t0 + secs(9));
        assert_eq!(timer.elapsed_at(t0 + secs(10)), secs(6));
    }

    #[test]
    fn elapsed_is_monotonic_while_running() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start_at(t0);
        let mut last = Duration::ZERO;
        for step in 0..20 {
            let now = t0 + Duration::from_millis(step * 250);
            let elapsed = timer.elapsed_at(now);
            assert!(elapsed >= last);
            last = elapsed;
        }
    }

    #[test]
    fn reset_clears_everything() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start_at(t0);
        timer.pause_at(t0 + secs(3));
        timer.reset();
        assert_eq!(timer, SessionTimer::default());
        assert!(!timer.is_started());
    }

    #[test]
    fn formats_minutes_past_an_hour() {
        assert_eq!(format_mm_ss(secs(0)), "00:00");
        assert_eq!(format_mm_ss(secs(9 * 60 + 5)), "09:05");
        assert_eq!(format_mm_ss(secs(75 * 60)), "75:00");
    }

    #[test]
    fn parses_what_it_formats() {
        assert_eq!(parse_mm_ss("75:00"), Some(4500));
        assert_eq!(parse_mm_ss("01:07"), Some(67));
        assert_eq!(parse_mm_ss("1:61"), None);
        assert_eq!(parse_mm_ss("abc"), None);
    }

    #[test]
    fn rounds_half_seconds_up() {
        assert_eq!(round_secs(Duration::from_millis(12_499)), 12);
        assert_eq!(round_secs(Duration::from_millis(12_500)), 13);
    }
}
