//! Soft time limit, checked by polling on each render.

use std::time::{Duration, Instant};

/// True once `elapsed` is strictly past `limit`.
pub fn expired(elapsed: Duration, limit: Duration) -> bool {
    elapsed > limit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizTimer {
    started_at: Instant,
    limit: Duration,
}

impl QuizTimer {
    pub fn start(limit: Duration) -> Self {
        Self::started_at(Instant::now(), limit)
    }

    pub fn started_at(started_at: Instant, limit: Duration) -> Self {
        Self { started_at, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        expired(self.elapsed_at(now), self.limit)
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.limit.saturating_sub(self.elapsed_at(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_not_expired() {
        let limit = Duration::from_secs(30);
        assert!(!expired(Duration::from_secs(30), limit));
        assert!(expired(Duration::from_millis(30_001), limit));
        assert!(!expired(Duration::ZERO, limit));
    }

    #[test]
    fn timer_measures_from_start() {
        let start = Instant::now();
        let timer = QuizTimer::started_at(start, Duration::from_secs(10));

        assert!(!timer.is_expired_at(start + Duration::from_secs(10)));
        assert!(timer.is_expired_at(start + Duration::from_secs(11)));
        assert_eq!(timer.remaining_at(start + Duration::from_secs(4)), Duration::from_secs(6));
        assert_eq!(timer.remaining_at(start + Duration::from_secs(40)), Duration::ZERO);
        assert_eq!(timer.elapsed_at(start), Duration::ZERO);
        // readings before the start clamp to zero
        if let Some(earlier) = start.checked_sub(Duration::from_secs(1)) {
            assert_eq!(timer.elapsed_at(earlier), Duration::ZERO);
        }
    }
}
