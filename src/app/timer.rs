use std::time::{Duration, Instant};

use super::AppError;

/// Measures the wall-clock time of a single run.
#[derive(Debug, Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stopwatch that is already running.
    pub fn started() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start or restart measuring.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Stop measuring and return the time since [`start`](Stopwatch::start).
    ///
    /// # Errors
    /// [`AppError::PrematureTimerStop`] if the stopwatch is not running.
    pub fn stop(&mut self) -> Result<Duration, AppError> {
        self.started_at
            .take()
            .map(|started_at| started_at.elapsed())
            .ok_or(AppError::PrematureTimerStop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_before_start() {
        let mut stopwatch = Stopwatch::new();
        assert!(matches!(stopwatch.stop(), Err(AppError::PrematureTimerStop)));
    }

    #[test]
    fn test_stop_twice() {
        let mut stopwatch = Stopwatch::started();
        assert!(stopwatch.is_running());
        std::thread::sleep(Duration::from_millis(2));
        assert!(stopwatch.stop().unwrap() >= Duration::from_millis(2));
        assert!(!stopwatch.is_running());
        assert!(matches!(stopwatch.stop(), Err(AppError::PrematureTimerStop)));
    }
}
