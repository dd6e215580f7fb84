#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::timer::DropTimer;
    use std::time::{Duration, Instant};

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_new_timer_is_idle() {
        let mut timer = DropTimer::new();
        assert!(!timer.is_running());
        assert!(!timer.poll(Instant::now() + MS * 1000, MS));
    }

    #[test]
    fn test_fires_after_first_delay() {
        let start = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(start, MS * 50);

        assert!(timer.is_running());
        assert!(!timer.poll(start + MS * 49, MS * 100));
        assert!(timer.poll(start + MS * 50, MS * 100));
    }

    #[test]
    fn test_rearms_with_interval() {
        let start = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(start, MS * 10);

        assert!(timer.poll(start + MS * 10, MS * 100));
        assert!(!timer.poll(start + MS * 60, MS * 100));
        assert!(timer.poll(start + MS * 110, MS * 100));
    }

    #[test]
    fn test_fires_once_per_poll_when_late() {
        let start = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(start, MS * 10);

        assert!(timer.poll(start + MS * 1000, MS * 10));
        assert!(!timer.poll(start + MS * 1005, MS * 10));
    }

    #[test]
    fn test_stop_prevents_firing() {
        let start = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(start, MS * 10);
        timer.stop();

        assert!(!timer.is_running());
        assert!(!timer.poll(start + MS * 20, MS * 10));
    }
}
