//! Idle-window accounting for C3's idle-watcher (spec.md §4.C3, §8 P6):
//! "evaluates ... whether the GPU lane's approximate visible message count
//! has averaged <= 0 for six consecutive samples (30 minutes)". Kept as a
//! pure counter so the 6-sample/30-minute threshold is unit-testable
//! without a clock or a live queue.

/// Tracks consecutive idle samples (`visible <= 0`) on a fixed sample grid.
/// A non-idle sample resets the run to zero.
#[derive(Debug, Clone)]
pub struct IdleWindow {
    required_samples: u32,
    consecutive_idle: u32,
}

impl IdleWindow {
    pub fn new(required_samples: u32) -> Self {
        Self {
            required_samples,
            consecutive_idle: 0,
        }
    }

    /// Record one sample. Returns `true` exactly when the run of idle
    /// samples just reached `required_samples` — the caller should act on
    /// the alarm and then call `reset` so the next shutdown requires a
    /// fresh full window (spec.md §8 P6: "exactly one stop").
    pub fn push(&mut self, visible: i64) -> bool {
        if visible <= 0 {
            self.consecutive_idle += 1;
        } else {
            self.consecutive_idle = 0;
        }
        self.consecutive_idle >= self.required_samples
    }

    pub fn reset(&mut self) {
        self.consecutive_idle = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_required_consecutive_idle_samples() {
        let mut window = IdleWindow::new(6);
        for _ in 0..5 {
            assert!(!window.push(0));
        }
        assert!(window.push(0));
    }

    #[test]
    fn a_single_non_idle_sample_resets_the_run() {
        let mut window = IdleWindow::new(6);
        for _ in 0..5 {
            window.push(0);
        }
        assert!(!window.push(1));
        for _ in 0..5 {
            assert!(!window.push(0));
        }
        assert!(window.push(0));
    }

    #[test]
    fn reset_requires_a_fresh_full_window() {
        let mut window = IdleWindow::new(3);
        assert!(!window.push(0));
        assert!(!window.push(0));
        assert!(window.push(0));
        window.reset();
        assert!(!window.push(0));
        assert!(!window.push(0));
        assert!(window.push(0));
    }
}
