//! Rolling per-episode service history

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Episodes kept in the rolling window
pub const HISTORY_LEN: usize = 10;

/// Requests delivered and issued during one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub dropped: u64,
    pub requested: u64,
}

impl EpisodeOutcome {
    pub fn new(dropped: u64, requested: u64) -> Self {
        Self { dropped, requested }
    }
}

/// Fixed-capacity FIFO of episode outcomes
#[derive(Debug, Clone)]
pub struct EpisodeWindow {
    outcomes: VecDeque<EpisodeOutcome>,
    capacity: usize,
}

impl EpisodeWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add an outcome, evicting the oldest when full
    pub fn push(&mut self, outcome: EpisodeOutcome) {
        if self.outcomes.len() >= self.capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.outcomes.len() >= self.capacity
    }

    pub fn clear(&mut self) {
        self.outcomes.clear();
    }

    pub fn total_dropped(&self) -> u64 {
        self.outcomes.iter().map(|o| o.dropped).sum()
    }

    pub fn total_requested(&self) -> u64 {
        self.outcomes.iter().map(|o| o.requested).sum()
    }

    /// Delivered fraction over the window, `None` while nothing was requested
    pub fn service_ratio(&self) -> Option<f64> {
        let requested = self.total_requested();
        (requested > 0).then(|| self.total_dropped() as f64 / requested as f64)
    }
}

impl Default for EpisodeWindow {
    fn default() -> Self {
        Self::new(HISTORY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_len() {
        let mut window = EpisodeWindow::new(3);
        assert!(window.is_empty());

        window.push(EpisodeOutcome::new(1, 2));
        assert_eq!(window.len(), 1);
        assert!(!window.is_full());
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = EpisodeWindow::new(3);
        for i in 0..5 {
            window.push(EpisodeOutcome::new(i, 10));
        }

        assert_eq!(window.len(), 3);
        assert!(window.is_full());
        // only episodes 2, 3 and 4 remain
        assert_eq!(window.total_dropped(), 2 + 3 + 4);
        assert_eq!(window.total_requested(), 30);
    }

    #[test]
    fn test_service_ratio() {
        let mut window = EpisodeWindow::default();
        assert_eq!(window.service_ratio(), None);

        window.push(EpisodeOutcome::new(0, 0));
        assert_eq!(window.service_ratio(), None);

        window.push(EpisodeOutcome::new(3, 4));
        window.push(EpisodeOutcome::new(1, 4));
        assert_eq!(window.service_ratio(), Some(0.5));
    }

    #[test]
    fn test_clear() {
        let mut window = EpisodeWindow::default();
        window.push(EpisodeOutcome::new(1, 1));
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.total_requested(), 0);
    }
}
