use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::types::Turn;

/// Most recent turns of a single user, oldest first.
///
/// Holds at most `capacity` turns; appending past that drops turns from the
/// front. The backing deque is private so the bound cannot be bypassed.
#[derive(Debug, Clone)]
pub struct ConversationWindow {
    turns: VecDeque<Turn>,
    capacity: usize,
    last_activity: Instant,
}

impl ConversationWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity.min(64)),
            capacity,
            last_activity: Instant::now(),
        }
    }

    pub fn append(&mut self, turn: Turn) {
        self.touch();
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// Chronological copy of the retained turns
    pub fn history(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Time since the last append or lookup, measured against `now`
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }
}
