//! Phase timing instrumentation (SPEC_FULL.md §4.9). Purely diagnostic:
//! reported in `verbose` mode, never gates correctness.

use std::time::{Duration, Instant};

pub struct PhaseTimer {
    start: Instant,
    read_done: Option<Instant>,
    insert_done: Option<Instant>,
    find_done: Option<Instant>,
}

impl PhaseTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            read_done: None,
            insert_done: None,
            find_done: None,
        }
    }

    pub fn mark_read_done(&mut self) {
        self.read_done = Some(Instant::now());
    }

    pub fn mark_insert_done(&mut self) {
        self.insert_done = Some(Instant::now());
    }

    pub fn mark_find_done(&mut self) {
        self.find_done = Some(Instant::now());
    }

    pub fn read_duration(&self) -> Duration {
        self.read_done.unwrap_or(self.start) - self.start
    }

    pub fn insert_duration(&self) -> Duration {
        match (self.read_done, self.insert_done) {
            (Some(r), Some(i)) => i - r,
            _ => Duration::ZERO,
        }
    }

    pub fn find_duration(&self) -> Duration {
        match (self.insert_done, self.find_done) {
            (Some(i), Some(f)) => f - i,
            _ => Duration::ZERO,
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.find_done.unwrap_or(Instant::now()) - self.start
    }
}
