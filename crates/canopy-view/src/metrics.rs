//! Paint latency bookkeeping.
//!
//! Two one-shot timers: restore-to-first-paint and time spent painting
//! without a backing store. Each produces one sample and then re-arms.

use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Default)]
pub struct PaintMetrics {
    restored_at: Option<Instant>,
    blank_since: Option<Instant>,
    restore_latency: Vec<Duration>,
    blank_durations: Vec<Duration>,
}

impl PaintMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// The view just became visible. A pending restore timer is kept.
    pub fn mark_restored(&mut self, now: Instant) {
        self.restored_at.get_or_insert(now);
    }

    /// Record a completed paint. `had_store` is false when the pass could
    /// only draw background.
    pub fn on_painted(&mut self, now: Instant, had_store: bool) {
        if let Some(start) = self.restored_at.take() {
            let latency = now.saturating_duration_since(start);
            debug!(?latency, "first paint after restore");
            self.restore_latency.push(latency);
        }
        if had_store {
            if let Some(start) = self.blank_since.take() {
                let blank = now.saturating_duration_since(start);
                debug!(?blank, "backing store arrived");
                self.blank_durations.push(blank);
            }
        } else {
            self.blank_since.get_or_insert(now);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.blank_since.is_some()
    }

    pub fn restore_latency(&self) -> &[Duration] {
        &self.restore_latency
    }

    pub fn blank_durations(&self) -> &[Duration] {
        &self.blank_durations
    }
}
