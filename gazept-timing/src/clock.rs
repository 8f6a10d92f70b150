use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Session clock, reporting seconds since the session started
pub trait Clock: Clone + Send + Sync {
    fn now_s(&self) -> f64;

    fn elapsed_since(&self, start_s: f64) -> f64 {
        (self.now_s() - start_s).max(0.0)
    }
}

/// Externally driven clock for replaying recorded sessions.
///
/// Clones share the same time, so a handle kept outside a recorder can move
/// the recorder's clock forward.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_s(&self, t: f64) {
        self.nanos
            .store((t.max(0.0) * 1e9) as u64, Ordering::SeqCst);
    }

    pub fn advance(&self, d: Duration) {
        self.nanos
            .fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_s(&self) -> f64 {
        self.nanos.load(Ordering::SeqCst) as f64 / 1e9
    }
}
