use std::sync::Mutex;

/// Counters over refresh cycles: completed fetches, failed fetches, and the
/// crowd total carried by the most recent successful cycle.
#[derive(Debug)]
pub struct RefreshRecorder {
    inner: Mutex<Counters>,
}

#[derive(Debug)]
struct Counters {
    completed: usize,
    failed: usize,
    last_total_people: u32,
}

impl RefreshRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters {
                completed: 0,
                failed: 0,
                last_total_people: 0,
            }),
        }
    }

    pub fn record_completed(&self, total_people: u32) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.completed += 1;
            counters.last_total_people = total_people;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.failed += 1;
        }
    }

    pub fn snapshot(&self) -> (usize, usize, u32) {
        if let Ok(counters) = self.inner.lock() {
            (counters.completed, counters.failed, counters.last_total_people)
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for RefreshRecorder {
    fn default() -> Self {
        Self::new()
    }
}
