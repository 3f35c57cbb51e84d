/// Elapsed-time guard for periodic control-rate work.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval_ms: u32,
    last_ms: Option<u32>,
}

impl Throttle {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// True at most once per interval; the first call always passes.
    pub fn ready(&mut self, now_ms: u32) -> bool {
        match self.last_ms {
            Some(last) if now_ms.wrapping_sub(last) < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}
