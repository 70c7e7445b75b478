/// Seconds left on an attempt. Once stopped, it never counts again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub const fn started(secs: u32) -> Self {
        Self { remaining: secs, running: true }
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Safe to call any number of times.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Consumes one second. Returns the seconds left, or `None` if stopped.
    pub fn tick(&mut self) -> Option<u32> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.remaining)
    }
}
