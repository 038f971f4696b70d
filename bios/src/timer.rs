use monitor::Countdown;
use pi::timer::{Timer, FREQUENCY};

/// A down-counter emulated on the free-running 1 MHz system timer.
pub struct PiCountdown {
    timer: Timer,
    enabled: bool,
    reload: u32,
    deadline: u64,
    latched: u32,
}

impl PiCountdown {
    pub fn new() -> PiCountdown {
        PiCountdown {
            timer: Timer::new(),
            enabled: false,
            reload: 0,
            deadline: 0,
            latched: 0,
        }
    }
}

impl Countdown for PiCountdown {
    fn frequency(&self) -> u32 {
        FREQUENCY
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_reload(&mut self, ticks: u32) {
        self.reload = ticks;
    }

    fn load(&mut self, ticks: u32) {
        self.deadline = self.timer.ticks() + ticks as u64;
    }

    fn latch(&mut self) {
        if !self.enabled {
            return;
        }

        let now = self.timer.ticks();
        if now >= self.deadline && self.reload != 0 {
            let behind = (now - self.deadline) / self.reload as u64 + 1;
            self.deadline += behind * self.reload as u64;
        }
        self.latched = self.deadline.saturating_sub(now) as u32;
    }

    fn remaining(&self) -> u32 {
        self.latched
    }
}
