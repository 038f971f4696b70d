use crate::common::IO_BASE;
use core::time::Duration;

use volatile::prelude::*;
use volatile::{ReadVolatile, Volatile};

/// The base address for the ARM system timer registers.
const TIMER_REG_BASE: usize = IO_BASE + 0x3000;

/// The system timer counts at 1 MHz.
pub const FREQUENCY: u32 = 1_000_000;

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    CS: Volatile<u32>,
    CLO: ReadVolatile<u32>,
    CHI: ReadVolatile<u32>,
    COMPARE: [Volatile<u32>; 4],
}

/// The Raspberry Pi ARM system timer.
pub struct Timer {
    registers: &'static mut Registers,
}

impl Timer {
    /// Returns a new instance of `Timer`.
    pub fn new() -> Timer {
        Timer {
            registers: unsafe { &mut *(TIMER_REG_BASE as *mut Registers) },
        }
    }

    /// Returns the number of microseconds since power on.
    ///
    /// `CHI` is re-read to catch a carry out of `CLO` between the two loads.
    pub fn ticks(&self) -> u64 {
        loop {
            let hi = self.registers.CHI.read();
            let lo = self.registers.CLO.read();
            if self.registers.CHI.read() == hi {
                return ((hi as u64) << 32) | lo as u64;
            }
        }
    }

    /// Reads the system timer's counter and returns Duration.
    pub fn read(&self) -> Duration {
        Duration::from_micros(self.ticks())
    }
}

/// Returns current time.
pub fn current_time() -> Duration {
    Timer::new().read()
}
