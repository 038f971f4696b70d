use volatile::prelude::*;
use volatile::{Volatile, WriteVolatile};

use crate::common::IO_BASE;

const POWER_REG_BASE: usize = IO_BASE + 0x0010001c;
const PM_WDOG_MAGIC: u32 = 0x5a000000;
const PM_RSTC_FULLRST: u32 = 0x00000020;

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    PM_RSTC: WriteVolatile<u32>,
    PM_RSTS: Volatile<u32>,
    PM_WDOG: WriteVolatile<u32>,
}

/// The power manager's watchdog, used as a system reset.
pub struct PowerManager {
    registers: &'static mut Registers,
}

impl PowerManager {
    /// Returns a new instance of `PowerManager`.
    pub fn new() -> PowerManager {
        PowerManager {
            registers: unsafe { &mut *(POWER_REG_BASE as *mut Registers) },
        }
    }

    /// Resets the board through the watchdog, booting partition 0 again.
    ///
    /// # Safety
    ///
    /// Everything not yet flushed to the outside world is lost.
    pub unsafe fn reset(&mut self) -> ! {
        let r: u32 = self.registers.PM_RSTS.read() & !0xfffffaaa;
        self.registers.PM_RSTS.write(PM_WDOG_MAGIC | r);
        self.registers.PM_WDOG.write(PM_WDOG_MAGIC | 10);
        self.registers.PM_RSTC.write(PM_WDOG_MAGIC | PM_RSTC_FULLRST);
        loop {
            core::hint::spin_loop();
        }
    }
}
