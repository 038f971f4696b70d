use crate::common::IO_BASE;

use volatile::prelude::*;
use volatile::{ReadVolatile, Volatile};

const INT_BASE: usize = IO_BASE + 0xB000 + 0x200;

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    IRQ_basic_pending: ReadVolatile<u32>,
    IRQ_pending_1: ReadVolatile<u32>,
    IRQ_pending_2: ReadVolatile<u32>,
    FIQ_control: Volatile<u32>,
    Enable_IRQ_1: Volatile<u32>,
    Enable_IRQ_2: Volatile<u32>,
    Enable_Basic_IRQ: Volatile<u32>,
    Disable_IRQ_1: Volatile<u32>,
    Disable_IRQ_2: Volatile<u32>,
    Disable_Basic_IRQ: Volatile<u32>,
}

/// An interrupt controller. Used to enable and disable interrupts as well as to
/// check if an interrupt is pending.
pub struct Controller {
    registers: &'static mut Registers,
}

impl Controller {
    /// Returns a new handle to the interrupt controller.
    pub fn new() -> Controller {
        Controller {
            registers: unsafe { &mut *(INT_BASE as *mut Registers) },
        }
    }

    /// The enabled interrupts of the first bank, one bit per source.
    pub fn enabled_mask(&self) -> u32 {
        self.registers.Enable_IRQ_1.read()
    }

    /// Enables exactly the sources in `mask`.
    pub fn set_enabled_mask(&mut self, mask: u32) {
        self.registers.Disable_IRQ_1.write(!mask);
        self.registers.Enable_IRQ_1.write(mask);
    }

    /// The pending interrupts of the first bank, one bit per source.
    pub fn pending_mask(&self) -> u32 {
        self.registers.IRQ_pending_1.read()
    }
}
