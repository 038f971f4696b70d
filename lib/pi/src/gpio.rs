use volatile::prelude::*;
use volatile::{ReadVolatile, Reserved, Volatile, WriteVolatile};

use crate::common::{spin, GPIO_BASE, GPIO_MAX};

/// An alternative GPIO function.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    FSEL: [Volatile<u32>; 6],
    __r0: Reserved<u32>,
    SET: [WriteVolatile<u32>; 2],
    __r1: Reserved<u32>,
    CLR: [WriteVolatile<u32>; 2],
    __r2: Reserved<u32>,
    LEV: [ReadVolatile<u32>; 2],
    __r3: Reserved<u32>,
    EDS: [Volatile<u32>; 2],
    __r4: Reserved<u32>,
    REN: [Volatile<u32>; 2],
    __r5: Reserved<u32>,
    FEN: [Volatile<u32>; 2],
    __r6: Reserved<u32>,
    HEN: [Volatile<u32>; 2],
    __r7: Reserved<u32>,
    LEN: [Volatile<u32>; 2],
    __r8: Reserved<u32>,
    AREN: [Volatile<u32>; 2],
    __r9: Reserved<u32>,
    AFEN: [Volatile<u32>; 2],
    __r10: Reserved<u32>,
    PUD: Volatile<u32>,
    PUDCLK: [Volatile<u32>; 2],
}

/// A single GPIO pin.
pub struct Gpio {
    pin: u8,
    registers: &'static mut Registers,
}

impl Gpio {
    /// Returns a handle to GPIO pin `pin`.
    ///
    /// # Panics
    ///
    /// Panics if `pin` >= `GPIO_MAX`.
    pub fn new(pin: u8) -> Gpio {
        if pin >= GPIO_MAX {
            panic!("Gpio::new(): pin {} exceeds maximum of {}", pin, GPIO_MAX);
        }

        Gpio {
            pin,
            registers: unsafe { &mut *(GPIO_BASE as *mut Registers) },
        }
    }

    /// Selects `function` for this pin and disables its pull-up/down, the
    /// way the UART pins want it.
    pub fn into_alt(self, function: Function) {
        let index = (self.pin / 10) as usize;
        let shift = (self.pin % 10) * 3;
        let registers = self.registers;

        let mut fsel = registers.FSEL[index].read();
        fsel &= !(0b111 << shift);
        fsel |= (function as u32) << shift;
        registers.FSEL[index].write(fsel);

        let bank = (self.pin / 32) as usize;
        registers.PUD.write(0);
        spin(150);
        registers.PUDCLK[bank].write(1 << (self.pin % 32));
        spin(150);
        registers.PUDCLK[bank].write(0);
    }
}
