/// The address where I/O peripherals are mapped to.
pub const IO_BASE: usize = 0x3F000000;

/// The base address of the `GPIO` registers.
pub const GPIO_BASE: usize = IO_BASE + 0x200000;

/// The number of GPIO pins on the BCM2837.
pub const GPIO_MAX: u8 = 54;

/// Busy-waits for `cycles` iterations.
#[inline(always)]
pub fn spin(cycles: usize) {
    for _ in 0..cycles {
        core::hint::spin_loop();
    }
}
