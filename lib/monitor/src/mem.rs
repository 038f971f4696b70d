//! The address space and the primitives that walk it.

use volatile::prelude::*;
use volatile::{ReadVolatile, Volatile};

use crate::console::Console;

/// Byte and word access to arbitrary addresses.
///
/// No bounds are checked at this layer: which addresses are meaningful is the
/// operator's business. Words are 4 bytes and are accessed at the address
/// given, aligned or not.
pub trait AddressSpace {
    fn read_u8(&self, addr: usize) -> u8;
    fn read_u32(&self, addr: usize) -> u32;
    fn write_u8(&mut self, addr: usize, value: u8);
    fn write_u32(&mut self, addr: usize, value: u32);
}

/// Unchecked access to the physical address space.
///
/// Holding a `Raw` is the capability to read and write any address. The only
/// way to get one is the `unsafe` constructor, which is where the caller
/// vouches for running without memory protection.
#[derive(Debug)]
pub struct Raw {
    _private: (),
}

impl Raw {
    /// Returns the raw access capability.
    ///
    /// # Safety
    ///
    /// Every address later handed to this `Raw` is dereferenced with a
    /// volatile access. The caller must be running where that cannot violate
    /// Rust's aliasing rules for memory it owns, i.e. firmware with no other
    /// live references into the accessed ranges.
    pub unsafe fn new() -> Raw {
        Raw { _private: () }
    }
}

impl AddressSpace for Raw {
    fn read_u8(&self, addr: usize) -> u8 {
        unsafe { ReadVolatile::from_ptr(addr as *const u8).read() }
    }

    fn read_u32(&self, addr: usize) -> u32 {
        unsafe { ReadVolatile::from_ptr(addr as *const u32).read() }
    }

    fn write_u8(&mut self, addr: usize, value: u8) {
        unsafe { Volatile::from_ptr(addr as *mut u8).write(value) }
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        unsafe { Volatile::from_ptr(addr as *mut u32).write(value) }
    }
}

/// Bytes shown on one line of a memory dump.
pub const BYTES_PER_LINE: usize = 16;

/// Prints `len` bytes starting at `addr` as a hex and ASCII dump.
///
/// ```text
/// Memory dump:
/// 0x40000000  de ad be ef 41 42                                ....AB
/// ```
///
/// Short lines are padded so the ASCII column always lines up.
pub fn dump(console: &mut dyn Console, mem: &dyn AddressSpace, addr: usize, len: usize) {
    cprint!(console, "Memory dump:");

    let mut line = addr;
    let mut left = len;
    while left > 0 {
        let count = left.min(BYTES_PER_LINE);

        cprint!(console, "\n0x{:08x}  ", line);
        for i in 0..count {
            cprint!(console, "{:02x} ", mem.read_u8(line.wrapping_add(i)));
        }
        for _ in count..BYTES_PER_LINE {
            cprint!(console, "   ");
        }

        cprint!(console, " ");
        for i in 0..count {
            let b = mem.read_u8(line.wrapping_add(i));
            if b < 0x20 || b > 0x7e {
                console.write_byte(b'.');
            } else {
                console.write_byte(b);
            }
        }
        for _ in count..BYTES_PER_LINE {
            console.write_byte(b' ');
        }

        line = line.wrapping_add(count);
        left -= count;
    }
    cprintln!(console);
}

/// Stores `value` into `count` consecutive words starting at `addr`.
pub fn fill_words(mem: &mut dyn AddressSpace, addr: usize, value: u32, count: usize) {
    for i in 0..count {
        mem.write_u32(addr.wrapping_add(4 * i), value);
    }
}

/// Copies `count` words from `src` to `dst`, lowest address first.
///
/// Overlap is not detected: with `dst` just above `src` the copy smears the
/// first words forward.
pub fn copy_words(mem: &mut dyn AddressSpace, dst: usize, src: usize, count: usize) {
    for i in 0..count {
        let word = mem.read_u32(src.wrapping_add(4 * i));
        mem.write_u32(dst.wrapping_add(4 * i), word);
    }
}

/// Copies `len` bytes from `src` to `dst`, lowest address first.
pub fn copy_bytes(mem: &mut dyn AddressSpace, dst: usize, src: usize, len: usize) {
    for i in 0..len {
        let b = mem.read_u8(src.wrapping_add(i));
        mem.write_u8(dst.wrapping_add(i), b);
    }
}
