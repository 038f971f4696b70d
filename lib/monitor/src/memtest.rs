//! Pseudo-random pattern test of a memory region.

use crate::config::Region;
use crate::mem::AddressSpace;

const SEED: u32 = 0x1234_5678;

/// One step of a 32-bit Galois LFSR (x^32 + x^22 + x^2 + x + 1).
fn lfsr(v: u32) -> u32 {
    let out = v >> 1;
    if v & 1 != 0 {
        out ^ 0x8020_0003
    } else {
        out
    }
}

/// Words tested and how many of them read back wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub words: usize,
    pub errors: usize,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }
}

/// Fills every whole word of `region` with an LFSR sequence, then reads it
/// back. The previous contents are lost.
pub fn run(mem: &mut dyn AddressSpace, region: Region) -> Report {
    let words = region.size / 4;

    let mut v = SEED;
    for i in 0..words {
        v = lfsr(v);
        mem.write_u32(region.base.wrapping_add(4 * i), v);
    }

    let mut v = SEED;
    let mut errors = 0;
    for i in 0..words {
        v = lfsr(v);
        if mem.read_u32(region.base.wrapping_add(4 * i)) != v {
            errors += 1;
        }
    }

    if errors != 0 {
        log::warn!("memtest: {}/{} words bad at {:#x}", errors, words, region.base);
    }
    Report { words, errors }
}
