//! Startup self-check of the firmware image.
//!
//! The image is followed by a 32-bit little-endian CRC of everything before
//! it, written there by `mkbios seal`. A mismatch is reported but not fatal:
//! a board that cannot boot its monitor cannot be reflashed either.

use crate::config::Region;
use crate::console::Console;
use crate::crc;
use crate::mem::AddressSpace;

/// Stored and computed checksums of the running image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub expected: u32,
    pub actual: u32,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Checksums `image` and compares it with the trailer at `image.end()`.
pub fn check(mem: &dyn AddressSpace, image: Region) -> Verdict {
    Verdict {
        expected: mem.read_u32(image.end()),
        actual: crc::checksum_range(mem, image.base, image.size),
    }
}

/// Runs `check` and tells the operator how it went.
pub fn report(console: &mut dyn Console, mem: &dyn AddressSpace, name: &str, image: Region) -> Verdict {
    let verdict = check(mem, image);
    if verdict.passed() {
        cprintln!(console, "{} CRC passed ({:08x})", name, verdict.actual);
    } else {
        log::error!(
            "image {:#x}..{:#x} fails its checksum",
            image.base,
            image.end()
        );
        cprintln!(
            console,
            "{} CRC failed (expected {:08x}, got {:08x})",
            name,
            verdict.expected,
            verdict.actual
        );
        cprintln!(console, "The system will continue, but expect problems.");
    }
    verdict
}
