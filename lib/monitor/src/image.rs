//! Firmware image formats.
//!
//! Two layouts, both little-endian:
//!
//! * a monitor image is followed by a CRC-32 trailer (see `integrity`);
//! * a flash boot image is `[length: u32][crc32: u32][payload; length]`,
//!   staged at a fixed flash address and copied to main RAM before booting.

use core::convert::TryFrom;

use crate::boot::BootSource;
use crate::console::Console;
use crate::crc;
use crate::error::BootError;
use crate::mem::{self, AddressSpace};

/// Size of the flash boot image header.
pub const HEADER_LEN: usize = 8;
/// Size of the integrity trailer.
pub const TRAILER_LEN: usize = 4;

/// Shortest payload a flash boot image may carry.
pub const MIN_PAYLOAD: u32 = 32;
/// Longest payload a flash boot image may carry.
pub const MAX_PAYLOAD: u32 = 4 * 1024 * 1024;

/// Header of a flash boot image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Payload length in bytes.
    pub length: u32,
    /// CRC-32 of the payload.
    pub crc: u32,
}

impl Header {
    /// The header describing `payload`, or `None` if `payload` has an
    /// unbootable length.
    pub fn for_payload(payload: &[u8]) -> Option<Header> {
        let length = u32::try_from(payload.len()).ok()?;
        if !Header::valid_length(length) {
            return None;
        }
        Some(Header { length, crc: crc::checksum(payload) })
    }

    pub fn valid_length(length: u32) -> bool {
        length >= MIN_PAYLOAD && length <= MAX_PAYLOAD
    }

    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Header {
        let mut length = [0u8; 4];
        let mut crc = [0u8; 4];
        length.copy_from_slice(&bytes[..4]);
        crc.copy_from_slice(&bytes[4..]);
        Header {
            length: u32::from_le_bytes(length),
            crc: u32::from_le_bytes(crc),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(&self.length.to_le_bytes());
        bytes[4..].copy_from_slice(&self.crc.to_le_bytes());
        bytes
    }

    /// Reads the header at `addr`.
    pub fn read(mem: &dyn AddressSpace, addr: usize) -> Header {
        Header {
            length: mem.read_u32(addr),
            crc: mem.read_u32(addr.wrapping_add(4)),
        }
    }
}

/// The integrity trailer that follows the monitor image `image`.
pub fn trailer(image: &[u8]) -> [u8; TRAILER_LEN] {
    crc::checksum(image).to_le_bytes()
}

/// Splits a sealed monitor image into its body and stored checksum.
pub fn unseal(sealed: &[u8]) -> Option<(&[u8], u32)> {
    if sealed.len() < TRAILER_LEN {
        return None;
    }
    let (body, tail) = sealed.split_at(sealed.len() - TRAILER_LEN);
    let mut stored = [0u8; TRAILER_LEN];
    stored.copy_from_slice(tail);
    Some((body, u32::from_le_bytes(stored)))
}

/// Boots the flash image staged at `flash` by copying it to `ram`.
#[derive(Debug)]
pub struct FlashLoader {
    flash: usize,
    ram: usize,
}

impl FlashLoader {
    pub fn new(flash: usize, ram: usize) -> FlashLoader {
        FlashLoader { flash, ram }
    }
}

impl BootSource for FlashLoader {
    fn load(
        &mut self,
        console: &mut dyn Console,
        mem: &mut dyn AddressSpace,
    ) -> Result<usize, BootError> {
        let header = Header::read(mem, self.flash);
        if !Header::valid_length(header.length) {
            return Err(BootError::InvalidLength(header.length));
        }

        let length = header.length as usize;
        cprintln!(console, "Loading {} bytes from flash...", length);
        mem::copy_bytes(mem, self.ram, self.flash.wrapping_add(HEADER_LEN), length);

        let actual = crc::checksum_range(mem, self.ram, length);
        if actual != header.crc {
            return Err(BootError::Crc { expected: header.crc, actual });
        }
        Ok(self.ram)
    }
}
