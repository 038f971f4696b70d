//! CRC-32 (the zlib/Ethernet polynomial) over slices and address ranges.

use ::crc::{Crc, CRC_32_ISO_HDLC};

use crate::mem::AddressSpace;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Bytes pulled from the address space per digest update.
const CHUNK: usize = 64;

/// CRC-32 of `bytes`.
pub fn checksum(bytes: &[u8]) -> u32 {
    CRC32.checksum(bytes)
}

/// CRC-32 of the `len` bytes starting at `addr`.
pub fn checksum_range(mem: &dyn AddressSpace, addr: usize, len: usize) -> u32 {
    let mut digest = CRC32.digest();
    let mut buf = [0u8; CHUNK];
    let mut done = 0;
    while done < len {
        let n = (len - done).min(CHUNK);
        for (i, b) in buf[..n].iter_mut().enumerate() {
            *b = mem.read_u8(addr.wrapping_add(done + i));
        }
        digest.update(&buf[..n]);
        done += n;
    }
    digest.finalize()
}
