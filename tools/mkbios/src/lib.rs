//! Producers and checkers for the two image formats the BIOS understands:
//! the BIOS image itself, sealed with a CRC-32 trailer, and flash boot
//! images, prefixed with a length and CRC-32 header.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use monitor::crc;
use monitor::image::{self, Header, HEADER_LEN, MAX_PAYLOAD, MIN_PAYLOAD};

/// The link script places `_edata`, and so the trailer, on this boundary.
pub const SEAL_ALIGN: usize = 4;

/// Returns `firmware` zero-padded to `SEAL_ALIGN`, followed by the
/// integrity trailer of the padded body.
pub fn seal(firmware: &[u8]) -> Vec<u8> {
    let body_len = align_up(firmware.len(), SEAL_ALIGN);
    let mut sealed = Vec::with_capacity(body_len + image::TRAILER_LEN);
    sealed.extend_from_slice(firmware);
    sealed.resize(body_len, 0);
    let trailer = image::trailer(&sealed);
    sealed.extend_from_slice(&trailer);
    sealed
}

fn align_up(n: usize, align: usize) -> usize {
    (n + align - 1) / align * align
}

/// Returns `payload` behind a flash boot header.
pub fn flash_image(payload: &[u8]) -> Result<Vec<u8>> {
    let header = match Header::for_payload(payload) {
        Some(header) => header,
        None => bail!(
            "payload is {} bytes; flash images carry {}..={} bytes",
            payload.len(),
            MIN_PAYLOAD,
            MAX_PAYLOAD
        ),
    };

    let mut image = Vec::with_capacity(HEADER_LEN + payload.len());
    image.extend_from_slice(&header.to_bytes());
    image.extend_from_slice(payload);
    Ok(image)
}

/// Checks a sealed BIOS image, returning its checksum.
pub fn verify_sealed(sealed: &[u8]) -> Result<u32> {
    let (body, stored) = match image::unseal(sealed) {
        Some(parts) => parts,
        None => bail!("image is {} bytes, too short to carry a trailer", sealed.len()),
    };
    if body.len() % SEAL_ALIGN != 0 {
        bail!(
            "image body is {} bytes; the trailer must sit on a {}-byte boundary",
            body.len(),
            SEAL_ALIGN
        );
    }
    let actual = crc::checksum(body);
    if actual != stored {
        bail!("CRC failed (expected {:08x}, got {:08x})", stored, actual);
    }
    Ok(actual)
}

/// Checks a flash boot image the way the BIOS does before booting it,
/// returning the payload checksum.
pub fn verify_flash(flash: &[u8]) -> Result<u32> {
    if flash.len() < HEADER_LEN {
        bail!("image is {} bytes, too short to carry a header", flash.len());
    }

    let mut bytes = [0u8; HEADER_LEN];
    bytes.copy_from_slice(&flash[..HEADER_LEN]);
    let header = Header::from_bytes(bytes);
    if !Header::valid_length(header.length) {
        bail!("Invalid flash boot image length {}", header.length);
    }

    let payload = &flash[HEADER_LEN..];
    let length = header.length as usize;
    if payload.len() < length {
        bail!("header claims {} bytes but only {} follow", length, payload.len());
    }

    let actual = crc::checksum(&payload[..length]);
    if actual != header.crc {
        bail!("CRC mismatch (expected {:08x}, got {:08x})", header.crc, actual);
    }
    Ok(actual)
}

/// `out` if given, else `input` with `extension` appended.
pub fn output_path(input: &Path, out: Option<PathBuf>, extension: &str) -> PathBuf {
    out.unwrap_or_else(|| {
        let mut name = input.as_os_str().to_owned();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    })
}

pub fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

pub fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_image_verifies() {
        let sealed = seal(b"12345678");
        assert_eq!(&sealed[..8], b"12345678");
        assert_eq!(&sealed[8..], &0x9ae0daafu32.to_le_bytes());
        assert_eq!(verify_sealed(&sealed).unwrap(), 0x9ae0daaf);
    }

    #[test]
    fn trailer_lands_on_the_aligned_end() {
        for len in 0..=9usize {
            let firmware = vec![0xa5u8; len];
            let sealed = seal(&firmware);
            let at = align_up(len, SEAL_ALIGN);
            assert_eq!(sealed.len(), at + image::TRAILER_LEN);
            assert!(sealed[len..at].iter().all(|&b| b == 0));
            assert_eq!(&sealed[at..], &crc::checksum(&sealed[..at]).to_le_bytes());
            verify_sealed(&sealed).unwrap();
        }
    }

    #[test]
    fn unaligned_trailer_is_refused() {
        let mut sealed = b"123456789".to_vec();
        sealed.extend_from_slice(&image::trailer(b"123456789"));
        let err = verify_sealed(&sealed).unwrap_err();
        assert!(err.to_string().contains("4-byte boundary"));
    }

    #[test]
    fn flipped_bit_fails_verification() {
        let mut sealed = seal(&[0x5a; 100]);
        sealed[17] ^= 0x10;
        let err = verify_sealed(&sealed).unwrap_err();
        assert!(err.to_string().starts_with("CRC failed (expected "));
    }

    #[test]
    fn flash_image_round_trip() {
        let payload: Vec<u8> = (0..64).collect();
        let image = flash_image(&payload).unwrap();
        assert_eq!(&image[..4], &64u32.to_le_bytes());
        assert_eq!(&image[HEADER_LEN..], &payload[..]);
        assert_eq!(verify_flash(&image).unwrap(), crc::checksum(&payload));
    }

    #[test]
    fn short_payload_is_refused() {
        let err = flash_image(&[0; 31]).unwrap_err();
        assert!(err.to_string().contains("31 bytes"));
    }

    #[test]
    fn truncated_flash_image() {
        let image = flash_image(&[1; 40]).unwrap();
        let err = verify_flash(&image[..30]).unwrap_err();
        assert_eq!(err.to_string(), "header claims 40 bytes but only 22 follow");
    }

    #[test]
    fn default_output_path() {
        let path = output_path(Path::new("build/bios.bin"), None, "sealed");
        assert_eq!(path, PathBuf::from("build/bios.bin.sealed"));
        let path = output_path(Path::new("a"), Some(PathBuf::from("b")), "x");
        assert_eq!(path, PathBuf::from("b"));
    }
}
