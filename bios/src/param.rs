use monitor::{Capabilities, Config, Region};

include!(concat!(env!("OUT_DIR"), "/revision.rs"));

pub const BIOS_NAME: &str = "BIOS";

/// Where the GPU firmware loads us (`kernel_address` in config.txt).
pub const BIOS_START: usize = 0x4000000;

/// Applications run from here, the address the Pi firmware would have used.
pub const MAIN_RAM_BASE: usize = 0x80000;
pub const MAIN_RAM_SIZE: usize = FLASH_IMAGE_ADDR - MAIN_RAM_BASE;

/// The flash boot image, staged by the GPU firmware (`initramfs` in
/// config.txt).
pub const FLASH_IMAGE_ADDR: usize = 0x2000000;

/// Window probed by the startup memory check.
pub const MEMORY_PROBE: Region = Region::new(MAIN_RAM_BASE, 64 * 1024);

/// Per-byte timeout while a serial transfer is in progress.
pub const SERIAL_TIMEOUT_MS: u64 = 1000;

pub fn capabilities() -> Capabilities {
    let mut caps = Capabilities::empty();
    if cfg!(feature = "flash") {
        caps |= Capabilities::FLASH;
    }
    if cfg!(feature = "sdram") {
        caps |= Capabilities::SDRAM;
    }
    caps
}

/// The build's configuration. `image` is the span covered by the CRC
/// trailer that `mkbios seal` appends.
pub fn config() -> Config {
    extern "C" {
        static __text_start: u8;
        static _edata: u8;
    }

    let start = unsafe { &__text_start as *const u8 as usize };
    let end = unsafe { &_edata as *const u8 as usize };

    let mut config = Config::new(
        BIOS_NAME,
        capabilities(),
        Region::new(MAIN_RAM_BASE, MAIN_RAM_SIZE),
    );
    config.revision = REVISION;
    config.image = Some(Region::new(start, end - start));
    config
}
