use bitflags::bitflags;

bitflags! {
    /// Hardware present in this build. Decides which commands exist and
    /// which boot sources are tried.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        /// A flash boot image can be staged at a fixed address.
        const FLASH = 1 << 0;
        /// A network interface with a transfer protocol.
        const NETWORK = 1 << 1;
        /// A memory controller that needs initialization before boot.
        const SDRAM = 1 << 2;
    }
}

/// A span of the address space, `[base, base + size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub base: usize,
    pub size: usize,
}

impl Region {
    pub const fn new(base: usize, size: usize) -> Region {
        Region { base, size }
    }

    /// One past the last address of the region.
    pub fn end(&self) -> usize {
        self.base + self.size
    }
}

/// Build-time configuration of the monitor.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shown in the banner and in `help`.
    pub name: &'static str,
    /// Build identifier printed by `revision`.
    pub revision: u32,
    pub capabilities: Capabilities,
    /// Seconds the operator has to interrupt the automatic boot.
    pub boot_delay_secs: u32,
    /// The running firmware image, excluding its checksum trailer. The
    /// trailer sits at `image.end()`.
    pub image: Option<Region>,
    /// Main RAM. `memtest` defaults to its start.
    pub main_ram: Region,
}

impl Config {
    /// Seconds of the default boot countdown.
    pub const DEFAULT_BOOT_DELAY: u32 = 2;

    pub fn new(name: &'static str, capabilities: Capabilities, main_ram: Region) -> Config {
        Config {
            name,
            revision: 0,
            capabilities,
            boot_delay_secs: Config::DEFAULT_BOOT_DELAY,
            image: None,
            main_ram,
        }
    }

    pub fn has(&self, caps: Capabilities) -> bool {
        self.capabilities.contains(caps)
    }
}
