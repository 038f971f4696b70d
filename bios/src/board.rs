use core::arch::asm;
use core::fmt::Write;

use monitor::image::FlashLoader;
use monitor::{memtest, Board, BootSource, Console, Raw, Region, Source};

use crate::cache;
use crate::param::{FLASH_IMAGE_ADDR, MAIN_RAM_BASE, MAIN_RAM_SIZE, MEMORY_PROBE};
use crate::serial::SerialBoot;

/// Branches to the address `addr` unconditionally.
unsafe fn jump_to(addr: usize) -> ! {
    asm!("br {x}", x = in(reg) addr, options(noreturn));
}

/// The Raspberry Pi 3.
pub struct PiBoard {
    flash: FlashLoader,
    serial: SerialBoot,
}

impl PiBoard {
    pub fn new() -> PiBoard {
        PiBoard {
            flash: FlashLoader::new(FLASH_IMAGE_ADDR, MAIN_RAM_BASE),
            serial: SerialBoot::new(Region::new(MAIN_RAM_BASE, MAIN_RAM_SIZE)),
        }
    }
}

impl Board for PiBoard {
    /// SDRAM is trained by the GPU before we run, so bringing it up means
    /// checking that it holds a pattern.
    fn init_memory(&mut self, console: &mut dyn Console) -> bool {
        let mut ram = unsafe { Raw::new() };
        let report = memtest::run(&mut ram, MEMORY_PROBE);
        if !report.passed() {
            let _ = writeln!(
                console,
                "Memory probe at 0x{:08x}: {}/{} words failed",
                MEMORY_PROBE.base, report.errors, report.words
            );
        }
        report.passed()
    }

    fn flush_l2(&mut self) {
        cache::clean_invalidate_dcache(MAIN_RAM_BASE, MAIN_RAM_SIZE);
    }

    fn source(&mut self, source: Source) -> Option<&mut dyn BootSource> {
        match source {
            Source::Flash if cfg!(feature = "flash") => Some(&mut self.flash as &mut dyn BootSource),
            Source::Serial => Some(&mut self.serial as &mut dyn BootSource),
            _ => None,
        }
    }

    fn jump(&mut self, entry: usize) -> ! {
        log::debug!("jumping to 0x{:08x}", entry);
        self.flush_l2();
        cache::clear_icache();
        unsafe { jump_to(entry) }
    }
}
