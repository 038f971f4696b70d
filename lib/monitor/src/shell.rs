//! The monitor loop.

use crate::boot::{Board, BootOutcome, Countdown, Sequencer};
use crate::commands::{CommandSet, Context};
use crate::config::{Capabilities, Config};
use crate::console::Console;
use crate::csr::{Csr, CsrBus};
use crate::integrity;
use crate::line::{read_line, LineBuf};
use crate::mem::AddressSpace;

/// Printed before every command line: the name in bold.
const PROMPT_START: &str = "\x1b[1m";
const PROMPT_END: &str = "\x1b[0m ";

/// What startup did, for the curious.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Startup {
    /// `None` when the build carries no image span.
    pub integrity: Option<integrity::Verdict>,
    /// `None` when memory initialization failed and boot was skipped.
    pub boot: Option<BootOutcome>,
}

/// The resident monitor.
pub struct Monitor<'a> {
    ctx: Context<'a>,
    commands: CommandSet,
    line: LineBuf,
}

impl<'a> Monitor<'a> {
    pub fn new(
        console: &'a mut dyn Console,
        mem: &'a mut dyn AddressSpace,
        csr: &'a mut dyn CsrBus,
        timer: &'a mut dyn Countdown,
        board: &'a mut dyn Board,
        config: &'a Config,
    ) -> Monitor<'a> {
        Monitor {
            ctx: Context { console, mem, csr, timer, board, config },
            commands: CommandSet::new(config.capabilities),
            line: LineBuf::new(),
        }
    }

    /// Checks the firmware image, brings up memory, then runs the boot
    /// sequence. Returns if nothing was booted.
    ///
    /// Boot is skipped when memory initialization fails: the monitor stays
    /// usable to diagnose the memory, but nothing is run from it.
    pub fn startup(&mut self) -> Startup {
        let ctx = &mut self.ctx;
        let config = ctx.config;

        cprintln!(ctx.console, "\n{}", config.name);
        cprintln!(ctx.console, "Revision {:08x}\n", config.revision);

        let integrity = config
            .image
            .map(|image| integrity::report(ctx.console, ctx.mem, config.name, image));
        let id = ctx.csr.read(Csr::Cfg);
        cprintln!(ctx.console, "Running on CPU {:08x}", id);

        let memory_ok = if config.has(Capabilities::SDRAM) {
            ctx.board.init_memory(ctx.console)
        } else {
            true
        };

        let boot = if memory_ok {
            Some(
                Sequencer {
                    console: &mut *ctx.console,
                    timer: &mut *ctx.timer,
                    mem: &mut *ctx.mem,
                    board: &mut *ctx.board,
                    config,
                }
                .run(),
            )
        } else {
            log::error!("memory initialization failed; not booting");
            cprintln!(ctx.console, "Memory initialization failed");
            None
        };

        Startup { integrity, boot }
    }

    /// Prompts for, reads and runs one command line.
    pub fn step(&mut self) {
        let ctx = &mut self.ctx;
        cprint!(ctx.console, "{}{}>{}", PROMPT_START, ctx.config.name, PROMPT_END);
        let line = read_line(ctx.console, &mut self.line);
        self.commands.dispatch(ctx, line);
    }

    /// Runs `startup` once, then commands forever.
    pub fn run(&mut self) -> ! {
        self.startup();
        loop {
            self.step();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::{Source, KEY_QUIT};
    use crate::config::Region;
    use crate::crc;
    use crate::testing::*;

    const IMAGE: Region = Region::new(0x100, 0x40);

    fn config(caps: Capabilities) -> Config {
        let mut config = Config::new("BIOS", caps, Region::new(0x200, 0x100));
        config.revision = 0xabad_1dea;
        config.image = Some(IMAGE);
        config
    }

    fn sealed_memory() -> MockMemory {
        let mut mem = MockMemory::new(0x100, 0x200);
        let body: Vec<u8> = (0..IMAGE.size as u8).collect();
        mem.load(IMAGE.base, &body);
        mem.load(IMAGE.end(), &crc::checksum(&body).to_le_bytes());
        mem
    }

    #[test]
    fn startup_checks_then_boots_in_order() {
        let config = config(Capabilities::all());
        let mut con = MockConsole::new();
        let mut mem = sealed_memory();
        let mut csr = MockCsr::new();
        csr.set(Csr::Cfg, 0x410f_d034);
        let mut timer = MockTimer::expired();
        let mut board = MockBoard::new();

        let startup = Monitor::new(&mut con, &mut mem, &mut csr, &mut timer, &mut board, &config)
            .startup();

        assert!(startup.integrity.unwrap().passed());
        assert_eq!(startup.boot, Some(BootOutcome::NoBootMedium));
        assert_eq!(board.memory_inits, 1);
        assert_eq!(board.attempts(), [Source::Flash, Source::Serial, Source::Network]);

        let out = con.output();
        assert!(out.starts_with("\nBIOS\nRevision abad1dea\n\n"));
        let crc_line = out.find("BIOS CRC passed").unwrap();
        let id_line = out.find("Running on CPU 410fd034\n").unwrap();
        let countdown = out.find("Automatic boot in 2 seconds...").unwrap();
        assert!(crc_line < id_line && id_line < countdown);
        assert_eq!(csr.reads, [Csr::Cfg]);
    }

    #[test]
    fn corrupted_image_still_boots() {
        let config = config(Capabilities::empty());
        let mut con = MockConsole::new();
        let mut mem = sealed_memory();
        mem.load(IMAGE.end(), &[0xef, 0xbe, 0xad, 0xde]);
        let mut csr = MockCsr::new();
        let mut timer = MockTimer::expired();
        let mut board = MockBoard::new();

        let startup = Monitor::new(&mut con, &mut mem, &mut csr, &mut timer, &mut board, &config)
            .startup();

        let verdict = startup.integrity.unwrap();
        assert!(!verdict.passed());
        assert_eq!(startup.boot, Some(BootOutcome::NoBootMedium));
        assert_eq!(board.attempts(), [Source::Serial]);
        assert!(con
            .output()
            .contains(&format!("BIOS CRC failed (expected deadbeef, got {:08x})", verdict.actual)));
    }

    #[test]
    fn memory_failure_skips_boot() {
        let config = config(Capabilities::all());
        let mut con = MockConsole::new();
        let mut mem = sealed_memory();
        let mut csr = MockCsr::new();
        let mut timer = MockTimer::expired();
        let mut board = MockBoard::new();
        board.memory_ok = false;

        let startup = Monitor::new(&mut con, &mut mem, &mut csr, &mut timer, &mut board, &config)
            .startup();

        assert_eq!(startup.boot, None);
        assert!(board.attempts().is_empty());
        assert_eq!(timer.latches, 0);
        let out = con.output();
        assert!(out.ends_with("Memory initialization failed\n"));
        assert!(!out.contains("Automatic boot"));
    }

    #[test]
    fn no_sdram_means_no_memory_init() {
        let mut config = config(Capabilities::empty());
        config.image = None;
        let mut con = MockConsole::with_input(&[KEY_QUIT]);
        let mut mem = sealed_memory();
        let mut csr = MockCsr::new();
        let mut timer = MockTimer::new(10, 1);
        let mut board = MockBoard::new();
        board.memory_ok = false;

        let startup = Monitor::new(&mut con, &mut mem, &mut csr, &mut timer, &mut board, &config)
            .startup();

        assert_eq!(startup, Startup { integrity: None, boot: Some(BootOutcome::Aborted) });
        assert_eq!(board.memory_inits, 0);
    }

    #[test]
    fn step_prompts_reads_and_dispatches() {
        let config = config(Capabilities::empty());
        let mut con = MockConsole::with_input(b"mw 0x200 7\rmr 0x200\r\r");
        let mut mem = sealed_memory();
        let mut csr = MockCsr::new();
        let mut timer = MockTimer::expired();
        let mut board = MockBoard::new();

        {
            let mut monitor =
                Monitor::new(&mut con, &mut mem, &mut csr, &mut timer, &mut board, &config);
            monitor.step();
            monitor.step();
            monitor.step();
        }

        assert_eq!(mem.read_u32(0x200), 7);
        let out = con.output();
        assert!(out.starts_with("\x1b[1mBIOS>\x1b[0m mw 0x200 7\n\x1b[1mBIOS>\x1b[0m mr 0x200\n"));
        assert!(out.contains("0x00000200  07 00 00 00 "));
        assert!(out.ends_with("\x1b[1mBIOS>\x1b[0m \n"));
    }
}
