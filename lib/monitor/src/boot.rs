//! Boot source selection.
//!
//! The sequencer runs once at startup: it counts down while polling the
//! console, then either hands control to the monitor (the operator aborted)
//! or works through the boot sources in priority order. A source that
//! succeeds never returns; one that returns has failed and the next is tried.

use core::fmt;

use crate::config::{Capabilities, Config};
use crate::console::Console;
use crate::error::BootError;
use crate::mem::AddressSpace;

/// Aborts the automatic boot.
pub const KEY_QUIT: u8 = b'Q';
/// Escape also aborts.
pub const KEY_ESCAPE: u8 = 0x1b;
/// Boots from serial right away. Terminals send it for F7.
pub const KEY_SERIAL: u8 = 0x06;
/// Boots from the network right away. Terminals send it for F8.
pub const KEY_NETWORK: u8 = 0x07;

/// A place an application image can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flash,
    Serial,
    Network,
}

impl Source {
    /// Automatic boot order.
    pub const PRIORITY: [Source; 3] = [Source::Flash, Source::Serial, Source::Network];

    /// Hardware the source needs, if any.
    pub fn requires(self) -> Capabilities {
        match self {
            Source::Flash => Capabilities::FLASH,
            Source::Serial => Capabilities::empty(),
            Source::Network => Capabilities::NETWORK,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Source::Flash => "flash",
            Source::Serial => "serial",
            Source::Network => "network",
        })
    }
}

/// A loader for one boot source.
pub trait BootSource {
    /// Brings an application image into memory and returns its entry point.
    fn load(
        &mut self,
        console: &mut dyn Console,
        mem: &mut dyn AddressSpace,
    ) -> Result<usize, BootError>;
}

/// The countdown timer the sequencer waits on.
///
/// `remaining` reports the value captured by the last `latch`, not a live
/// reading.
pub trait Countdown {
    /// Ticks per second.
    fn frequency(&self) -> u32;
    fn set_enabled(&mut self, enabled: bool);
    /// Value reloaded on expiry; `0` makes the timer one-shot.
    fn set_reload(&mut self, ticks: u32);
    /// Starts counting down from `ticks`.
    fn load(&mut self, ticks: u32);
    /// Captures the current value for `remaining`.
    fn latch(&mut self);
    fn remaining(&self) -> u32;
}

/// Board services outside the monitor proper.
pub trait Board {
    /// Brings up the memory subsystem. `false` means main RAM cannot be
    /// trusted and nothing must be booted from it.
    fn init_memory(&mut self, console: &mut dyn Console) -> bool;

    /// Writes back and invalidates the L2 cache.
    fn flush_l2(&mut self);

    /// The loader for `source`, if the board has one.
    fn source(&mut self, source: Source) -> Option<&mut dyn BootSource>;

    /// Transfers control to `entry`. There is no way back.
    fn jump(&mut self, entry: usize) -> !;
}

/// Where the countdown stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// `Q` or escape.
    Aborted,
    /// A boot hotkey.
    Hotkey(Source),
    /// The countdown ran out.
    TimedOut,
}

/// How a boot sequence ended, given that it returned at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// The operator stopped the automatic boot.
    Aborted,
    /// The operator picked a source with a hotkey and it failed.
    Hotkey(Source),
    /// Every available source was tried and failed.
    NoBootMedium,
}

/// Everything the sequencer needs for one run.
pub struct Sequencer<'a> {
    pub console: &'a mut dyn Console,
    pub timer: &'a mut dyn Countdown,
    pub mem: &'a mut dyn AddressSpace,
    pub board: &'a mut dyn Board,
    pub config: &'a Config,
}

impl<'a> Sequencer<'a> {
    /// Runs the countdown, then the boot sources. Returns only if nothing
    /// was booted.
    pub fn run(&mut self) -> BootOutcome {
        match self.wait() {
            Wait::Aborted => {
                cprintln!(self.console, "Aborted");
                BootOutcome::Aborted
            }
            Wait::Hotkey(source) => {
                let e = attempt(self.console, self.mem, self.board, self.config, source);
                cprintln!(self.console, "{}", e);
                BootOutcome::Hotkey(source)
            }
            Wait::TimedOut => {
                for &source in Source::PRIORITY.iter() {
                    if !self.config.has(source.requires()) {
                        continue;
                    }
                    let e = attempt(self.console, self.mem, self.board, self.config, source);
                    cprintln!(self.console, "{}", e);
                }
                cprintln!(self.console, "No boot medium found");
                BootOutcome::NoBootMedium
            }
        }
    }

    /// Announces the countdown and polls the console until it runs out or a
    /// recognized key arrives. Other keys are swallowed.
    pub fn wait(&mut self) -> Wait {
        let network = self.config.has(Capabilities::NETWORK);
        let secs = self.config.boot_delay_secs;

        cprintln!(self.console, "Automatic boot in {} seconds...", secs);
        cprintln!(self.console, "Q/ESC: abort boot");
        cprintln!(self.console, "F7:    boot from serial");
        if network {
            cprintln!(self.console, "F8:    boot from network");
        }

        let ticks = self.timer.frequency().saturating_mul(secs);
        self.timer.set_enabled(false);
        self.timer.set_reload(0);
        self.timer.load(ticks);
        self.timer.set_enabled(true);
        self.timer.latch();

        let result = loop {
            if self.timer.remaining() == 0 {
                break Wait::TimedOut;
            }
            match self.console.poll_byte() {
                Some(KEY_QUIT) | Some(KEY_ESCAPE) => break Wait::Aborted,
                Some(KEY_SERIAL) => break Wait::Hotkey(Source::Serial),
                Some(KEY_NETWORK) if network => break Wait::Hotkey(Source::Network),
                _ => {}
            }
            self.timer.latch();
        };
        self.timer.set_enabled(false);
        log::debug!("boot: countdown ended with {:?}", result);
        result
    }
}

/// Tries to boot from `source`. Returns only on failure, with the reason.
pub fn attempt(
    console: &mut dyn Console,
    mem: &mut dyn AddressSpace,
    board: &mut dyn Board,
    config: &Config,
    source: Source,
) -> BootError {
    if !config.has(source.requires()) {
        return BootError::Unavailable;
    }

    cprintln!(console, "Booting from {}...", source);
    log::debug!("boot: trying {}", source);
    let loaded = match board.source(source) {
        Some(loader) => loader.load(console, mem),
        None => Err(BootError::Unavailable),
    };
    match loaded {
        Ok(entry) => {
            log::debug!("boot: {} image entry at {:#x}", source, entry);
            board.jump(entry)
        }
        Err(e) => {
            log::debug!("boot: {} failed: {}", source, e);
            e
        }
    }
}
