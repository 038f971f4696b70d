//! The command table and the dispatcher.
//!
//! Commands are fixed at build time. The table below lists every command
//! this monitor knows; a `CommandSet` keeps the ones the board's
//! capabilities allow.

use crate::boot::{self, Board, Countdown, Source};
use crate::config::{Capabilities, Config, Region};
use crate::console::Console;
use crate::crc;
use crate::csr::{Csr, CsrBus};
use crate::error::CommandError;
use crate::mem::{self, AddressSpace};
use crate::memtest;
use crate::parse::{u32_arg, usize_arg, usize_or};
use crate::token::next_token;

/// Most arguments any command takes.
pub const MAX_ARGS: usize = 3;

/// Everything a command handler may touch.
pub struct Context<'a> {
    pub console: &'a mut dyn Console,
    pub mem: &'a mut dyn AddressSpace,
    pub csr: &'a mut dyn CsrBus,
    pub timer: &'a mut dyn Countdown,
    pub board: &'a mut dyn Board,
    pub config: &'a Config,
}

/// A command handler. `args` always has exactly `Command::args` entries;
/// arguments the operator left out are empty strings.
pub type Handler = fn(&mut Context<'_>, &[&str]) -> Result<(), CommandError>;

/// One entry of the command table.
pub struct Command {
    pub name: &'static str,
    pub help: &'static str,
    /// Arguments pulled from the line for the handler, optional ones
    /// included.
    pub args: usize,
    /// Hardware the command needs.
    pub requires: Capabilities,
    pub handler: Handler,
}

macro_rules! command {
    ($name:expr, $help:expr, $args:expr, $handler:expr) => {
        command!($name, $help, $args, Capabilities::empty(), $handler)
    };
    ($name:expr, $help:expr, $args:expr, $requires:expr, $handler:expr) => {
        Command {
            name: $name,
            help: $help,
            args: $args,
            requires: $requires,
            handler: $handler,
        }
    };
}

/// Number of entries in `COMMANDS`.
pub const COMMAND_COUNT: usize = 15;

/// Every command, in `help` order.
pub static COMMANDS: [Command; COMMAND_COUNT] = [
    command!("mr", "read address space", 2, mr),
    command!("mw", "write address space", 3, mw),
    command!("mc", "copy address space", 3, mc),
    command!("crc", "compute CRC32 of a part of the address space", 2, crc),
    command!("rcsr", "read processor CSR", 1, rcsr),
    command!("wcsr", "write processor CSR", 2, wcsr),
    command!("flushl2", "flush L2 cache", 0, flushl2),
    command!("netboot", "boot via network", 0, Capabilities::NETWORK, netboot),
    command!("serialboot", "boot via serial", 0, serialboot),
    command!("flashboot", "boot from flash", 0, Capabilities::FLASH, flashboot),
    command!("ddrinit", "initialize memory", 0, Capabilities::SDRAM, ddrinit),
    command!("memtest", "test main memory", 2, Capabilities::SDRAM, memtest),
    command!("revision", "display revision", 0, revision),
    command!("help", "list commands", 0, help),
    command!("csrs", "list processor CSRs", 0, csrs),
];

/// The commands available on this board, assembled once at startup.
pub struct CommandSet {
    commands: heapless::Vec<&'static Command, COMMAND_COUNT>,
}

impl CommandSet {
    /// Keeps the commands of `COMMANDS` whose requirements `caps` meets.
    pub fn new(caps: Capabilities) -> CommandSet {
        let mut commands = heapless::Vec::new();
        for command in COMMANDS.iter().filter(|c| caps.contains(c.requires)) {
            // COMMANDS and the set have the same capacity
            let _ = commands.push(command);
        }
        CommandSet { commands }
    }

    /// Finds a command by exact name.
    pub fn find(&self, name: &str) -> Option<&'static Command> {
        self.commands.iter().copied().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Command> + '_ {
        self.commands.iter().copied()
    }

    /// Runs the command on `line`.
    ///
    /// Unknown commands get one diagnostic line; a blank line gets nothing.
    /// Arguments beyond what the command takes are ignored.
    pub fn dispatch(&self, ctx: &mut Context<'_>, line: &str) {
        let mut cursor = line;
        let name = next_token(&mut cursor);
        if name.is_empty() {
            return;
        }

        let command = match self.find(name) {
            Some(command) => command,
            None => {
                cprintln!(ctx.console, "Command not found");
                return;
            }
        };

        let mut args = [""; MAX_ARGS];
        for arg in args.iter_mut().take(command.args) {
            *arg = next_token(&mut cursor);
        }

        log::debug!("dispatch: {} {:?}", command.name, &args[..command.args]);
        if let Err(e) = (command.handler)(ctx, &args[..command.args]) {
            cprintln!(ctx.console, "{}", e);
        }
    }
}

fn mr(ctx: &mut Context<'_>, args: &[&str]) -> Result<(), CommandError> {
    if args[0].is_empty() {
        return Err(CommandError::Usage("mr <address> [length]"));
    }
    let addr = usize_arg(args[0], "address")?;
    let len = usize_or(args[1], 4, "length")?;

    mem::dump(ctx.console, ctx.mem, addr, len);
    Ok(())
}

fn mw(ctx: &mut Context<'_>, args: &[&str]) -> Result<(), CommandError> {
    if args[0].is_empty() || args[1].is_empty() {
        return Err(CommandError::Usage("mw <address> <value> [count]"));
    }
    let addr = usize_arg(args[0], "address")?;
    let value = u32_arg(args[1], "value")?;
    let count = usize_or(args[2], 1, "count")?;

    mem::fill_words(ctx.mem, addr, value, count);
    Ok(())
}

fn mc(ctx: &mut Context<'_>, args: &[&str]) -> Result<(), CommandError> {
    if args[0].is_empty() || args[1].is_empty() {
        return Err(CommandError::Usage("mc <dst> <src> [count]"));
    }
    let dst = usize_arg(args[0], "destination address")?;
    let src = usize_arg(args[1], "source address")?;
    let count = usize_or(args[2], 1, "count")?;

    mem::copy_words(ctx.mem, dst, src, count);
    Ok(())
}

fn crc(ctx: &mut Context<'_>, args: &[&str]) -> Result<(), CommandError> {
    if args[0].is_empty() || args[1].is_empty() {
        return Err(CommandError::Usage("crc <address> <length>"));
    }
    let addr = usize_arg(args[0], "address")?;
    let len = usize_arg(args[1], "length")?;

    cprintln!(ctx.console, "CRC32: {:08x}", crc::checksum_range(ctx.mem, addr, len));
    Ok(())
}

fn rcsr(ctx: &mut Context<'_>, args: &[&str]) -> Result<(), CommandError> {
    if args[0].is_empty() {
        return Err(CommandError::Usage("rcsr <csr>"));
    }
    let csr = Csr::from_name(args[0]).ok_or(CommandError::UnknownCsr)?;
    if !csr.is_readable() {
        return Err(CommandError::CsrWriteOnly);
    }

    cprintln!(ctx.console, "{:08x}", ctx.csr.read(csr));
    Ok(())
}

fn wcsr(ctx: &mut Context<'_>, args: &[&str]) -> Result<(), CommandError> {
    if args[0].is_empty() || args[1].is_empty() {
        return Err(CommandError::Usage("wcsr <csr> <value>"));
    }
    let csr = Csr::from_name(args[0]).ok_or(CommandError::UnknownCsr)?;
    let value = u32_arg(args[1], "value")?;
    let target = csr.write_target().ok_or(CommandError::CsrReadOnly)?;

    ctx.csr.write(target, value);
    Ok(())
}

fn csrs(ctx: &mut Context<'_>, _: &[&str]) -> Result<(), CommandError> {
    for csr in Csr::ALL.iter() {
        let read = if csr.is_readable() { 'r' } else { '-' };
        let write = if csr.write_target().is_some() { 'w' } else { '-' };
        cprintln!(ctx.console, "{:<5}{}{}", csr.name(), read, write);
    }
    Ok(())
}

fn flushl2(ctx: &mut Context<'_>, _: &[&str]) -> Result<(), CommandError> {
    ctx.board.flush_l2();
    Ok(())
}

fn boot_from(ctx: &mut Context<'_>, source: Source) -> Result<(), CommandError> {
    Err(boot::attempt(ctx.console, ctx.mem, ctx.board, ctx.config, source).into())
}

fn netboot(ctx: &mut Context<'_>, _: &[&str]) -> Result<(), CommandError> {
    boot_from(ctx, Source::Network)
}

fn serialboot(ctx: &mut Context<'_>, _: &[&str]) -> Result<(), CommandError> {
    boot_from(ctx, Source::Serial)
}

fn flashboot(ctx: &mut Context<'_>, _: &[&str]) -> Result<(), CommandError> {
    boot_from(ctx, Source::Flash)
}

fn ddrinit(ctx: &mut Context<'_>, _: &[&str]) -> Result<(), CommandError> {
    if !ctx.board.init_memory(ctx.console) {
        cprintln!(ctx.console, "Memory initialization failed");
    }
    Ok(())
}

/// Bytes `memtest` covers when no length is given.
const MEMTEST_DEFAULT_LEN: usize = 1024 * 1024;

fn memtest(ctx: &mut Context<'_>, args: &[&str]) -> Result<(), CommandError> {
    let ram = ctx.config.main_ram;
    let base = usize_or(args[0], ram.base, "address")?;
    let size = usize_or(args[1], ram.size.min(MEMTEST_DEFAULT_LEN), "length")?;

    let report = memtest::run(ctx.mem, Region::new(base, size));
    if report.passed() {
        cprintln!(ctx.console, "Memtest OK ({} words)", report.words);
    } else {
        cprintln!(
            ctx.console,
            "Memtest failed: {}/{} words",
            report.errors,
            report.words
        );
    }
    Ok(())
}

fn revision(ctx: &mut Context<'_>, _: &[&str]) -> Result<(), CommandError> {
    cprintln!(ctx.console, "{:08x}", ctx.config.revision);
    Ok(())
}

fn help(ctx: &mut Context<'_>, _: &[&str]) -> Result<(), CommandError> {
    let commands = CommandSet::new(ctx.config.capabilities);
    cprintln!(ctx.console, "{}", ctx.config.name);
    cprintln!(ctx.console, "Available commands:");
    for command in commands.iter() {
        cprintln!(ctx.console, "{:<10} - {}", command.name, command.help);
    }
    Ok(())
}
