#![cfg_attr(not(test), no_std)]

//! The resident monitor: a line-oriented shell over raw memory and processor
//! control/status registers, a self-integrity check, and the timed boot
//! sequencer that picks flash, serial or network as the boot source.
//!
//! Nothing in this crate touches hardware directly. Every device is reached
//! through a collaborator trait ([`Console`], [`Countdown`], [`AddressSpace`],
//! [`CsrBus`], [`Board`]) so the whole monitor runs unchanged against mocks on
//! the host.

#[macro_use]
pub mod console;

pub mod boot;
pub mod commands;
pub mod config;
pub mod crc;
pub mod csr;
pub mod error;
pub mod image;
pub mod integrity;
pub mod line;
pub mod mem;
pub mod memtest;
pub mod parse;
pub mod shell;
pub mod token;

#[cfg(test)]
mod testing;

pub use crate::boot::{Board, BootOutcome, BootSource, Countdown, Source};
pub use crate::commands::{Command, CommandSet, Context};
pub use crate::config::{Capabilities, Config, Region};
pub use crate::console::Console;
pub use crate::csr::{Csr, CsrBus};
pub use crate::error::{BootError, CommandError};
pub use crate::mem::{AddressSpace, Raw};
pub use crate::shell::{Monitor, Startup};
