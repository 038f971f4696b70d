#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]

#[macro_use]
pub mod console;

#[cfg(not(test))]
mod init;

pub mod board;
pub mod cache;
pub mod csr;
pub mod logger;
pub mod mutex;
pub mod param;
pub mod serial;
pub mod timer;

use monitor::{Monitor, Raw};

use board::PiBoard;
use console::Terminal;
use csr::SysRegs;
use timer::PiCountdown;

fn kmain() -> ! {
    unsafe { logger::init() };

    let config = param::config();
    log::debug!("{:?}", config);

    let mut console = Terminal;
    let mut mem = unsafe { Raw::new() };
    let mut csr = SysRegs::new();
    let mut timer = PiCountdown::new();
    let mut board = PiBoard::new();

    Monitor::new(&mut console, &mut mem, &mut csr, &mut timer, &mut board, &config).run()
}
