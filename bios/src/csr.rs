//! The monitor's register names mapped onto AArch64 system registers.
//!
//! | name      | read                 | write                      |
//! |-----------|----------------------|----------------------------|
//! | ie        | `!DAIF.I`            | `daifclr`/`daifset`        |
//! | im        | IRQ enable bank 1    | IRQ enable bank 1          |
//! | ip        | IRQ pending bank 1   |                            |
//! | icc       |                      | `ic iallu`                 |
//! | dcc, dc   |                      | `dc civac` at the value    |
//! | cc        | `CNTPCT_EL0`         |                            |
//! | cfg       | `MIDR_EL1`           |                            |
//! | eba       | `VBAR_EL1`           | `VBAR_EL1`                 |
//! | deba      | `VBAR_EL2`           | `VBAR_EL2`                 |
//! | jtx       | `MDCCSR_EL0`         | `DBGDTRTX_EL0`             |
//! | jrx       | `DBGDTRRX_EL0`       | `OSDTRRX_EL1`              |
//! | bp0..bp3  |                      | `DBGBVR<n>_EL1`            |
//! | wp0..wp3  |                      | `DBGWVR<n>_EL1`            |
//!
//! The EL2 registers read as zero and ignore writes below EL2.

use core::arch::asm;

use monitor::{Csr, CsrBus};
use pi::interrupt::Controller;

use crate::cache;

macro_rules! mrs {
    ($reg:literal) => {{
        let value: u64;
        unsafe { asm!(concat!("mrs {}, ", $reg), out(reg) value, options(nomem, nostack)) };
        value
    }};
}

macro_rules! msr {
    ($reg:literal, $value:expr) => {{
        let value: u64 = $value;
        unsafe { asm!(concat!("msr ", $reg, ", {}"), "isb", in(reg) value, options(nostack)) };
    }};
}

/// `DAIF.I`, set while IRQs are masked.
const DAIF_I: u64 = 1 << 7;

fn current_el() -> u64 {
    (mrs!("CurrentEL") >> 2) & 0b11
}

/// The processor's own registers.
pub struct SysRegs {
    irq: Controller,
}

impl SysRegs {
    pub fn new() -> SysRegs {
        SysRegs { irq: Controller::new() }
    }
}

impl CsrBus for SysRegs {
    fn read(&mut self, csr: Csr) -> u32 {
        let value = match csr {
            Csr::Ie => (mrs!("DAIF") & DAIF_I == 0) as u64,
            Csr::Im => self.irq.enabled_mask() as u64,
            Csr::Ip => self.irq.pending_mask() as u64,
            Csr::Cc => mrs!("CNTPCT_EL0"),
            Csr::Cfg => mrs!("MIDR_EL1"),
            Csr::Eba => mrs!("VBAR_EL1"),
            Csr::Deba if current_el() >= 2 => mrs!("VBAR_EL2"),
            Csr::Jtx => mrs!("MDCCSR_EL0"),
            Csr::Jrx => mrs!("DBGDTRRX_EL0"),
            other => {
                log::warn!("csr: read of {} not supported", other.name());
                0
            }
        };
        // The monitor's registers are 32 bits wide.
        value as u32
    }

    fn write(&mut self, csr: Csr, value: u32) {
        let wide = value as u64;
        match csr {
            Csr::Ie if value & 1 != 0 => unsafe { asm!("msr daifclr, #2", options(nostack)) },
            Csr::Ie => unsafe { asm!("msr daifset, #2", options(nostack)) },
            Csr::Im => self.irq.set_enabled_mask(value),
            Csr::Icc => cache::clear_icache(),
            Csr::Dcc => unsafe { cache::clean_invalidate_line(value as usize) },
            Csr::Eba => msr!("VBAR_EL1", wide),
            Csr::Deba if current_el() >= 2 => msr!("VBAR_EL2", wide),
            Csr::Jtx => msr!("DBGDTRTX_EL0", wide),
            Csr::Jrx => msr!("OSDTRRX_EL1", wide),
            Csr::Bp0 => msr!("DBGBVR0_EL1", wide),
            Csr::Bp1 => msr!("DBGBVR1_EL1", wide),
            Csr::Bp2 => msr!("DBGBVR2_EL1", wide),
            Csr::Bp3 => msr!("DBGBVR3_EL1", wide),
            Csr::Wp0 => msr!("DBGWVR0_EL1", wide),
            Csr::Wp1 => msr!("DBGWVR1_EL1", wide),
            Csr::Wp2 => msr!("DBGWVR2_EL1", wide),
            Csr::Wp3 => msr!("DBGWVR3_EL1", wide),
            other => log::warn!("csr: write of {} not supported", other.name()),
        }
    }
}
