//! Processor control/status registers.
//!
//! Registers are named by a fixed table. Each one may be readable, writable,
//! or both; the direction is checked here, before the bus sees the access.

/// A named control/status register. The discriminant is its fixed numeric
/// identifier.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Csr {
    Ie = 1,
    Im,
    Ip,
    Icc,
    Dcc,
    Cc,
    Cfg,
    Eba,
    Dc,
    Deba,
    Jtx,
    Jrx,
    Bp0,
    Bp1,
    Bp2,
    Bp3,
    Wp0,
    Wp1,
    Wp2,
    Wp3,
}

use self::Csr::*;

impl Csr {
    pub const ALL: [Csr; 20] = [
        Ie, Im, Ip, Icc, Dcc, Cc, Cfg, Eba, Dc, Deba, Jtx, Jrx, Bp0, Bp1, Bp2, Bp3, Wp0, Wp1,
        Wp2, Wp3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Ie => "ie",
            Im => "im",
            Ip => "ip",
            Icc => "icc",
            Dcc => "dcc",
            Cc => "cc",
            Cfg => "cfg",
            Eba => "eba",
            Dc => "dc",
            Deba => "deba",
            Jtx => "jtx",
            Jrx => "jrx",
            Bp0 => "bp0",
            Bp1 => "bp1",
            Bp2 => "bp2",
            Bp3 => "bp3",
            Wp0 => "wp0",
            Wp1 => "wp1",
            Wp2 => "wp2",
            Wp3 => "wp3",
        }
    }

    /// Looks up a register by exact, case-sensitive name.
    pub fn from_name(name: &str) -> Option<Csr> {
        Csr::ALL.iter().copied().find(|csr| csr.name() == name)
    }

    /// Returns `true` if `rcsr` may read this register.
    pub fn is_readable(self) -> bool {
        match self {
            Ie | Im | Ip | Cc | Cfg | Eba | Deba | Jtx | Jrx => true,
            _ => false,
        }
    }

    /// The register a `wcsr` to `self` actually lands in, or `None` if
    /// `self` cannot be written.
    ///
    /// `dc` writes go to `dcc`.
    pub fn write_target(self) -> Option<Csr> {
        match self {
            Ip | Cc | Cfg => None,
            Dc => Some(Dcc),
            other => Some(other),
        }
    }
}

/// Direct register access. Only called for accesses the table allows.
pub trait CsrBus {
    fn read(&mut self, csr: Csr) -> u32;
    fn write(&mut self, csr: Csr, value: u32);
}
