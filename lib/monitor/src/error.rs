use core::fmt;

/// Why a command did nothing. `Display` renders the exact diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// A mandatory argument is missing. Holds the usage line.
    Usage(&'static str),
    /// An argument did not parse. Holds the argument's name.
    Incorrect(&'static str),
    /// No register by that name.
    UnknownCsr,
    /// `rcsr` on a register that can only be written.
    CsrWriteOnly,
    /// `wcsr` on a register that can only be read.
    CsrReadOnly,
    /// A boot command's source failed and returned.
    Boot(BootError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CommandError::Usage(usage) => f.write_str(usage),
            CommandError::Incorrect(field) => write!(f, "incorrect {}", field),
            CommandError::UnknownCsr => f.write_str("incorrect csr"),
            CommandError::CsrWriteOnly => f.write_str("csr write only"),
            CommandError::CsrReadOnly => f.write_str("csr read only"),
            CommandError::Boot(ref e) => write!(f, "{}", e),
        }
    }
}

impl From<BootError> for CommandError {
    fn from(e: BootError) -> CommandError {
        CommandError::Boot(e)
    }
}

/// Why a boot source returned instead of transferring control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// The build has no loader for this source.
    Unavailable,
    /// A flash image header announced an impossible length.
    InvalidLength(u32),
    /// The loaded image does not match its checksum.
    Crc { expected: u32, actual: u32 },
    /// The transfer protocol gave up.
    Transfer(&'static str),
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BootError::Unavailable => f.write_str("boot source unavailable"),
            BootError::InvalidLength(_) => f.write_str("Error: Invalid flash boot image length"),
            BootError::Crc { expected, actual } => write!(
                f,
                "CRC mismatch (expected {:08x}, got {:08x})",
                expected, actual
            ),
            BootError::Transfer(why) => write!(f, "transfer failed: {}", why),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_are_exact() {
        assert_eq!(
            CommandError::Usage("crc <address> <length>").to_string(),
            "crc <address> <length>"
        );
        assert_eq!(CommandError::Incorrect("address").to_string(), "incorrect address");
        assert_eq!(CommandError::UnknownCsr.to_string(), "incorrect csr");
        assert_eq!(CommandError::CsrWriteOnly.to_string(), "csr write only");
        assert_eq!(CommandError::CsrReadOnly.to_string(), "csr read only");
        assert_eq!(
            BootError::Crc { expected: 0x1234, actual: 0xabcdef01 }.to_string(),
            "CRC mismatch (expected 00001234, got abcdef01)"
        );
    }
}
