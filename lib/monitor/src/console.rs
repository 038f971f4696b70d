use core::fmt;

/// The operator's terminal.
///
/// Output goes through `fmt::Write`; input is byte-at-a-time, either blocking
/// (`read_byte`) or polled (`poll_byte`).
pub trait Console: fmt::Write {
    /// Returns `true` if a byte is waiting. Never blocks.
    fn has_byte(&self) -> bool;

    /// Blocks until a byte arrives and returns it.
    fn read_byte(&mut self) -> u8;

    /// Writes the raw byte `byte`.
    fn write_byte(&mut self, byte: u8);

    /// Returns the next byte if one is waiting, without blocking.
    fn poll_byte(&mut self) -> Option<u8> {
        if self.has_byte() {
            Some(self.read_byte())
        } else {
            None
        }
    }

    /// Writes every byte of `bytes` as-is.
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }
}

/// Like `print!`, but to the console `$con`. Console output cannot fail, so
/// the `fmt::Result` is dropped.
macro_rules! cprint {
    ($con:expr, $($arg:tt)*) => {{
        let _ = ::core::fmt::Write::write_fmt(&mut *$con, format_args!($($arg)*));
    }};
}

/// Like `println!`, but to the console `$con`.
macro_rules! cprintln {
    ($con:expr) => {
        cprint!($con, "\n")
    };
    ($con:expr, $($arg:tt)*) => {{
        cprint!($con, $($arg)*);
        cprint!($con, "\n");
    }};
}
