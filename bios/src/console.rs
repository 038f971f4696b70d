use core::fmt;

use pi::uart::MiniUart;

use crate::mutex::Mutex;

/// The UART console, brought up on first use.
pub struct Console {
    inner: Option<MiniUart>,
}

impl Console {
    /// Creates a new instance of `Console`.
    const fn new() -> Console {
        Console { inner: None }
    }

    fn inner(&mut self) -> &mut MiniUart {
        self.inner.get_or_insert_with(MiniUart::new)
    }

    pub fn has_byte(&mut self) -> bool {
        self.inner().has_byte()
    }

    pub fn read_byte(&mut self) -> u8 {
        self.inner().read_byte()
    }

    pub fn poll_byte(&mut self) -> Option<u8> {
        self.inner().poll_byte()
    }

    /// Writes `byte`, turning `\n` into `\r\n`.
    pub fn write_byte(&mut self, byte: u8) {
        let uart = self.inner();
        if byte == b'\n' {
            uart.write_byte(b'\r');
        }
        uart.write_byte(byte);
    }

    pub fn flush(&mut self) {
        self.inner().flush()
    }
}

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

/// Global `Console` singleton.
pub static CONSOLE: Mutex<Console> = Mutex::new(Console::new());

/// The handle the monitor talks through. Locks `CONSOLE` per operation so
/// the logger and the panic handler can always get in between.
#[derive(Debug, Default, Clone, Copy)]
pub struct Terminal;

impl fmt::Write for Terminal {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        CONSOLE.lock().write_str(s)
    }
}

impl monitor::Console for Terminal {
    fn has_byte(&self) -> bool {
        CONSOLE.lock().has_byte()
    }

    fn read_byte(&mut self) -> u8 {
        CONSOLE.lock().read_byte()
    }

    fn poll_byte(&mut self) -> Option<u8> {
        CONSOLE.lock().poll_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        CONSOLE.lock().write_byte(byte)
    }
}

/// Like `print!`, but for the firmware itself.
macro_rules! kprint {
    ($($arg:tt)*) => ($crate::console::_print(format_args!($($arg)*)))
}

/// Like `println!`, but for the firmware itself.
macro_rules! kprintln {
    () => (kprint!("\n"));
    ($($arg:tt)*) => ({
        $crate::console::_print(format_args!($($arg)*));
        kprint!("\n");
    })
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    use core::fmt::Write;
    let _ = CONSOLE.lock().write_fmt(args);
}
