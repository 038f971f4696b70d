use core::fmt::Write;
use core::time::Duration;

use monitor::{AddressSpace, BootError, BootSource, Console, Region};
use pi::timer;
use xmodem::Xmodem;

use crate::param::SERIAL_TIMEOUT_MS;

/// The console as an XMODEM port, with a per-byte timeout.
struct ConsolePort<'a> {
    console: &'a mut dyn Console,
    timeout: Duration,
}

impl xmodem::Serial for ConsolePort<'_> {
    fn read_byte(&mut self) -> Result<u8, xmodem::Error> {
        let start = timer::current_time();
        loop {
            if let Some(byte) = self.console.poll_byte() {
                return Ok(byte);
            }
            if timer::current_time() - start > self.timeout {
                return Err(xmodem::Error::TimedOut);
            }
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.console.write_byte(byte)
    }
}

/// Receives an application over XMODEM straight into main RAM.
pub struct SerialBoot {
    ram: Region,
}

impl SerialBoot {
    pub fn new(ram: Region) -> SerialBoot {
        SerialBoot { ram }
    }
}

impl BootSource for SerialBoot {
    fn load(
        &mut self,
        console: &mut dyn Console,
        _mem: &mut dyn AddressSpace,
    ) -> Result<usize, BootError> {
        let _ = writeln!(console, "Waiting for XMODEM transfer...");

        // Main RAM belongs to whatever is being booted; nothing else
        // references it.
        let dst = unsafe { core::slice::from_raw_parts_mut(self.ram.base as *mut u8, self.ram.size) };
        let port = ConsolePort {
            console: &mut *console,
            timeout: Duration::from_millis(SERIAL_TIMEOUT_MS),
        };

        // An EOT before the first packet comes back as `Error::Empty`.
        match Xmodem::receive(port, dst) {
            Ok(received) => {
                log::info!("serial: received {} bytes", received);
                let _ = writeln!(console, "Received {} bytes", received);
                Ok(self.ram.base)
            }
            Err(e) => {
                log::debug!("serial: transfer failed: {}", e);
                Err(BootError::Transfer(e.message()))
            }
        }
    }
}
