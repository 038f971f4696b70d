//! Line input with minimal editing.

use heapless::Vec;

use crate::console::Console;

/// Capacity of the line buffer, in bytes.
pub const LINE_MAX: usize = 64;

/// The monitor's one input line. Lives as long as the monitor and is reused
/// for every command.
pub type LineBuf = Vec<u8, LINE_MAX>;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;

/// Reads one line from `console` into `buf`, echoing as it goes.
///
/// Backspace and delete erase the last character, on screen too. Carriage
/// return or newline ends the line. Other control characters and non-ASCII
/// bytes are dropped, as is anything typed once the line is full (one byte
/// short of `LINE_MAX`).
pub fn read_line<'b>(console: &mut dyn Console, buf: &'b mut LineBuf) -> &'b str {
    buf.clear();
    loop {
        match console.read_byte() {
            b'\r' | b'\n' => {
                console.write_byte(b'\n');
                break;
            }
            BACKSPACE | DELETE => {
                if buf.pop().is_some() {
                    console.write_bytes(b"\x08 \x08");
                }
            }
            b @ 0x20..=0x7e => {
                if buf.len() < LINE_MAX - 1 && buf.push(b).is_ok() {
                    console.write_byte(b);
                }
            }
            _ => {}
        }
    }
    // only printable ASCII was pushed
    core::str::from_utf8(buf).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockConsole;

    fn read(input: &[u8]) -> (String, String) {
        let mut con = MockConsole::with_input(input);
        let mut buf = LineBuf::new();
        let line = read_line(&mut con, &mut buf).to_string();
        (line, con.output())
    }

    #[test]
    fn echoes_and_terminates() {
        let (line, echo) = read(b"mr 0x10\r");
        assert_eq!(line, "mr 0x10");
        assert_eq!(echo, "mr 0x10\n");

        let (line, _) = read(b"help\n");
        assert_eq!(line, "help");
    }

    #[test]
    fn backspace_erases() {
        let (line, echo) = read(b"mx\x08r\x7f\x7fmr\r");
        assert_eq!(line, "mr");
        assert_eq!(echo, "mx\x08 \x08r\x08 \x08\x08 \x08mr\n");
    }

    #[test]
    fn backspace_on_empty_line_is_silent() {
        let (line, echo) = read(b"\x08\x7fa\r");
        assert_eq!(line, "a");
        assert_eq!(echo, "a\n");
    }

    #[test]
    fn control_and_high_bytes_are_ignored() {
        let (line, echo) = read(b"\x07a\x1b\x00b\xffc\r");
        assert_eq!(line, "abc");
        assert_eq!(echo, "abc\n");
    }

    #[test]
    fn full_line_drops_extra_input() {
        let mut input = vec![b'x'; LINE_MAX + 10];
        input.push(b'\r');
        let (line, echo) = read(&input);
        assert_eq!(line.len(), LINE_MAX - 1);
        assert_eq!(echo.len(), LINE_MAX);
    }

    #[test]
    fn buffer_is_reused() {
        let mut con = MockConsole::with_input(b"first line\rok\r");
        let mut buf = LineBuf::new();
        assert_eq!(read_line(&mut con, &mut buf), "first line");
        assert_eq!(read_line(&mut con, &mut buf), "ok");
    }
}
