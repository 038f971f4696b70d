#![cfg_attr(not(test), no_std)]

//! The receiving half of the original XMODEM protocol: 128-byte packets,
//! an 8-bit additive checksum and a receiver that starts the transfer by
//! sending `NAK`.

use core::fmt;

pub const SOH: u8 = 0x01;
pub const EOT: u8 = 0x04;
pub const ACK: u8 = 0x06;
pub const NAK: u8 = 0x15;
pub const CAN: u8 = 0x18;

/// Payload bytes per packet.
pub const PACKET_LEN: usize = 128;

/// Consecutive failures tolerated before the transfer is abandoned.
pub const MAX_RETRIES: usize = 10;

/// Why a transfer ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The sender went quiet for longer than the port's read timeout.
    TimedOut,
    /// The sender cancelled with `CAN`.
    Cancelled,
    /// The image does not fit in the destination.
    BufferFull,
    /// The sender ended the transfer before sending a packet.
    Empty,
    /// Retries were exhausted or the sender broke the protocol.
    Protocol(&'static str),
}

impl Error {
    /// A short description for operator-facing diagnostics.
    pub fn message(&self) -> &'static str {
        match *self {
            Error::TimedOut => "timed out",
            Error::Cancelled => "cancelled by sender",
            Error::BufferFull => "image too large",
            Error::Empty => "empty transfer",
            Error::Protocol(msg) => msg,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A byte pipe to the sender. `read_byte` returns `Error::TimedOut` when
/// nothing arrives within the port's timeout.
pub trait Serial {
    fn read_byte(&mut self) -> Result<u8, Error>;
    fn write_byte(&mut self, byte: u8);
}

impl<T: Serial + ?Sized> Serial for &mut T {
    fn read_byte(&mut self) -> Result<u8, Error> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }
}

/// Sum of `data` modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

enum Packet {
    Good(u8),
    Corrupt,
}

/// An XMODEM receiver over `port`.
pub struct Xmodem<S> {
    port: S,
    packet: u8,
    retries: usize,
}

impl<S: Serial> Xmodem<S> {
    pub fn new(port: S) -> Xmodem<S> {
        Xmodem {
            port,
            packet: 1,
            retries: 0,
        }
    }

    /// Receives a whole transfer into `dst`, returning the number of bytes
    /// written. The count is always a non-zero multiple of `PACKET_LEN`:
    /// padding in the last packet is kept, and an `EOT` before the first
    /// packet is `Error::Empty`.
    pub fn receive(port: S, dst: &mut [u8]) -> Result<usize, Error> {
        Xmodem::new(port).receive_into(dst)
    }

    fn receive_into(&mut self, dst: &mut [u8]) -> Result<usize, Error> {
        let mut received = 0;
        let mut block = [0u8; PACKET_LEN];

        self.port.write_byte(NAK);
        loop {
            let byte = match self.port.read_byte() {
                Ok(byte) => byte,
                Err(Error::TimedOut) => {
                    self.retry("sender silent")?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match byte {
                SOH => match self.read_packet(&mut block)? {
                    Packet::Good(n) if n == self.packet => {
                        let end = received + PACKET_LEN;
                        if end > dst.len() {
                            self.cancel();
                            return Err(Error::BufferFull);
                        }
                        dst[received..end].copy_from_slice(&block);
                        received = end;
                        self.packet = self.packet.wrapping_add(1);
                        self.retries = 0;
                        self.port.write_byte(ACK);
                    }
                    // Our ACK was lost and the sender repeated the packet.
                    Packet::Good(n) if n == self.packet.wrapping_sub(1) => {
                        log::debug!("xmodem: duplicate packet {}", n);
                        self.port.write_byte(ACK);
                    }
                    Packet::Good(n) => {
                        log::warn!("xmodem: expected packet {}, got {}", self.packet, n);
                        self.cancel();
                        return Err(Error::Protocol("packet out of sequence"));
                    }
                    Packet::Corrupt => self.retry("corrupt packet")?,
                },
                EOT => {
                    self.port.write_byte(ACK);
                    if received == 0 {
                        return Err(Error::Empty);
                    }
                    return Ok(received);
                }
                CAN => return Err(Error::Cancelled),
                _ => self.retry("unexpected byte")?,
            }
        }
    }

    /// Reads the rest of a packet after its `SOH`. A timeout in the middle
    /// of a packet only spoils that packet.
    fn read_packet(&mut self, block: &mut [u8; PACKET_LEN]) -> Result<Packet, Error> {
        match self.read_packet_bytes(block) {
            Err(Error::TimedOut) => Ok(Packet::Corrupt),
            other => other,
        }
    }

    fn read_packet_bytes(&mut self, block: &mut [u8; PACKET_LEN]) -> Result<Packet, Error> {
        let number = self.port.read_byte()?;
        let complement = self.port.read_byte()?;
        for byte in block.iter_mut() {
            *byte = self.port.read_byte()?;
        }
        let sum = self.port.read_byte()?;

        if number != !complement || sum != checksum(block) {
            return Ok(Packet::Corrupt);
        }
        Ok(Packet::Good(number))
    }

    /// Counts a failure and asks for a resend.
    fn retry(&mut self, why: &'static str) -> Result<(), Error> {
        self.retries += 1;
        log::debug!("xmodem: {} (retry {})", why, self.retries);
        if self.retries > MAX_RETRIES {
            self.cancel();
            return Err(Error::Protocol("too many retries"));
        }
        self.port.write_byte(NAK);
        Ok(())
    }

    fn cancel(&mut self) {
        self.port.write_byte(CAN);
        self.port.write_byte(CAN);
    }
}
