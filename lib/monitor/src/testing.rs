//! Mock collaborators for host tests.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::boot::{Board, BootSource, Countdown, Source};
use crate::console::Console;
use crate::csr::{Csr, CsrBus};
use crate::error::BootError;
use crate::mem::AddressSpace;

/// Scripted input, captured output.
pub struct MockConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl MockConsole {
    pub fn new() -> MockConsole {
        MockConsole::with_input(&[])
    }

    pub fn with_input(input: &[u8]) -> MockConsole {
        MockConsole {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn take_output(&mut self) -> String {
        let out = self.output();
        self.output.clear();
        out
    }
}

impl fmt::Write for MockConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl Console for MockConsole {
    fn has_byte(&self) -> bool {
        !self.input.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.input.pop_front().expect("console input exhausted")
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }
}

/// `size` bytes of RAM at `base`. Out-of-range accesses panic.
pub struct MockMemory {
    base: usize,
    bytes: Vec<u8>,
    pub writes: usize,
}

impl MockMemory {
    pub fn new(base: usize, size: usize) -> MockMemory {
        MockMemory { base, bytes: vec![0; size], writes: 0 }
    }

    pub fn load(&mut self, addr: usize, data: &[u8]) {
        let at = self.offset(addr);
        self.bytes[at..at + data.len()].copy_from_slice(data);
    }

    pub fn slice(&self, addr: usize, len: usize) -> &[u8] {
        let at = self.offset(addr);
        &self.bytes[at..at + len]
    }

    fn offset(&self, addr: usize) -> usize {
        assert!(
            addr >= self.base && addr < self.base + self.bytes.len(),
            "access to {:#x} outside mock memory",
            addr
        );
        addr - self.base
    }
}

impl AddressSpace for MockMemory {
    fn read_u8(&self, addr: usize) -> u8 {
        self.bytes[self.offset(addr)]
    }

    fn read_u32(&self, addr: usize) -> u32 {
        let at = self.offset(addr);
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[at..at + 4]);
        u32::from_le_bytes(word)
    }

    fn write_u8(&mut self, addr: usize, value: u8) {
        let at = self.offset(addr);
        self.bytes[at] = value;
        self.writes += 1;
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        let at = self.offset(addr);
        self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
        self.writes += 1;
    }
}

/// A register file that records every bus access.
#[derive(Default)]
pub struct MockCsr {
    regs: [u32; 21],
    pub reads: Vec<Csr>,
    pub writes: Vec<(Csr, u32)>,
}

impl MockCsr {
    pub fn new() -> MockCsr {
        MockCsr::default()
    }

    pub fn set(&mut self, csr: Csr, value: u32) {
        self.regs[csr as usize] = value;
    }

    pub fn get(&self, csr: Csr) -> u32 {
        self.regs[csr as usize]
    }

    pub fn accesses(&self) -> usize {
        self.reads.len() + self.writes.len()
    }
}

impl CsrBus for MockCsr {
    fn read(&mut self, csr: Csr) -> u32 {
        self.reads.push(csr);
        self.regs[csr as usize]
    }

    fn write(&mut self, csr: Csr, value: u32) {
        self.writes.push((csr, value));
        self.regs[csr as usize] = value;
    }
}

/// A countdown that drops by `step` on every latch.
pub struct MockTimer {
    pub hz: u32,
    start: Option<u32>,
    step: u32,
    value: u32,
    captured: u32,
    pub enabled: bool,
    pub loaded: u32,
    pub reload: u32,
    pub latches: usize,
}

impl MockTimer {
    /// Starts at `start` whatever gets loaded.
    pub fn new(start: u32, step: u32) -> MockTimer {
        MockTimer {
            hz: 100,
            start: Some(start),
            step,
            value: 0,
            captured: 0,
            enabled: false,
            loaded: 0,
            reload: 0,
            latches: 0,
        }
    }

    /// Runs out on the first latch.
    pub fn expired() -> MockTimer {
        MockTimer::new(0, 1)
    }

    /// Counts the loaded value down one tick per latch.
    pub fn counting(hz: u32) -> MockTimer {
        let mut timer = MockTimer::new(0, 1);
        timer.hz = hz;
        timer.start = None;
        timer
    }
}

impl Countdown for MockTimer {
    fn frequency(&self) -> u32 {
        self.hz
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_reload(&mut self, ticks: u32) {
        self.reload = ticks;
    }

    fn load(&mut self, ticks: u32) {
        self.loaded = ticks;
        self.value = self.start.unwrap_or(ticks);
    }

    fn latch(&mut self) {
        self.latches += 1;
        self.captured = self.value;
        self.value = self.value.saturating_sub(self.step);
    }

    fn remaining(&self) -> u32 {
        self.captured
    }
}

/// A loader with a fixed result.
pub struct MockLoader {
    result: Result<usize, BootError>,
}

impl BootSource for MockLoader {
    fn load(
        &mut self,
        _console: &mut dyn Console,
        _mem: &mut dyn AddressSpace,
    ) -> Result<usize, BootError> {
        self.result
    }
}

/// Panic payload of `MockBoard::jump`.
#[derive(Debug)]
pub struct Jumped(pub usize);

/// A board whose loaders fail unless told otherwise. Jumps panic with
/// `Jumped`; see `catch_jump`.
pub struct MockBoard {
    loaders: [Option<MockLoader>; 3],
    attempts: Vec<Source>,
    pub memory_ok: bool,
    pub memory_inits: usize,
    pub flushes: usize,
}

impl MockBoard {
    pub fn new() -> MockBoard {
        let failing = || Some(MockLoader { result: Err(BootError::Transfer("mock")) });
        MockBoard {
            loaders: [failing(), failing(), failing()],
            attempts: Vec::new(),
            memory_ok: true,
            memory_inits: 0,
            flushes: 0,
        }
    }

    pub fn succeed(&mut self, source: Source, entry: usize) {
        self.loaders[index(source)] = Some(MockLoader { result: Ok(entry) });
    }

    pub fn remove(&mut self, source: Source) {
        self.loaders[index(source)] = None;
    }

    /// Sources whose loader was asked for, in order.
    pub fn attempts(&self) -> &[Source] {
        &self.attempts
    }
}

fn index(source: Source) -> usize {
    match source {
        Source::Flash => 0,
        Source::Serial => 1,
        Source::Network => 2,
    }
}

impl Board for MockBoard {
    fn init_memory(&mut self, _console: &mut dyn Console) -> bool {
        self.memory_inits += 1;
        self.memory_ok
    }

    fn flush_l2(&mut self) {
        self.flushes += 1;
    }

    fn source(&mut self, source: Source) -> Option<&mut dyn BootSource> {
        self.attempts.push(source);
        match self.loaders[index(source)] {
            Some(ref mut loader) => Some(loader as &mut dyn BootSource),
            None => None,
        }
    }

    fn jump(&mut self, entry: usize) -> ! {
        panic::panic_any(Jumped(entry))
    }
}

/// Runs `f` and returns the entry point it jumped to, if it did.
pub fn catch_jump<F: FnOnce()>(f: F) -> Option<usize> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => None,
        Err(payload) => Some(jump_target(payload)),
    }
}

fn jump_target(payload: Box<dyn Any + Send>) -> usize {
    match payload.downcast::<Jumped>() {
        Ok(jumped) => jumped.0,
        Err(other) => panic::resume_unwind(other),
    }
}
