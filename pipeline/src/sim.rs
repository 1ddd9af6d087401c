//! Simulated DTEK-V memory map for host tests.

use std::collections::HashMap;
use std::string::String;
use std::vec::Vec;

use crate::console::Console;
use crate::regs::{
    Bus, DIGIT_BASE, DIGIT_COUNT, DIGIT_STRIDE, IN_BASE, LEN_ADDR, OUT_BASE, SWITCH_DATA,
    SWITCH_EDGE_CAPTURE, TIMER_STATUS, VGA_BASE, VGA_BYTES,
};

/// Sparse byte-addressed memory. Unwritten addresses read as zero.
///
/// The timer status and switch edge-capture registers behave like the hardware: any write
/// clears them.
#[derive(Default)]
pub struct SimBus {
    memory: HashMap<usize, u8>,
    vga_writes: usize,
    edge_acks: usize,
    delay_ms: u32,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer side: place `bytes` in the inbound buffer.
    pub fn load_input(&mut self, bytes: &[u8]) {
        self.fill(IN_BASE, bytes);
    }

    /// Producer side: announce `len` ready bytes.
    pub fn set_pending(&mut self, len: u32) {
        self.store_u32(LEN_ADDR, len);
    }

    pub fn pending(&self) -> u32 {
        self.read_u32(LEN_ADDR)
    }

    pub fn output(&self, len: usize) -> Vec<u8> {
        self.bytes(OUT_BASE, len)
    }

    pub fn set_switches(&mut self, bits: u32) {
        self.store_u32(SWITCH_DATA, bits);
    }

    /// Raise the timer's timeout flag as if a period had elapsed.
    pub fn expire_timer(&mut self) {
        self.store_u32(TIMER_STATUS, 1);
    }

    /// Raise a captured edge on the given switch lines.
    pub fn capture_edges(&mut self, mask: u32) {
        let captured = self.read_u32(SWITCH_EDGE_CAPTURE) | mask;
        self.store_u32(SWITCH_EDGE_CAPTURE, captured);
    }

    pub fn frame(&self) -> Vec<u8> {
        self.bytes(VGA_BASE, VGA_BYTES)
    }

    pub fn fill_frame(&mut self, value: u8) {
        for offset in 0..VGA_BYTES {
            self.memory.insert(VGA_BASE + offset, value);
        }
    }

    /// Segment patterns currently shown, index 0 being the rightmost digit.
    pub fn digits(&self) -> [u8; DIGIT_COUNT] {
        core::array::from_fn(|i| self.read_u32(DIGIT_BASE + DIGIT_STRIDE * i) as u8)
    }

    pub fn vga_writes(&self) -> usize {
        self.vga_writes
    }

    pub fn edge_acks(&self) -> usize {
        self.edge_acks
    }

    pub fn delayed_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Copy `bytes` to `base` without the register side effects of [`Bus`] writes.
    pub fn fill(&mut self, base: usize, bytes: &[u8]) {
        for (i, byte) in bytes.iter().enumerate() {
            self.memory.insert(base + i, *byte);
        }
    }

    pub fn bytes(&self, base: usize, len: usize) -> Vec<u8> {
        (0..len).map(|i| self.read_u8(base + i)).collect()
    }

    fn store_u32(&mut self, addr: usize, value: u32) {
        self.fill(addr, &value.to_le_bytes());
    }
}

impl Bus for SimBus {
    fn read_u8(&self, addr: usize) -> u8 {
        self.memory.get(&addr).copied().unwrap_or(0)
    }

    fn write_u8(&mut self, addr: usize, value: u8) {
        if (VGA_BASE..VGA_BASE + VGA_BYTES).contains(&addr) {
            self.vga_writes += 1;
        }
        self.memory.insert(addr, value);
    }

    fn read_u32(&self, addr: usize) -> u32 {
        u32::from_le_bytes(core::array::from_fn(|i| self.read_u8(addr + i)))
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        match addr {
            TIMER_STATUS => self.store_u32(addr, 0),
            SWITCH_EDGE_CAPTURE => {
                self.edge_acks += 1;
                self.store_u32(addr, 0);
            }
            _ => self.store_u32(addr, value),
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ms += ms;
    }
}

/// Debug channel that keeps everything written to it.
#[derive(Default)]
pub struct SimConsole {
    text: String,
}

impl SimConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn count(&self, needle: &str) -> usize {
        self.text.matches(needle).count()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

impl Console for SimConsole {
    fn put_byte(&mut self, byte: u8) {
        self.text.push(byte as char);
    }
}
