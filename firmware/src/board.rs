use core::ptr;

use dtekv_pipeline::regs::{JTAG_UART_CONTROL, JTAG_UART_DATA};
use dtekv_pipeline::{Bus, Console};

/// Core clock, used to turn milliseconds into busy-wait cycles.
const CLOCK_HZ: u32 = 30_000_000;

/// Free space in the JTAG UART write FIFO.
const WRITE_SPACE: u32 = 0xFFFF_0000;

/// Volatile access to the physical memory map.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    /// Only one `Mmio` may exist, and nothing else may drive the registers it touches.
    pub const unsafe fn steal() -> Self {
        Mmio { _private: () }
    }
}

impl Bus for Mmio {
    fn read_u8(&self, addr: usize) -> u8 {
        unsafe { ptr::read_volatile(addr as *const u8) }
    }

    fn write_u8(&mut self, addr: usize, value: u8) {
        unsafe { ptr::write_volatile(addr as *mut u8, value) }
    }

    fn read_u32(&self, addr: usize) -> u32 {
        unsafe { ptr::read_volatile(addr as *const u32) }
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        unsafe { ptr::write_volatile(addr as *mut u32, value) }
    }

    fn delay_ms(&mut self, ms: u32) {
        unsafe { riscv::asm::delay(ms.saturating_mul(CLOCK_HZ / 1000)) }
    }
}

/// The debug text channel. Blocks while the write FIFO is full.
pub struct JtagUart {
    _private: (),
}

impl JtagUart {
    /// # Safety
    /// Only one `JtagUart` may exist.
    pub const unsafe fn steal() -> Self {
        JtagUart { _private: () }
    }
}

impl Console for JtagUart {
    fn put_byte(&mut self, byte: u8) {
        unsafe {
            while ptr::read_volatile(JTAG_UART_CONTROL as *const u32) & WRITE_SPACE == 0 {}
            ptr::write_volatile(JTAG_UART_DATA as *mut u32, byte as u32);
        }
    }
}
