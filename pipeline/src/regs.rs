//! Memory map of the DTEK-V board.
//!
//! Everything the pipeline touches on the board goes through [`Bus`], so the same logic runs
//! against volatile MMIO on the board and against [`crate::sim::SimBus`] on the host.

/// Capacity of the inbound, outbound and local image buffers.
pub const MAX_IMAGE_BYTES: usize = 64 * 1024;

/// Producer-written image bytes.
pub const IN_BASE: usize = 0x0200_0000;
/// Firmware-written result bytes.
pub const OUT_BASE: usize = 0x0201_0000;
/// Producer writes the byte count here, firmware clears it once the result is written.
pub const LEN_ADDR: usize = 0x0200_FFF0;

pub const SWITCH_DATA: usize = 0x0400_0010;
pub const SWITCH_DIRECTION: usize = 0x0400_0014;
pub const SWITCH_INTERRUPT_MASK: usize = 0x0400_0018;
pub const SWITCH_EDGE_CAPTURE: usize = 0x0400_001C;

pub const TIMER_STATUS: usize = 0x0400_0020;
pub const TIMER_CONTROL: usize = 0x0400_0024;
pub const TIMER_PERIOD_LOW: usize = 0x0400_0028;
pub const TIMER_PERIOD_HIGH: usize = 0x0400_002C;

pub const JTAG_UART_DATA: usize = 0x0400_0040;
pub const JTAG_UART_CONTROL: usize = 0x0400_0044;

pub const DIGIT_BASE: usize = 0x0400_0050;
pub const DIGIT_STRIDE: usize = 0x10;
pub const DIGIT_COUNT: usize = 6;

pub const VGA_BASE: usize = 0x0800_0000;
pub const VGA_WIDTH: u32 = 320;
pub const VGA_HEIGHT: u32 = 240;
pub const VGA_BYTES: usize = (VGA_WIDTH * VGA_HEIGHT) as usize;

/// `mcause` code of the timer interrupt line.
pub const TIMER_CAUSE: u32 = 16;
/// `mcause` code of the switch edge-capture interrupt line.
pub const SWITCH_CAUSE: u32 = 17;

/// 100 ms at the 30 MHz system clock.
pub const TIMER_PERIOD: u32 = 0x002D_C6BF;

const TIMER_TIMEOUT: u32 = 1 << 0;
const TIMER_ITO: u32 = 1 << 0;
const TIMER_CONT: u32 = 1 << 1;
const TIMER_START: u32 = 1 << 2;
const TIMER_STOP: u32 = 1 << 3;

const SWITCH_MASK: u32 = 0x3FF;
const SWITCH_EXIT: u32 = 1 << 0;
const SWITCH_CONFIRM: u32 = 1 << 1;
const SWITCH_SELECTOR_SHIFT: u32 = 2;

pub trait Bus {
    fn read_u8(&self, addr: usize) -> u8;
    fn write_u8(&mut self, addr: usize, value: u8);
    fn read_u32(&self, addr: usize) -> u32;
    fn write_u32(&mut self, addr: usize, value: u32);

    /// Busy-wait for roughly `ms` milliseconds.
    fn delay_ms(&mut self, _ms: u32) {}
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn read_u8(&self, addr: usize) -> u8 {
        (**self).read_u8(addr)
    }

    fn write_u8(&mut self, addr: usize, value: u8) {
        (**self).write_u8(addr, value)
    }

    fn read_u32(&self, addr: usize) -> u32 {
        (**self).read_u32(addr)
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        (**self).write_u32(addr, value)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Snapshot of the ten slide switches.
///
/// Bit 0 disables processing, bit 1 is the confirm toggle, bits 2 and up select the transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchState(u32);

impl SwitchState {
    pub const fn from_bits(bits: u32) -> Self {
        SwitchState(bits & SWITCH_MASK)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn exit(self) -> bool {
        self.0 & SWITCH_EXIT != 0
    }

    pub const fn confirm(self) -> bool {
        self.0 & SWITCH_CONFIRM != 0
    }

    pub const fn selector(self) -> u32 {
        self.0 >> SWITCH_SELECTOR_SHIFT
    }

    /// True when the confirm bit differs from `previous`, in either direction.
    pub const fn confirm_toggled(self, previous: SwitchState) -> bool {
        (self.0 ^ previous.0) & SWITCH_CONFIRM != 0
    }
}

pub fn switches<B: Bus + ?Sized>(bus: &B) -> SwitchState {
    SwitchState::from_bits(bus.read_u32(SWITCH_DATA))
}

/// Clear every captured switch edge, which also drops the pending switch interrupt.
pub fn ack_switch_edges<B: Bus + ?Sized>(bus: &mut B) {
    bus.write_u32(SWITCH_EDGE_CAPTURE, 0xFFFF_FFFF);
}

pub fn pending_length<B: Bus + ?Sized>(bus: &B) -> u32 {
    bus.read_u32(LEN_ADDR)
}

pub fn acknowledge_transfer<B: Bus + ?Sized>(bus: &mut B) {
    bus.write_u32(LEN_ADDR, 0);
}

pub fn timer_timed_out<B: Bus + ?Sized>(bus: &B) -> bool {
    bus.read_u32(TIMER_STATUS) & TIMER_TIMEOUT != 0
}

/// Clear the timeout flag and start the next 100 ms period.
pub fn restart_timer<B: Bus + ?Sized>(bus: &mut B) {
    bus.write_u32(TIMER_STATUS, TIMER_TIMEOUT);
    load_timer_period(bus);
    bus.write_u32(TIMER_CONTROL, TIMER_START | TIMER_CONT | TIMER_ITO);
}

fn load_timer_period<B: Bus + ?Sized>(bus: &mut B) {
    bus.write_u32(TIMER_PERIOD_LOW, TIMER_PERIOD & 0xFFFF);
    bus.write_u32(TIMER_PERIOD_HIGH, TIMER_PERIOD >> 16);
}

/// Write a raw segment pattern to one of the six digit displays, 0 being the rightmost.
pub fn set_digit<B: Bus + ?Sized>(bus: &mut B, index: usize, pattern: u8) {
    debug_assert!(index < DIGIT_COUNT);
    bus.write_u32(DIGIT_BASE + DIGIT_STRIDE * index, pattern as u32);
}

/// Start the periodic timer and arm the switch edge interrupt.
///
/// Interrupts still have to be enabled in the CPU afterwards.
pub fn init_peripherals<B: Bus + ?Sized>(bus: &mut B) {
    bus.write_u32(TIMER_CONTROL, TIMER_STOP);
    load_timer_period(bus);
    bus.write_u32(TIMER_CONTROL, TIMER_START | TIMER_CONT | TIMER_ITO);

    bus.write_u32(SWITCH_DIRECTION, 0);
    ack_switch_edges(bus);
    bus.write_u32(SWITCH_INTERRUPT_MASK, SWITCH_MASK);
}
