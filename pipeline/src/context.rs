use crate::console::Console;
use crate::dispatcher::ElapsedCounters;
use crate::lut::Rgb332Lut;
use crate::regs::{self, Bus, MAX_IMAGE_BYTES, SwitchState};

/// All state the firmware keeps between interrupts.
///
/// Owns the bus, the debug console and the single local image buffer. The boot path and the
/// interrupt handler both go through one instance, never at the same time.
pub struct Firmware<'a, B: Bus, C: Console> {
    pub(crate) bus: B,
    pub(crate) console: C,
    pub(crate) image: &'a mut [u8; MAX_IMAGE_BYTES],
    /// Switches as seen by the last switch interrupt. Starts with every switch off.
    pub(crate) previous: SwitchState,
    pub(crate) elapsed: ElapsedCounters,
    pub(crate) lut: Rgb332Lut,
}

impl<'a, B: Bus, C: Console> Firmware<'a, B, C> {
    pub fn new(bus: B, console: C, image: &'a mut [u8; MAX_IMAGE_BYTES]) -> Self {
        Firmware {
            bus,
            console,
            image,
            previous: SwitchState::default(),
            elapsed: ElapsedCounters::default(),
            lut: Rgb332Lut::new(),
        }
    }

    /// Program the timer and switch peripherals.
    pub fn init(&mut self) {
        regs::init_peripherals(&mut self.bus);
        debug!("peripherals initialised");
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn elapsed(&self) -> &ElapsedCounters {
        &self.elapsed
    }

    pub fn previous_switches(&self) -> SwitchState {
        self.previous
    }

    /// The local copy of the last transfer. Only the first `length` bytes of that transfer mean
    /// anything.
    pub fn image(&self) -> &[u8; MAX_IMAGE_BYTES] {
        self.image
    }
}
