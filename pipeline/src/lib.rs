#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[macro_use]
mod fmt;

pub mod clock;
pub mod compositor;
pub mod console;
mod context;
pub mod dispatcher;
pub mod exception;
pub mod handshake;
mod lut;
pub mod regs;
pub mod segments;
#[cfg(any(test, feature = "std"))]
pub mod sim;
pub mod transform;

pub use clock::TimeOfDay;
pub use compositor::{Placement, RenderError, VgaSurface};
pub use console::Console;
pub use context::Firmware;
pub use dispatcher::{ElapsedCounters, InterruptReport};
pub use exception::{TrapAction, TrapCause, TrapContext};
pub use handshake::TransferReport;
pub use lut::{Lut, Rgb332Lut, rgb332};
pub use regs::{Bus, MAX_IMAGE_BYTES, SwitchState};
pub use transform::Method;
