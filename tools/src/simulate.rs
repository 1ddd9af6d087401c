//! One transfer through the firmware against the simulated memory map, no board needed.

use dtekv_pipeline::sim::{SimBus, SimConsole};
use dtekv_pipeline::{Firmware, MAX_IMAGE_BYTES, TransferReport};

use crate::error::ToolError;

/// Selector switches start at bit 2.
const SELECTOR_SHIFT: u32 = 2;

pub struct Outcome {
    pub report: TransferReport,
    pub output: Vec<u8>,
    pub frame: Vec<u8>,
    pub console: String,
}

/// Upload `input`, select transform `selector` and serve the transfer with rendering on.
pub fn run(input: &[u8], selector: u32) -> Result<Outcome, ToolError> {
    if input.len() > MAX_IMAGE_BYTES {
        return Err(ToolError::TooLong {
            len: input.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    let mut bus = SimBus::new();
    bus.load_input(input);
    bus.set_pending(input.len() as u32);
    bus.set_switches(selector << SELECTOR_SHIFT);

    let mut image = Box::new([0; MAX_IMAGE_BYTES]);
    let mut firmware = Firmware::new(bus, SimConsole::new(), &mut image);
    firmware.init();
    let report = firmware.run_transfer(true).ok_or(ToolError::NothingPending)?;
    log::debug!("simulated transfer: {:?}", report);

    Ok(Outcome {
        output: firmware.bus().output(report.length),
        frame: firmware.bus().frame(),
        console: firmware.console().text().to_owned(),
        report,
    })
}
