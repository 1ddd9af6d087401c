//! The shared-memory transfer protocol.
//!
//! The producer writes up to [`MAX_IMAGE_BYTES`] bytes at [`IN_BASE`], then the byte count at
//! [`LEN_ADDR`], then polls [`LEN_ADDR`] until it reads zero before fetching the result from
//! [`OUT_BASE`]. A non-zero length means the firmware owns the buffers; the firmware clears it
//! only after the whole result is written.
//!
//! [`IN_BASE`]: crate::regs::IN_BASE
//! [`OUT_BASE`]: crate::regs::OUT_BASE
//! [`LEN_ADDR`]: crate::regs::LEN_ADDR

use crate::compositor::{self, Placement, RenderError, VgaSurface};
use crate::console::{Console, hex_dump};
use crate::context::Firmware;
use crate::regs::{self, Bus, IN_BASE, MAX_IMAGE_BYTES, OUT_BASE, SwitchState};
use crate::transform::Method;

/// Bytes shown of each buffer in the console dumps.
const DUMP_BYTES: usize = 16;

/// What one handled transfer did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferReport {
    /// Length the producer asked for.
    pub declared: u32,
    /// Bytes actually processed, `declared` clamped to the buffer size.
    pub length: usize,
    pub method: Method,
    /// `None` when the transfer was not asked to render.
    pub rendered: Option<Result<Placement, RenderError>>,
}

impl TransferReport {
    pub fn truncated(&self) -> bool {
        self.length < self.declared as usize
    }
}

impl<B: Bus, C: Console> Firmware<'_, B, C> {
    /// Serve the pending transfer, if any, with the transform currently selected on the
    /// switches. Returns `None` and touches nothing when the length register is zero.
    pub fn run_transfer(&mut self, render: bool) -> Option<TransferReport> {
        let switches = regs::switches(&self.bus);
        self.transfer(switches, render)
    }

    /// One-shot check made from `main` before interrupts are enabled. Never renders.
    pub fn boot(&mut self) -> Option<TransferReport> {
        let report = self.run_transfer(false);
        match &report {
            Some(report) => info!("boot transfer of {} bytes", report.length),
            None => debug!("no transfer pending at boot"),
        }
        report
    }

    pub(crate) fn transfer(&mut self, switches: SwitchState, render: bool) -> Option<TransferReport> {
        let declared = regs::pending_length(&self.bus);
        if declared == 0 {
            return None;
        }

        let length = (declared as usize).min(MAX_IMAGE_BYTES);
        if length < declared as usize {
            warn!("declared length {} truncated to {}", declared, length);
        }
        self.console.print(format_args!("LEN(read)={}\n", length));

        let image = &mut self.image[..length];
        for (i, px) in image.iter_mut().enumerate() {
            *px = self.bus.read_u8(IN_BASE + i);
        }
        hex_dump(&mut self.console, "IN[0:16]", image, DUMP_BYTES);

        let method = Method::from_selector(switches.selector());
        method.apply(image);

        for (i, px) in image.iter().enumerate() {
            self.bus.write_u8(OUT_BASE + i, *px);
        }
        hex_dump(&mut self.console, "OUT[0:16]", image, DUMP_BYTES);

        let rendered = if render {
            let mut surface = VgaSurface::new(&mut self.bus, &self.lut);
            Some(compositor::render(&mut surface, image, &mut self.console))
        } else {
            None
        };

        // Last step: hands the buffers back to the producer.
        regs::acknowledge_transfer(&mut self.bus);
        debug!("transfer of {} bytes done with {}", length, method);

        Some(TransferReport {
            declared,
            length,
            method,
            rendered,
        })
    }
}
