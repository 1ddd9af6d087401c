#![no_std]
#![no_main]

mod board;

use core::arch::asm;
use core::cell::RefCell;

use critical_section::Mutex;
use defmt::*;
use dtekv_pipeline::exception::handle_exception;
use dtekv_pipeline::regs::{SWITCH_CAUSE, TIMER_CAUSE};
use dtekv_pipeline::{Console, Firmware, MAX_IMAGE_BYTES, TrapAction, TrapCause, TrapContext};
use riscv::register::{mcause, mepc, mstatus};
use riscv_rt::{TrapFrame, entry};
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_halt as _};

use board::{JtagUart, Mmio};

type Board = Firmware<'static, Mmio, JtagUart>;

static IMAGE: ConstStaticCell<[u8; MAX_IMAGE_BYTES]> = ConstStaticCell::new([0; MAX_IMAGE_BYTES]);

static FIRMWARE: Mutex<RefCell<Option<Board>>> = Mutex::new(RefCell::new(None));

/// `mie` bits of the timer and switch interrupt lines.
const INTERRUPT_LINES: usize = (1 << TIMER_CAUSE) | (1 << SWITCH_CAUSE);

/// Length of one instruction, skipped when returning from `ecall`.
const ECALL_LEN: usize = 4;

const BANNER: &[&str] = &[
    "================================================\n",
    "DTEK-V image pipeline ready.\n",
    "Upload an image to 0x02000000, then its length (LE32) to 0x0200FFF0.\n",
    "The result is written to 0x02010000 and the length cleared to 0.\n",
    "SW1 toggles a transfer, SW0 pauses, SW2+ selects the transform:\n",
    "  0 none, 1 invert, 2 brighten, 3 darken\n",
    "================================================\n",
];

#[entry]
fn main() -> ! {
    info!("Program start");

    let image = IMAGE.take();
    let mut firmware = unsafe { Firmware::new(Mmio::steal(), JtagUart::steal(), image) };
    firmware.init();
    for line in BANNER {
        firmware.console_mut().put_str(line);
    }

    if let Some(report) = firmware.boot() {
        info!("boot: {}", report);
    }

    critical_section::with(|cs| {
        FIRMWARE.borrow_ref_mut(cs).replace(firmware);
    });

    unsafe {
        asm!("csrs mie, {0}", in(reg) INTERRUPT_LINES);
        mstatus::set_mie();
    }
    info!("interrupts enabled");

    loop {
        unsafe { riscv::asm::wfi() };
    }
}

#[export_name = "DefaultHandler"]
fn interrupt_handler() {
    let cause = mcause::read().code() as u32;
    critical_section::with(|cs| {
        let mut firmware = FIRMWARE.borrow_ref_mut(cs);
        let Some(firmware) = firmware.as_mut() else {
            warn!("interrupt {} before init", cause);
            return;
        };
        let report = firmware.handle_interrupt(cause);
        if let Some(transfer) = report.transfer {
            info!("transfer: {}", transfer);
        }
    });
}

#[export_name = "ExceptionHandler"]
fn exception_handler(trap_frame: &TrapFrame) {
    let trap = TrapContext {
        cause: TrapCause::from_code(mcause::read().code() as u32),
        epc: mepc::read() as u32,
        a0: trap_frame.a0 as u32,
        a7: trap_frame.a7 as u32,
    };

    // A trap can land in the middle of the interrupt handler, which holds the firmware context.
    let bus = unsafe { Mmio::steal() };
    let mut console = unsafe { JtagUart::steal() };

    match handle_exception(&bus, &mut console, trap) {
        TrapAction::Resume => unsafe { mepc::write(mepc::read() + ECALL_LEN) },
        TrapAction::Halt { address } => {
            error!("halted on {} at {=u32:#x}", trap.cause, address);
            halt()
        }
    }
}

fn halt() -> ! {
    unsafe { riscv::interrupt::disable() };
    loop {
        unsafe { riscv::asm::wfi() };
    }
}
