//! Synchronous trap handling: the two console system calls, everything else is fatal.

use crate::console::Console;
use crate::regs::Bus;

/// `a7` value asking to print the NUL-terminated string at `a0`.
pub const SYSCALL_PRINT_STRING: u32 = 4;
/// `a7` value asking to print the low byte of `a0`.
pub const SYSCALL_PRINT_CHAR: u32 = 11;

/// Longest string the print syscall will follow before giving up on finding the NUL.
pub const MAX_SYSCALL_STRING: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrapCause {
    InstructionMisaligned,
    IllegalInstruction,
    EnvironmentCall,
    Other(u32),
}

impl TrapCause {
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => TrapCause::InstructionMisaligned,
            2 => TrapCause::IllegalInstruction,
            11 => TrapCause::EnvironmentCall,
            other => TrapCause::Other(other),
        }
    }
}

/// Registers captured at trap entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrapContext {
    pub cause: TrapCause,
    /// Address of the trapping instruction.
    pub epc: u32,
    pub a0: u32,
    pub a7: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrapAction {
    /// Return to the instruction after the trap.
    Resume,
    /// Stop the processor for good.
    Halt { address: u32 },
}

pub fn handle_exception<B, C>(bus: &B, console: &mut C, trap: TrapContext) -> TrapAction
where
    B: Bus + ?Sized,
    C: Console + ?Sized,
{
    match trap.cause {
        TrapCause::EnvironmentCall => {
            match trap.a7 {
                SYSCALL_PRINT_STRING => print_string(bus, console, trap.a0 as usize),
                SYSCALL_PRINT_CHAR => console.put_byte(trap.a0 as u8),
                other => debug!("ignoring syscall {}", other),
            }
            return TrapAction::Resume;
        }
        TrapCause::InstructionMisaligned => {
            console.put_str("\n[EXCEPTION] Instruction address misalignment. ")
        }
        TrapCause::IllegalInstruction => console.put_str("\n[EXCEPTION] Illegal instruction. "),
        TrapCause::Other(_) => console.put_str("\n[EXCEPTION] Unknown error. "),
    }

    error!("fatal trap {} at {=u32:#x}", trap.cause, trap.epc);
    console.print(format_args!("Exception Address: 0x{:08X}\n", trap.epc));
    TrapAction::Halt { address: trap.epc }
}

fn print_string<B, C>(bus: &B, console: &mut C, addr: usize)
where
    B: Bus + ?Sized,
    C: Console + ?Sized,
{
    for offset in 0..MAX_SYSCALL_STRING {
        match bus.read_u8(addr.wrapping_add(offset)) {
            0 => return,
            byte => console.put_byte(byte),
        }
    }
    warn!("syscall string at {=usize:#x} not terminated", addr);
}
