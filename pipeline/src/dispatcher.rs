//! External interrupt handling: the 100 ms timer and the switch edge interrupt.

use crate::clock::TimeOfDay;
use crate::console::Console;
use crate::context::Firmware;
use crate::handshake::TransferReport;
use crate::regs::{self, Bus, SWITCH_CAUSE, SwitchState};
use crate::segments;
use crate::transform::Method;

/// Timer periods per second.
pub const TICKS_PER_SECOND: u32 = 10;

/// Shown on the selector digits when the switches pick no transform.
const SELECTOR_OVERFLOW: u32 = 99;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElapsedCounters {
    /// Timer periods seen since boot.
    pub timeout_count: u32,
    /// Whole seconds since boot.
    pub seconds: u32,
    pub clock: TimeOfDay,
}

impl ElapsedCounters {
    /// Count one timer period. Returns true when it completed a second.
    pub fn tick(&mut self) -> bool {
        self.timeout_count = self.timeout_count.wrapping_add(1);
        if self.timeout_count % TICKS_PER_SECOND != 0 {
            return false;
        }
        self.clock.tick();
        self.seconds = self.seconds.wrapping_add(1);
        true
    }

    /// Minutes within the hour and seconds within the minute.
    pub fn minutes_seconds(&self) -> (u32, u32) {
        ((self.seconds % 3600) / 60, self.seconds % 60)
    }
}

/// What one call to [`Firmware::handle_interrupt`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptReport {
    pub switches: SwitchState,
    pub timer_ticked: bool,
    /// The exit switch cut the switch interrupt short.
    pub exit: bool,
    pub transfer: Option<TransferReport>,
}

impl<B: Bus, C: Console> Firmware<'_, B, C> {
    /// Service one external interrupt with `mcause` code `cause`.
    ///
    /// Must not be re-entered; the board calls it with interrupts masked.
    pub fn handle_interrupt(&mut self, cause: u32) -> InterruptReport {
        let switches = regs::switches(&self.bus);
        let mut report = InterruptReport {
            switches,
            ..InterruptReport::default()
        };

        if regs::timer_timed_out(&self.bus) {
            regs::restart_timer(&mut self.bus);
            report.timer_ticked = true;
            if self.elapsed.tick() {
                let clock = self.elapsed.clock;
                trace!(
                    "uptime {}s, clock {}:{}:{}",
                    self.elapsed.seconds,
                    clock.hours(),
                    clock.minutes(),
                    clock.seconds()
                );
            }
        }

        if cause == SWITCH_CAUSE {
            let toggled = switches.confirm_toggled(self.previous);
            self.previous = switches;

            if switches.exit() {
                // Clear the edge anyway, or the line stays asserted and fires again at once.
                regs::ack_switch_edges(&mut self.bus);
                report.exit = true;
                return report;
            }

            self.console.put_str("[Debug]sw trigger!\n");
            if toggled {
                report.transfer = self.transfer(switches, true);
            } else {
                trace!("confirm unchanged, no transfer");
            }

            regs::ack_switch_edges(&mut self.bus);
            self.bus.delay_ms(1);
        }

        self.show_status(switches);
        report
    }

    /// Selector on digits 5 and 4, minutes on 3 and 2, seconds on 1 and 0.
    fn show_status(&mut self, switches: SwitchState) {
        let selector = match switches.selector() {
            s if s <= Method::SUPPORTED_MAX => s,
            _ => SELECTOR_OVERFLOW,
        };
        let (minutes, seconds) = self.elapsed.minutes_seconds();

        for (index, value) in [(4, selector), (2, minutes), (0, seconds)] {
            let (tens, units) = segments::encode_pair(value);
            regs::set_digit(&mut self.bus, index + 1, tens);
            regs::set_digit(&mut self.bus, index, units);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::{MAX_IMAGE_BYTES, TIMER_CAUSE};
    use crate::sim::{SimBus, SimConsole};
    use std::boxed::Box;

    const CONFIRM: u32 = 1 << 1;
    const EXIT: u32 = 1 << 0;
    const INVERT: u32 = 1 << 2;

    fn buffer() -> Box<[u8; MAX_IMAGE_BYTES]> {
        Box::new([0; MAX_IMAGE_BYTES])
    }

    #[test]
    fn every_tenth_period_is_a_second() {
        let mut counters = ElapsedCounters::default();
        for _ in 0..9 {
            assert!(!counters.tick());
        }
        assert!(counters.tick());
        assert_eq!(counters.timeout_count, 10);
        assert_eq!(counters.seconds, 1);
        assert_eq!(counters.clock.bcd(), 0x5958);
    }

    #[test]
    fn minutes_wrap_each_hour() {
        let counters = ElapsedCounters {
            seconds: 3600 + 125,
            ..ElapsedCounters::default()
        };
        assert_eq!(counters.minutes_seconds(), (2, 5));
    }

    #[test]
    fn timer_interrupt_counts_and_restarts() {
        let mut image = buffer();
        let mut fw = Firmware::new(SimBus::new(), SimConsole::new(), &mut image);

        for _ in 0..10 {
            fw.bus_mut().expire_timer();
            let report = fw.handle_interrupt(TIMER_CAUSE);
            assert!(report.timer_ticked);
            assert!(!regs::timer_timed_out(fw.bus()));
        }
        assert_eq!(fw.elapsed().timeout_count, 10);
        assert_eq!(fw.elapsed().seconds, 1);

        // No timeout flag, nothing counted.
        let report = fw.handle_interrupt(TIMER_CAUSE);
        assert!(!report.timer_ticked);
        assert_eq!(fw.elapsed().timeout_count, 10);
        assert_eq!(fw.bus().edge_acks(), 0);
    }

    #[test]
    fn confirm_edge_triggers_one_transfer() {
        let mut image = buffer();
        let mut fw = Firmware::new(SimBus::new(), SimConsole::new(), &mut image);
        fw.bus_mut().load_input(&[1, 2, 3, 4]);
        fw.bus_mut().set_pending(4);
        fw.bus_mut().set_switches(INVERT | CONFIRM);

        let report = fw.handle_interrupt(SWITCH_CAUSE);
        let transfer = report.transfer.unwrap();
        assert_eq!(transfer.method, Method::Invert);
        assert_eq!(fw.bus().output(4), [254, 253, 252, 251]);
        assert_eq!(fw.bus().pending(), 0);
        assert_eq!(fw.bus().edge_acks(), 1);
        assert_eq!(fw.bus().delayed_ms(), 1);
        assert_eq!(fw.previous_switches(), SwitchState::from_bits(INVERT | CONFIRM));

        // Same level held, new data pending: no second transfer.
        fw.bus_mut().set_pending(4);
        let report = fw.handle_interrupt(SWITCH_CAUSE);
        assert_eq!(report.transfer, None);
        assert_eq!(fw.bus().pending(), 4);

        // Falling edge counts too.
        fw.bus_mut().set_switches(INVERT);
        let report = fw.handle_interrupt(SWITCH_CAUSE);
        assert!(report.transfer.is_some());
        assert_eq!(fw.bus().pending(), 0);
        assert_eq!(fw.console().count("[Debug]sw trigger!\n"), 3);
    }

    #[test]
    fn edge_without_pending_data_does_nothing() {
        let mut image = buffer();
        let mut fw = Firmware::new(SimBus::new(), SimConsole::new(), &mut image);
        fw.bus_mut().set_switches(CONFIRM);

        let report = fw.handle_interrupt(SWITCH_CAUSE);
        assert_eq!(report.transfer, None);
        assert_eq!(fw.bus().vga_writes(), 0);
        assert_eq!(fw.bus().edge_acks(), 1);
    }

    #[test]
    fn exit_switch_bails_out() {
        let mut image = buffer();
        let mut fw = Firmware::new(SimBus::new(), SimConsole::new(), &mut image);
        fw.bus_mut().load_input(&[7; 4]);
        fw.bus_mut().set_pending(4);
        fw.bus_mut().set_switches(EXIT | CONFIRM | INVERT);
        fw.bus_mut().capture_edges(CONFIRM);

        let report = fw.handle_interrupt(SWITCH_CAUSE);
        assert!(report.exit);
        assert_eq!(report.transfer, None);
        assert_eq!(fw.bus().pending(), 4);
        assert_eq!(fw.bus().output(4), [0; 4]);
        assert_eq!(fw.bus().edge_acks(), 1);
        assert_eq!(fw.bus().delayed_ms(), 0);
        assert_eq!(fw.console().text(), "");
        // Digits are left alone on the way out.
        assert_eq!(fw.bus().digits(), [0; 6]);
        assert_eq!(fw.previous_switches(), SwitchState::from_bits(EXIT | CONFIRM | INVERT));
    }

    #[test]
    fn toggle_under_exit_is_consumed() {
        let mut image = buffer();
        let mut fw = Firmware::new(SimBus::new(), SimConsole::new(), &mut image);
        fw.bus_mut().load_input(&[7; 4]);
        fw.bus_mut().set_pending(4);

        // Confirm flipped while processing is paused.
        fw.bus_mut().set_switches(EXIT | CONFIRM | INVERT);
        assert!(fw.handle_interrupt(SWITCH_CAUSE).exit);

        // Releasing exit with confirm still up is not a new edge.
        fw.bus_mut().set_switches(CONFIRM | INVERT);
        let report = fw.handle_interrupt(SWITCH_CAUSE);
        assert!(!report.exit);
        assert_eq!(report.transfer, None);
        assert_eq!(fw.bus().pending(), 4);

        // The next flip serves the waiting data.
        fw.bus_mut().set_switches(INVERT);
        let report = fw.handle_interrupt(SWITCH_CAUSE);
        assert!(report.transfer.is_some());
        assert_eq!(fw.bus().output(4), [0xF8; 4]);
        assert_eq!(fw.bus().pending(), 0);
    }

    #[test]
    fn timer_interrupt_ignores_confirm() {
        let mut image = buffer();
        let mut fw = Firmware::new(SimBus::new(), SimConsole::new(), &mut image);
        fw.bus_mut().set_pending(4);
        fw.bus_mut().set_switches(CONFIRM);

        let report = fw.handle_interrupt(TIMER_CAUSE);
        assert_eq!(report.transfer, None);
        assert_eq!(fw.bus().pending(), 4);
        assert_eq!(fw.previous_switches(), SwitchState::default());

        // The edge is still seen by the next switch interrupt.
        let report = fw.handle_interrupt(SWITCH_CAUSE);
        assert!(report.transfer.is_some());
    }

    #[test]
    fn digits_show_selector_and_uptime() {
        let mut image = buffer();
        let mut fw = Firmware::new(SimBus::new(), SimConsole::new(), &mut image);
        fw.elapsed.seconds = 754;
        fw.bus_mut().set_switches(2 << 2);

        fw.handle_interrupt(TIMER_CAUSE);
        // 0 2 | 1 2 | 3 4
        let expected = [
            segments::encode(4),
            segments::encode(3),
            segments::encode(2),
            segments::encode(1),
            segments::encode(2),
            segments::encode(0),
        ];
        assert_eq!(fw.bus().digits(), expected);
    }

    #[test]
    fn unsupported_selector_shows_99() {
        let mut image = buffer();
        let mut fw = Firmware::new(SimBus::new(), SimConsole::new(), &mut image);
        fw.bus_mut().set_switches(4 << 2);

        fw.handle_interrupt(TIMER_CAUSE);
        let digits = fw.bus().digits();
        assert_eq!(&digits[4..], &[segments::encode(9); 2]);
        assert_eq!(&digits[..4], &[segments::encode(0); 4]);
    }
}
