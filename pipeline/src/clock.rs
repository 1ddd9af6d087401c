//! BCD wall clock advanced once per second.

/// Time of day packed as BCD `0xDDHHMMSS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// 59:57, three seconds before the first hour rolls over.
    pub const START: TimeOfDay = TimeOfDay(0x5957);

    pub const fn from_bcd(bcd: u32) -> Self {
        TimeOfDay(bcd)
    }

    pub const fn bcd(self) -> u32 {
        self.0
    }

    pub const fn seconds(self) -> u32 {
        bcd_byte(self.0)
    }

    pub const fn minutes(self) -> u32 {
        bcd_byte(self.0 >> 8)
    }

    pub const fn hours(self) -> u32 {
        bcd_byte(self.0 >> 16)
    }

    /// Advance by one second, carrying through minutes, hours (mod 24) and days.
    ///
    /// Values that are not BCD still advance without overflowing.
    pub fn tick(&mut self) {
        let mut t = self.0.wrapping_add(1);
        if t & 0x0000_000F >= 0x0000_000A {
            t = t.wrapping_add(0x0000_0006);
        }
        if t & 0x0000_00F0 >= 0x0000_0060 {
            t = t.wrapping_add(0x0000_00A0);
        }
        if t & 0x0000_0F00 >= 0x0000_0A00 {
            t = t.wrapping_add(0x0000_0600);
        }
        if t & 0x0000_F000 >= 0x0000_6000 {
            t = t.wrapping_add(0x0000_A000);
        }
        if t & 0x000F_0000 >= 0x000A_0000 {
            t = t.wrapping_add(0x0006_0000);
        }
        if t & 0x00FF_0000 >= 0x0024_0000 {
            t = t.wrapping_add(0x00DC_0000);
        }
        if t & 0x0F00_0000 >= 0x0A00_0000 {
            t = t.wrapping_add(0x0600_0000);
        }
        if t & 0xF000_0000 >= 0xA000_0000 {
            t = 0;
        }
        self.0 = t;
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        TimeOfDay::START
    }
}

const fn bcd_byte(bits: u32) -> u32 {
    ((bits >> 4) & 0xF) * 10 + (bits & 0xF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_into_the_hour() {
        let mut clock = TimeOfDay::START;
        clock.tick();
        assert_eq!(clock.bcd(), 0x5958);
        clock.tick();
        clock.tick();
        assert_eq!(clock.bcd(), 0x0001_0000);
        assert_eq!((clock.hours(), clock.minutes(), clock.seconds()), (1, 0, 0));
    }

    #[test]
    fn carries_seconds_digits() {
        let mut clock = TimeOfDay::from_bcd(0x0009);
        clock.tick();
        assert_eq!(clock.bcd(), 0x0010);

        let mut clock = TimeOfDay::from_bcd(0x1259);
        clock.tick();
        assert_eq!(clock.bcd(), 0x1300);
        assert_eq!((clock.minutes(), clock.seconds()), (13, 0));
    }

    #[test]
    fn non_bcd_value_wraps() {
        let mut clock = TimeOfDay::from_bcd(0xFFFF_FFF0);
        clock.tick();
        assert_eq!(clock.bcd(), 0x0000_0091);

        let mut clock = TimeOfDay::from_bcd(u32::MAX);
        clock.tick();
        assert_eq!(clock.bcd(), 0);
    }

    #[test]
    fn day_rolls_at_midnight() {
        let mut clock = TimeOfDay::from_bcd(0x0023_5959);
        clock.tick();
        assert_eq!(clock.bcd(), 0x0100_0000);
    }
}
