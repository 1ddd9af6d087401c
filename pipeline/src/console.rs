//! The debug text channel.

use core::fmt;

/// Character sink for status and error messages. On the board this is the JTAG UART.
pub trait Console {
    fn put_byte(&mut self, byte: u8);

    fn put_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.put_byte(byte);
        }
    }

    fn writer(&mut self) -> Writer<'_, Self> {
        Writer(self)
    }

    /// Formatted output, `format_args!` style.
    fn print(&mut self, args: fmt::Arguments<'_>) {
        // Writer never fails.
        let _ = fmt::Write::write_fmt(&mut self.writer(), args);
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn put_byte(&mut self, byte: u8) {
        (**self).put_byte(byte)
    }

    fn put_str(&mut self, s: &str) {
        (**self).put_str(s)
    }
}

/// [`fmt::Write`] adapter over a [`Console`].
pub struct Writer<'a, C: ?Sized>(&'a mut C);

impl<C: Console + ?Sized> fmt::Write for Writer<'_, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.put_str(s);
        Ok(())
    }
}

/// Print `label: ` followed by the first `limit` bytes as hex pairs.
pub fn hex_dump<C: Console + ?Sized>(console: &mut C, label: &str, bytes: &[u8], limit: usize) {
    console.put_str(label);
    console.put_str(": ");
    for byte in bytes.iter().take(limit) {
        console.print(format_args!("{:02X} ", byte));
    }
    console.put_byte(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConsole;

    #[test]
    fn formats_through_writer() {
        let mut console = SimConsole::new();
        console.print(format_args!("LEN(read)={}\n", 4096u32));
        console.print(format_args!("{:#010X}", 0x80u32));
        assert_eq!(console.text(), "LEN(read)=4096\n0x00000080");
    }

    #[test]
    fn hex_dump_stops_at_limit() {
        let mut console = SimConsole::new();
        hex_dump(&mut console, "IN[0:16]", &[0x00, 0xFF, 0x10], 2);
        assert_eq!(console.text(), "IN[0:16]: 00 FF \n");
    }

    #[test]
    fn hex_dump_short_buffer() {
        let mut console = SimConsole::new();
        let bytes: [u8; 20] = core::array::from_fn(|i| i as u8);
        hex_dump(&mut console, "OUT[0:16]", &bytes[..3], 16);
        assert_eq!(console.text(), "OUT[0:16]: 00 01 02 \n");
    }
}
