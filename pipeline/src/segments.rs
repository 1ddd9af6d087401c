//! Active-low seven-segment patterns for the digit displays.

const DIGITS: [u8; 10] = [0x40, 0x79, 0x24, 0x30, 0x19, 0x12, 0x02, 0x78, 0x00, 0x10];

/// Segment pattern for the last decimal digit of `value`.
pub const fn encode(value: u32) -> u8 {
    DIGITS[(value % 10) as usize]
}

/// Patterns for the tens and units of `value`, tens first.
pub const fn encode_pair(value: u32) -> (u8, u8) {
    (encode((value % 100) / 10), encode(value % 10))
}
