use embedded_graphics::pixelcolor::{Gray8, GrayColor};

/// Maps a gray sample to the VGA controller's RRRGGGBB byte.
pub trait Lut {
    fn lookup(&self, gray: Gray8) -> u8;
}

/// Scale each channel to its bit depth with truncating division and pack as RRRGGGBB.
pub const fn rgb332(gray: u8) -> u8 {
    let gray = gray as u16;
    let r = (gray * 7 / 255) as u8;
    let g = (gray * 7 / 255) as u8;
    let b = (gray * 3 / 255) as u8;
    (r << 5) | (g << 2) | b
}

/// All 256 conversions computed up front.
pub struct Rgb332Lut {
    table: [u8; 1 << 8],
}

impl Rgb332Lut {
    pub const fn new() -> Self {
        let mut table = [0; 1 << 8];
        let mut i = 0;
        while i < table.len() {
            table[i] = rgb332(i as u8);
            i += 1;
        }
        Rgb332Lut { table }
    }
}

impl Default for Rgb332Lut {
    fn default() -> Self {
        Self::new()
    }
}

impl Lut for Rgb332Lut {
    fn lookup(&self, gray: Gray8) -> u8 {
        self.table[gray.luma() as usize]
    }
}
