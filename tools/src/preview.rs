//! Turning raw board buffers back into viewable images.

use dtekv_pipeline::compositor::square_side;
use dtekv_pipeline::regs::{VGA_BYTES, VGA_HEIGHT, VGA_WIDTH};
use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::error::ToolError;

/// White columns between the two halves of a comparison.
const GAP: u32 = 8;

/// Row width tried for buffers that are not square.
const WIDE_ROW: u32 = 256;
const NARROW_ROW: u32 = 32;

/// Expand a RRRGGGBB byte to full-range RGB.
pub fn rgb888(byte: u8) -> Rgb<u8> {
    let byte = byte as u16;
    let r = (byte >> 5) & 0x7;
    let g = (byte >> 2) & 0x7;
    let b = byte & 0x3;
    Rgb([(r * 255 / 7) as u8, (g * 255 / 7) as u8, (b * 255 / 3) as u8])
}

pub fn decode_frame(frame: &[u8]) -> Result<RgbImage, ToolError> {
    if frame.len() != VGA_BYTES {
        return Err(ToolError::FrameSize {
            len: frame.len(),
            expected: VGA_BYTES,
        });
    }
    Ok(RgbImage::from_fn(VGA_WIDTH, VGA_HEIGHT, |x, y| {
        rgb888(frame[(y * VGA_WIDTH + x) as usize])
    }))
}

/// Width and height to show `len` bytes as, when the caller gave none.
///
/// Square lengths use their side. Otherwise rows of 256 (or 32 for small buffers), and a single
/// row when even that does not fill one.
pub fn guess_dimensions(len: usize) -> (u32, u32) {
    if let Some(side) = square_side(len) {
        return (side, side);
    }
    let len = len as u32;
    let width = if len >= WIDE_ROW { WIDE_ROW } else { NARROW_ROW };
    match len / width {
        0 => (len.max(1), 1),
        height => (width, height),
    }
}

/// Grayscale view of `bytes`, zero padded or cut to `width * height`.
pub fn grayscale(bytes: &[u8], width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let index = (y * width + x) as usize;
        Luma([bytes.get(index).copied().unwrap_or(0)])
    })
}

/// Both images next to each other, top-aligned on white.
pub fn side_by_side(left: &GrayImage, right: &GrayImage) -> GrayImage {
    let width = left.width() + GAP + right.width();
    let height = left.height().max(right.height());
    GrayImage::from_fn(width, height, |x, y| {
        let (image, x) = if x < left.width() {
            (left, x)
        } else if x >= left.width() + GAP {
            (right, x - left.width() - GAP)
        } else {
            return Luma([u8::MAX]);
        };
        if y < image.height() {
            *image.get_pixel(x, y)
        } else {
            Luma([u8::MAX])
        }
    })
}

/// True when `output` is close to the byte-wise complement of `input`.
///
/// Each pair should sum to 255; the mean of the sums mod 256 must reach 254.
pub fn looks_inverted(input: &[u8], output: &[u8]) -> bool {
    let len = input.len().min(output.len());
    if len == 0 {
        return false;
    }
    let total: u64 = input
        .iter()
        .zip(output)
        .map(|(&a, &b)| a.wrapping_add(b) as u64)
        .sum();
    total as f64 / len as f64 >= 254.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtekv_pipeline::rgb332;

    #[test]
    fn expands_channels() {
        assert_eq!(rgb888(0xFF), Rgb([255, 255, 255]));
        assert_eq!(rgb888(0x00), Rgb([0, 0, 0]));
        assert_eq!(rgb888(0b111_000_00), Rgb([255, 0, 0]));
        assert_eq!(rgb888(0b000_000_01), Rgb([0, 0, 85]));
        // Mid gray loses a little to the three-level blue channel.
        assert_eq!(rgb888(rgb332(128)), Rgb([109, 109, 85]));
    }

    #[test]
    fn frame_must_be_full_size() {
        let err = decode_frame(&[0; 100]).unwrap_err();
        assert!(matches!(err, ToolError::FrameSize { len: 100, expected: VGA_BYTES }));

        let mut frame = vec![0; VGA_BYTES];
        frame[VGA_BYTES - 1] = 0xFF;
        let image = decode_frame(&frame).unwrap();
        assert_eq!(image.dimensions(), (320, 240));
        assert_eq!(*image.get_pixel(319, 239), Rgb([255, 255, 255]));
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn dimension_guesses() {
        assert_eq!(guess_dimensions(1024), (32, 32));
        assert_eq!(guess_dimensions(1000), (256, 3));
        assert_eq!(guess_dimensions(100), (32, 3));
        assert_eq!(guess_dimensions(10), (10, 1));
        assert_eq!(guess_dimensions(0), (1, 1));
    }

    #[test]
    fn grayscale_pads_and_cuts() {
        let image = grayscale(&[1, 2, 3], 2, 2);
        assert_eq!(image.into_raw(), [1, 2, 3, 0]);
        let image = grayscale(&[1, 2, 3, 4, 5], 2, 2);
        assert_eq!(image.into_raw(), [1, 2, 3, 4]);
    }

    #[test]
    fn halves_are_separated() {
        let left = grayscale(&[10; 4], 2, 2);
        let right = grayscale(&[20; 9], 3, 3);
        let both = side_by_side(&left, &right);
        assert_eq!(both.dimensions(), (2 + GAP + 3, 3));
        assert_eq!(both.get_pixel(1, 1).0, [10]);
        assert_eq!(both.get_pixel(2, 0).0, [255]);
        assert_eq!(both.get_pixel(2 + GAP, 2).0, [20]);
        // Under the shorter half.
        assert_eq!(both.get_pixel(0, 2).0, [255]);
    }

    #[test]
    fn inversion_guess() {
        let input: Vec<u8> = (0..=255).collect();
        let inverted: Vec<u8> = input.iter().map(|b| 255 - b).collect();
        assert!(looks_inverted(&input, &inverted));
        assert!(!looks_inverted(&input, &input));
        assert!(!looks_inverted(&[], &[]));
    }
}
