//! Test inputs: a square grayscale image for upload and a full VGA frame.

use dtekv_pipeline::Rgb332Lut;
use dtekv_pipeline::compositor::{VgaSurface, square_side};
use dtekv_pipeline::regs::VGA_WIDTH;
use dtekv_pipeline::sim::SimBus;
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};

use crate::error::ToolError;

/// Upload size used when none is given, a 32x32 image.
pub const DEFAULT_IMAGE_BYTES: usize = 1024;

const IMAGE_CELL: usize = 4;
const FRAME_CELL: u32 = 16;

/// Checkerboard with a left-to-right ramp on top, `len` bytes row-major.
pub fn checker_ramp(len: usize) -> Result<Vec<u8>, ToolError> {
    let side = square_side(len).ok_or(ToolError::NotSquare { len })? as usize;
    let pixels = (0..len)
        .map(|i| {
            let (x, y) = (i % side, i / side);
            let cell = ((x / IMAGE_CELL + y / IMAGE_CELL) % 2) * 128;
            (cell + 127 * x / side) as u8
        })
        .collect();
    Ok(pixels)
}

/// A 320x240 RRRGGGBB frame, encoded the same way the board fills its VGA buffer.
pub fn test_frame() -> Vec<u8> {
    let mut bus = SimBus::new();
    let lut = Rgb332Lut::new();
    {
        let mut surface = VgaSurface::new(&mut bus, &lut);
        let area = Rectangle::new(Point::zero(), surface.size());
        let colors = area.points().map(frame_gray);
        surface
            .fill_contiguous(&area, colors)
            .unwrap_or_else(|never| match never {});
    }
    bus.frame()
}

fn frame_gray(p: Point) -> Gray8 {
    let (x, y) = (p.x as u32, p.y as u32);
    let cell = ((x / FRAME_CELL + y / FRAME_CELL) % 2) * 128;
    let ramp = 255 * x / (VGA_WIDTH - 1);
    Gray8::new((cell + ramp).min(255) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtekv_pipeline::regs::VGA_BYTES;
    use dtekv_pipeline::rgb332;

    #[test]
    fn default_image_is_32_square() {
        let image = checker_ramp(DEFAULT_IMAGE_BYTES).unwrap();
        assert_eq!(image.len(), 1024);
        assert_eq!(image[0], 0);
        // Second cell of the first row.
        assert_eq!(image[4], 128 + 15);
        // Diagonal cell is dark again.
        assert_eq!(image[4 * 32 + 4], 15);
        assert_eq!(image[31], 128 + 123);
    }

    #[test]
    fn non_square_length_is_refused() {
        assert!(matches!(checker_ramp(1000), Err(ToolError::NotSquare { len: 1000 })));
        assert!(matches!(checker_ramp(0), Err(ToolError::NotSquare { len: 0 })));
        assert_eq!(checker_ramp(1).unwrap(), [0]);
    }

    #[test]
    fn frame_is_packed_rgb332() {
        let frame = test_frame();
        assert_eq!(frame.len(), VGA_BYTES);
        assert_eq!(frame[0], rgb332(0));
        assert_eq!(frame[16], rgb332((128 + 255 * 16 / 319u32) as u8));
        // Bright cell at the right edge saturates.
        assert_eq!(frame[319], 0xFF);
        // Second row of cells flips the checker.
        assert_eq!(frame[16 * 320], rgb332(128));
    }
}
