//! Draws a square grayscale image centred on the 320x240 VGA frame.

use core::convert::Infallible;

use embedded_graphics::{
    Pixel,
    pixelcolor::{Gray8, GrayColor},
    prelude::{DrawTarget, OriginDimensions, Point, Size},
    primitives::{PointsIter, Rectangle},
};

use crate::console::Console;
use crate::lut::{Lut, Rgb332Lut};
use crate::regs::{Bus, VGA_BASE, VGA_HEIGHT, VGA_WIDTH};

/// Colour of every pixel outside the image.
pub const BACKGROUND: Gray8 = Gray8::BLACK;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// The byte count has no integer square root, so the image size is unknown.
    NotSquare { len: usize },
    /// The image is wider or taller than the surface.
    TooLarge { side: u32 },
}

impl RenderError {
    fn message(self) -> &'static str {
        match self {
            RenderError::NotSquare { .. } => {
                "VGA Error: Input data length is not a perfect square.\n"
            }
            RenderError::TooLarge { .. } => "VGA Error: Input image does not fit the frame.\n",
        }
    }
}

/// Where a `side` x `side` image lands on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Placement {
    pub side: u32,
    pub start_x: u32,
    pub start_y: u32,
}

impl Placement {
    /// Centre with truncating division. `None` if the image does not fit.
    pub fn centered(side: u32, surface: Size) -> Option<Self> {
        Some(Placement {
            side,
            start_x: surface.width.checked_sub(side)? / 2,
            start_y: surface.height.checked_sub(side)? / 2,
        })
    }

    pub fn area(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.start_x as i32, self.start_y as i32),
            Size::new(self.side, self.side),
        )
    }

    /// The image sample under surface point `p`, if `p` is inside the image.
    fn sample(&self, image: &[u8], p: Point) -> Option<u8> {
        let x = u32::try_from(p.x).ok()?.checked_sub(self.start_x)?;
        let y = u32::try_from(p.y).ok()?.checked_sub(self.start_y)?;
        if x >= self.side || y >= self.side {
            return None;
        }
        image.get((y * self.side + x) as usize).copied()
    }
}

/// Side length of a square image of `len` bytes, found by counting up until `i * i` passes `len`.
///
/// Zero is not a usable side, so an empty image has none.
pub fn square_side(len: usize) -> Option<u32> {
    let len = len as u64;
    let mut i: u64 = 1;
    while i * i <= len {
        if i * i == len {
            return Some(i as u32);
        }
        i += 1;
    }
    None
}

/// The VGA frame in board memory, one RRRGGGBB byte per pixel.
pub struct VgaSurface<'a, B: Bus, L: Lut = Rgb332Lut> {
    bus: &'a mut B,
    lut: &'a L,
}

impl<'a, B: Bus, L: Lut> VgaSurface<'a, B, L> {
    pub fn new(bus: &'a mut B, lut: &'a L) -> Self {
        VgaSurface { bus, lut }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Gray8) {
        let offset = (y * VGA_WIDTH + x) as usize;
        self.bus.write_u8(VGA_BASE + offset, self.lut.lookup(color));
    }
}

impl<B: Bus, L: Lut> OriginDimensions for VgaSurface<'_, B, L> {
    fn size(&self) -> Size {
        Size::new(VGA_WIDTH, VGA_HEIGHT)
    }
}

impl<B: Bus, L: Lut> DrawTarget for VgaSurface<'_, B, L> {
    type Color = Gray8;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) {
                if x < VGA_WIDTH && y < VGA_HEIGHT {
                    self.set_pixel(x, y, color);
                }
            }
        }
        Ok(())
    }
}

/// Redraw the whole of `target` with `image` centred on a black background.
///
/// Every surface pixel is written exactly once. On error nothing is written, so the previous
/// frame stays up, and the reason goes to `console`.
pub fn render<D, C>(target: &mut D, image: &[u8], console: &mut C) -> Result<Placement, RenderError>
where
    D: DrawTarget<Color = Gray8, Error = Infallible> + OriginDimensions,
    C: Console + ?Sized,
{
    let placement = square_side(image.len())
        .ok_or(RenderError::NotSquare { len: image.len() })
        .and_then(|side| {
            Placement::centered(side, target.size()).ok_or(RenderError::TooLarge { side })
        });
    let placement = match placement {
        Ok(placement) => placement,
        Err(err) => {
            warn!("not rendering {} bytes: {}", image.len(), err);
            console.put_str(err.message());
            return Err(err);
        }
    };

    console.print(format_args!(
        "Input image detected as {}x{}\n",
        placement.side, placement.side
    ));

    let area = Rectangle::new(Point::zero(), target.size());
    let colors = area.points().map(|p| {
        placement
            .sample(image, p)
            .map(Gray8::new)
            .unwrap_or(BACKGROUND)
    });
    target
        .fill_contiguous(&area, colors)
        .unwrap_or_else(|never| match never {});

    console.put_str("VGA output done: Full 320x240 frame drawn.\n");
    Ok(placement)
}
