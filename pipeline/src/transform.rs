//! Per-byte image transforms.

/// Amount added or removed by [`brighten`] and [`darken`].
pub const STEP: u8 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    None,
    Invert,
    Brighten,
    Darken,
    /// Selector with no transform behind it; the image passes through unchanged.
    Unsupported(u32),
}

impl Method {
    /// Highest selector value that maps to a transform.
    pub const SUPPORTED_MAX: u32 = 3;

    pub const fn from_selector(selector: u32) -> Self {
        match selector {
            0 => Method::None,
            1 => Method::Invert,
            2 => Method::Brighten,
            3 => Method::Darken,
            other => Method::Unsupported(other),
        }
    }

    pub fn apply(self, image: &mut [u8]) {
        let op: fn(u8) -> u8 = match self {
            Method::Invert => invert,
            Method::Brighten => brighten,
            Method::Darken => darken,
            Method::None | Method::Unsupported(_) => return,
        };
        image.iter_mut().for_each(|px| *px = op(*px));
    }
}

/// Transform the first `length` bytes of `buffer` with the method picked by `selector`.
pub fn apply(buffer: &mut [u8], length: usize, selector: u32) {
    let length = length.min(buffer.len());
    Method::from_selector(selector).apply(&mut buffer[..length]);
}

pub const fn invert(value: u8) -> u8 {
    !value
}

pub const fn brighten(value: u8) -> u8 {
    value.saturating_add(STEP)
}

pub const fn darken(value: u8) -> u8 {
    value.saturating_sub(STEP)
}
