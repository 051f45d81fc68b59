// Core types shared by the engine, the magnifier and the preview window.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;

use crate::error::{Error, Result};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// An RGBA8 image, row-major, 4 bytes per pixel.
///
/// `data.len() == width * height * 4` always holds for buffers built through
/// [`PixelBuffer::new`] or [`PixelBuffer::filled`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(byte_len(width, height));
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fails with `InvalidDimensions` for a zero-sized buffer.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// The RGBA value at (x, y). Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Red channel at (x, y).
    #[inline]
    pub fn red(&self, x: u32, y: u32) -> u8 {
        self.data[self.index(x, y)]
    }

    /// Hand the bytes to the `image` crate (for encoding).
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let expected = byte_len(self.width, self.height);
        let actual = self.data.len();
        RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or(Error::BufferLength { expected, actual })
    }

    /// Pack into 0x00RRGGBB pixels for the window. Alpha is dropped.
    pub fn to_frame_buffer(&self) -> FrameBuffer {
        let pixels = self
            .data
            .chunks_exact(CHANNELS)
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        FrameBuffer {
            width: self.width as usize,
            height: self.height as usize,
            pixels,
        }
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

#[inline]
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

/// What the window shows: one 0x00RRGGBB u32 per pixel.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

/// Which axis (or polar transform) the pattern perturbs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplacementMode {
    #[default]
    Horizontal,
    Vertical,
    Radial,
}

impl DisplacementMode {
    pub const ALL: [DisplacementMode; 3] = [Self::Horizontal, Self::Vertical, Self::Radial];

    /// Next mode in H -> V -> R -> H order.
    pub fn next(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Radial,
            Self::Radial => Self::Horizontal,
        }
    }

    /// Mode paired with a gallery slot (slot mod 3).
    pub fn for_slot(slot: usize) -> Self {
        Self::ALL[slot % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Radial => "radial",
        }
    }
}

impl fmt::Display for DisplacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplacementMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h" | "horizontal" => Ok(Self::Horizontal),
            "v" | "vertical" => Ok(Self::Vertical),
            "r" | "radial" => Ok(Self::Radial),
            _ => Err(format!("unknown mode '{s}'")),
        }
    }
}

/// Inputs of one displacement pass besides the two buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplacementParams {
    /// Pattern tiling offset along x. Any integer is accepted.
    pub x_shift: i32,
    /// Pattern tiling offset along y. Any integer is accepted.
    pub y_shift: i32,
    /// Displacement strength; not clamped by the engine.
    pub scale: f64,
    pub mode: DisplacementMode,
}

impl Default for DisplacementParams {
    fn default() -> Self {
        Self {
            x_shift: 15,
            y_shift: 0,
            scale: 1.0,
            mode: DisplacementMode::Horizontal,
        }
    }
}

/// A magnifier query against an already displaced buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagnifierRequest {
    /// Magnification, must be >= 1.
    pub zoom: f64,
    /// Point (in buffer pixels) the window is centred on when possible.
    pub focal: (f64, f64),
    /// Side of the square result.
    pub output_size: u32,
}

/// Where a pattern lives in the gallery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternRef {
    Builtin(usize),
    Custom(usize),
}

impl fmt::Display for PatternRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternRef::Builtin(i) => write!(f, "builtin:{i}"),
            PatternRef::Custom(i) => write!(f, "custom:{i}"),
        }
    }
}

impl FromStr for PatternRef {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| format!("expected builtin:N or custom:N, got '{s}'"))?;
        let id: usize = id.trim().parse().map_err(|_| format!("invalid pattern id in '{s}'"))?;
        match kind.trim() {
            "builtin" => Ok(PatternRef::Builtin(id)),
            "custom" => Ok(PatternRef::Custom(id)),
            other => Err(format!("unknown pattern kind '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
        match PixelBuffer::new(2, 2, vec![0; 15]) {
            Err(Error::BufferLength {
                expected: 16,
                actual: 15,
            }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn frame_buffer_packs_rgb() {
        let buf = PixelBuffer::filled(1, 1, [0x12, 0x34, 0x56, 0x00]);
        let fb = buf.to_frame_buffer();
        assert_eq!(fb.pixels, vec![0x0012_3456]);
    }

    #[test]
    fn rgba_image_conversion_keeps_bytes() {
        let buf = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 7, 255]);
        let img = buf.clone().into_rgba_image().unwrap();
        assert_eq!(img.get_pixel(2, 1).0, [2, 1, 7, 255]);
        assert_eq!(PixelBuffer::from(img), buf);
    }

    #[test]
    fn mode_cycle_and_slots() {
        assert_eq!(DisplacementMode::Radial.next(), DisplacementMode::Horizontal);
        assert_eq!(DisplacementMode::for_slot(4), DisplacementMode::Vertical);
        assert_eq!("R".parse::<DisplacementMode>(), Ok(DisplacementMode::Radial));
        assert!("diagonal".parse::<DisplacementMode>().is_err());
    }

    #[test]
    fn pattern_ref_parses_and_displays() {
        assert_eq!("builtin:3".parse::<PatternRef>(), Ok(PatternRef::Builtin(3)));
        assert_eq!("custom:0".parse::<PatternRef>(), Ok(PatternRef::Custom(0)));
        assert!("3".parse::<PatternRef>().is_err());
        assert!("other:1".parse::<PatternRef>().is_err());
        assert_eq!(PatternRef::Custom(2).to_string(), "custom:2");
    }
}
