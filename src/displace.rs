// Pattern-driven displacement: every output pixel is copied from a source
// location pushed away by the (tiled) pattern's red channel.
//
// Nearest-neighbour on purpose: the blocky "pixel glass" look comes from
// copying whole pixels, never blending.

use rayon::prelude::*;

use crate::error::Result;
use crate::types::{CHANNELS, DisplacementMode, DisplacementParams, PixelBuffer};

/// Pixels of travel for a normalized displacement of 1.0.
pub const DISPLACEMENT_PIXELS: f64 = 20.0;

/// Displace `source` by `pattern` and return a fresh buffer of the source's size.
///
/// The pattern is tiled (not stretched) starting at `(x_shift, y_shift)`.
/// Fails with `InvalidDimensions` when either buffer has a zero side; nothing
/// else is an error, including `scale == 0` (identity copy) and negative shifts.
pub fn apply(
    source: &PixelBuffer,
    pattern: &PixelBuffer,
    params: &DisplacementParams,
) -> Result<PixelBuffer> {
    source.ensure_not_empty()?;
    pattern.ensure_not_empty()?;

    let (w, h) = (source.width(), source.height());
    log::debug!(
        "displace {}x{} with {}x{} pattern: shift=({}, {}) scale={} mode={}",
        w,
        h,
        pattern.width(),
        pattern.height(),
        params.x_shift,
        params.y_shift,
        params.scale,
        params.mode
    );

    let src = source.data();
    let row_bytes = w as usize * CHANNELS;
    let mut out = vec![0u8; row_bytes * h as usize];

    // Rows only read the two inputs and write their own slice.
    out.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            let py = tile(y, params.y_shift, pattern.height());

            for x in 0..w {
                let px = tile(x, params.x_shift, pattern.width());
                let displacement = pattern.red(px, py) as f64 / 255.0 * params.scale;

                let (sx, sy) = source_coord(x, y, displacement, w, h, params.mode);
                let from = source.index(sx, sy);
                let to = x as usize * CHANNELS;
                row[to..to + CHANNELS].copy_from_slice(&src[from..from + CHANNELS]);
            }
        });

    PixelBuffer::new(w, h, out)
}

/// Where output pixel (x, y) reads from, already clamped into the source.
///
/// `displacement` is the normalized pattern value times `scale`.
pub fn source_coord(
    x: u32,
    y: u32,
    displacement: f64,
    width: u32,
    height: u32,
    mode: DisplacementMode,
) -> (u32, u32) {
    let offset = displacement * DISPLACEMENT_PIXELS;
    let (xf, yf) = (x as f64, y as f64);

    let (sx, sy) = match mode {
        DisplacementMode::Horizontal => (xf + offset, yf),
        DisplacementMode::Vertical => (xf, yf + offset),
        DisplacementMode::Radial => {
            let cx = width as f64 / 2.0;
            let cy = height as f64 / 2.0;
            let (dx, dy) = (xf - cx, yf - cy);
            let angle = dy.atan2(dx);
            // c + (r + offset) * dir, written as p + offset * dir so that a zero
            // offset lands exactly on (x, y).
            (xf + offset * angle.cos(), yf + offset * angle.sin())
        }
    };

    (clamp_floor(sx, width), clamp_floor(sy, height))
}

/// (coord + shift) mod period, always in [0, period).
#[inline]
fn tile(coord: u32, shift: i32, period: u32) -> u32 {
    (coord as i64 + shift as i64).rem_euclid(period as i64) as u32
}

/// Clamp into [0, extent - 1] then floor. NaN ends up at 0.
#[inline]
fn clamp_floor(v: f64, extent: u32) -> u32 {
    let max = extent.saturating_sub(1) as f64;
    v.clamp(0.0, max).floor() as u32
}
