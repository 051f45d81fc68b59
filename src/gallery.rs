// The pattern gallery: ten built-in tileable patterns generated at startup,
// plus whatever custom patterns the user loads, kept in load order.

use std::f64::consts::TAU;

use crate::error::{Error, Result};
use crate::types::{PatternRef, PixelBuffer};

/// Side of every built-in pattern. All generators repeat with this period.
pub const PATTERN_SIZE: u32 = 64;

pub const BUILTIN_NAMES: [&str; 10] = [
    "stripes", "waves", "checker", "rings", "diagonal", "dots", "noise", "ramp", "bricks", "ripple",
];

pub struct PatternGallery {
    builtins: Vec<PixelBuffer>,
    custom: Vec<PixelBuffer>,
}

impl PatternGallery {
    /// Generate the built-ins. No custom patterns yet.
    pub fn new() -> Self {
        let builtins = (0..BUILTIN_NAMES.len())
            .map(|id| {
                PixelBuffer::from_fn(PATTERN_SIZE, PATTERN_SIZE, |x, y| {
                    let v = builtin_value(id, x, y);
                    [v, v, v, 255]
                })
            })
            .collect();
        Self {
            builtins,
            custom: Vec::new(),
        }
    }

    pub fn builtin_count(&self) -> usize {
        self.builtins.len()
    }

    pub fn custom_count(&self) -> usize {
        self.custom.len()
    }

    /// Built-ins and customs together.
    pub fn len(&self) -> usize {
        self.builtins.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a user pattern; it gets the next `Custom` id.
    pub fn add_custom(&mut self, pattern: PixelBuffer) -> Result<PatternRef> {
        pattern.ensure_not_empty()?;
        self.custom.push(pattern);
        let r = PatternRef::Custom(self.custom.len() - 1);
        log::info!("added custom pattern {r}");
        Ok(r)
    }

    pub fn get(&self, r: PatternRef) -> Result<&PixelBuffer> {
        let found = match r {
            PatternRef::Builtin(i) => self.builtins.get(i),
            PatternRef::Custom(i) => self.custom.get(i),
        };
        found.ok_or(Error::UnknownPattern(r))
    }

    pub fn contains(&self, r: PatternRef) -> bool {
        self.get(r).is_ok()
    }

    /// Every reference, built-ins first, customs in load order.
    pub fn refs(&self) -> Vec<PatternRef> {
        (0..self.builtins.len())
            .map(PatternRef::Builtin)
            .chain((0..self.custom.len()).map(PatternRef::Custom))
            .collect()
    }

    /// Position of `r` in [`refs`](Self::refs) order.
    pub fn slot(&self, r: PatternRef) -> Option<usize> {
        match r {
            PatternRef::Builtin(i) if i < self.builtins.len() => Some(i),
            PatternRef::Custom(i) if i < self.custom.len() => Some(self.builtins.len() + i),
            _ => None,
        }
    }

    /// The reference at a `refs` position.
    pub fn at_slot(&self, slot: usize) -> Option<PatternRef> {
        if slot < self.builtins.len() {
            Some(PatternRef::Builtin(slot))
        } else if slot < self.len() {
            Some(PatternRef::Custom(slot - self.builtins.len()))
        } else {
            None
        }
    }

    /// Following pattern, wrapping to the first one.
    pub fn next(&self, r: PatternRef) -> PatternRef {
        self.step(r, 1)
    }

    /// Preceding pattern, wrapping to the last one.
    pub fn prev(&self, r: PatternRef) -> PatternRef {
        self.step(r, self.len().saturating_sub(1))
    }

    fn step(&self, r: PatternRef, by: usize) -> PatternRef {
        let len = self.len();
        if len == 0 {
            return r;
        }
        let slot = self.slot(r).map_or(0, |s| (s + by) % len);
        self.at_slot(slot).unwrap_or(r)
    }

    /// Short label for the HUD and logs.
    pub fn name(&self, r: PatternRef) -> String {
        match r {
            PatternRef::Builtin(i) => BUILTIN_NAMES.get(i).copied().unwrap_or("?").to_string(),
            PatternRef::Custom(i) => format!("custom {i}"),
        }
    }
}

impl Default for PatternGallery {
    fn default() -> Self {
        Self::new()
    }
}

/// Gray level of built-in `id` at (x, y). Periodic in `PATTERN_SIZE` on both axes.
fn builtin_value(id: usize, x: u32, y: u32) -> u8 {
    let (x, y) = (x % PATTERN_SIZE, y % PATTERN_SIZE);
    let n = PATTERN_SIZE as f64;
    let (fx, fy) = (x as f64, y as f64);
    let wave = |t: f64| (127.5 + 127.5 * t).round().clamp(0.0, 255.0) as u8;

    match id {
        // 8px vertical bars
        0 => on_off((x / 8) % 2 == 0),
        1 => wave((TAU * (2.0 * fx / n) + 2.0 * (TAU * fy / n).sin()).sin()),
        2 => on_off((x / 16 + y / 16) % 2 == 0),
        3 => {
            let dx = x as f64 - n / 2.0;
            let dy = y as f64 - n / 2.0;
            wave((TAU * dx.hypot(dy) / 16.0).cos())
        }
        4 => (((x + y) % 16) * 16) as u8,
        5 => {
            let dx = (x % 16) as f64 - 7.5;
            let dy = (y % 16) as f64 - 7.5;
            on_off(dx.hypot(dy) <= 5.0)
        }
        6 => value_noise(x, y),
        // triangle ramp, seamless at the tile edge
        7 => {
            let t = x as i32 - 32;
            ((32 - t.abs()) * 8).min(255) as u8
        }
        8 => {
            let row = y / 16;
            let shift = if row % 2 == 0 { 0 } else { 16 };
            let mortar = y % 16 < 2 || (x + shift) % 32 < 2;
            on_off(mortar)
        }
        9 => wave((TAU * fx / 32.0).sin() * (TAU * fy / 32.0).cos()),
        _ => 0,
    }
}

#[inline]
fn on_off(on: bool) -> u8 {
    if on { 255 } else { 0 }
}

/// Smoothed value noise on an 8x8 lattice that wraps at the tile edge.
fn value_noise(x: u32, y: u32) -> u8 {
    const CELL: u32 = 8;
    const CELLS: u32 = PATTERN_SIZE / CELL;

    let (cx, cy) = (x / CELL, y / CELL);
    let tx = smooth((x % CELL) as f64 / CELL as f64);
    let ty = smooth((y % CELL) as f64 / CELL as f64);

    let corner = |i: u32, j: u32| lattice(i % CELLS, j % CELLS);
    let top = lerp(corner(cx, cy), corner(cx + 1, cy), tx);
    let bottom = lerp(corner(cx, cy + 1), corner(cx + 1, cy + 1), tx);
    (lerp(top, bottom, ty) * 255.0).round() as u8
}

fn lattice(i: u32, j: u32) -> f64 {
    let mut h = i.wrapping_mul(0x27d4_eb2d) ^ j.wrapping_mul(0x1656_67b1) ^ 0x9e37_79b9;
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    (h & 0xFFFF) as f64 / 65535.0
}

#[inline]
fn smooth(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_square_builtins() {
        let g = PatternGallery::new();
        assert_eq!(g.builtin_count(), 10);
        assert_eq!(g.len(), 10);
        for r in g.refs() {
            let p = g.get(r).unwrap();
            assert_eq!((p.width(), p.height()), (PATTERN_SIZE, PATTERN_SIZE));
        }
    }

    #[test]
    fn smooth_builtins_have_no_seam() {
        // waves, rings, noise, ramp, ripple: the jump across the tile edge is
        // no larger than the largest jump inside the tile.
        let g = PatternGallery::new();
        for id in [1, 3, 6, 7, 9] {
            let p = g.get(PatternRef::Builtin(id)).unwrap();
            let last = PATTERN_SIZE - 1;
            let diff = |a: u8, b: u8| (a as i32 - b as i32).abs();

            let mut inner = 0;
            let mut seam = 0;
            for i in 0..PATTERN_SIZE {
                for j in 0..last {
                    inner = inner.max(diff(p.red(j, i), p.red(j + 1, i)));
                    inner = inner.max(diff(p.red(i, j), p.red(i, j + 1)));
                }
                seam = seam.max(diff(p.red(last, i), p.red(0, i)));
                seam = seam.max(diff(p.red(i, last), p.red(i, 0)));
            }
            assert!(seam <= inner + 1, "{}: seam {seam} > inner {inner}", BUILTIN_NAMES[id]);
        }
    }

    #[test]
    fn builtins_are_not_flat() {
        let g = PatternGallery::new();
        for r in g.refs() {
            let p = g.get(r).unwrap();
            let first = p.red(0, 0);
            let varies = (0..PATTERN_SIZE)
                .flat_map(|y| (0..PATTERN_SIZE).map(move |x| (x, y)))
                .any(|(x, y)| p.red(x, y) != first);
            assert!(varies, "{} is flat", g.name(r));
        }
    }

    #[test]
    fn custom_patterns_keep_load_order() {
        let mut g = PatternGallery::new();
        let a = g.add_custom(PixelBuffer::filled(3, 3, [1, 0, 0, 255])).unwrap();
        let b = g.add_custom(PixelBuffer::filled(5, 2, [2, 0, 0, 255])).unwrap();
        assert_eq!((a, b), (PatternRef::Custom(0), PatternRef::Custom(1)));
        assert_eq!(g.len(), 12);
        assert_eq!(g.get(b).unwrap().red(0, 0), 2);
        assert_eq!(g.slot(b), Some(11));
        assert_eq!(g.at_slot(10), Some(a));
        assert_eq!(g.refs().last(), Some(&b));
    }

    #[test]
    fn empty_custom_pattern_is_rejected() {
        let mut g = PatternGallery::new();
        assert!(matches!(
            g.add_custom(PixelBuffer::filled(0, 4, [0; 4])),
            Err(Error::InvalidDimensions { .. })
        ));
        assert_eq!(g.custom_count(), 0);
    }

    #[test]
    fn unknown_refs_fail() {
        let g = PatternGallery::new();
        assert!(matches!(g.get(PatternRef::Builtin(10)), Err(Error::UnknownPattern(_))));
        assert!(matches!(g.get(PatternRef::Custom(0)), Err(Error::UnknownPattern(_))));
    }

    #[test]
    fn stepping_wraps_across_both_lists() {
        let mut g = PatternGallery::new();
        let c = g.add_custom(PixelBuffer::filled(1, 1, [0; 4])).unwrap();
        assert_eq!(g.next(PatternRef::Builtin(9)), c);
        assert_eq!(g.next(c), PatternRef::Builtin(0));
        assert_eq!(g.prev(PatternRef::Builtin(0)), c);
        assert_eq!(g.prev(c), PatternRef::Builtin(9));
        assert_eq!(g.next(PatternRef::Custom(7)), PatternRef::Builtin(0));
    }
}
