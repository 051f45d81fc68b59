// "Random" button: fresh shifts, scale and (optionally) pattern.

use rand::Rng;

use crate::gallery::PatternGallery;
use crate::types::{DisplacementMode, DisplacementParams, PatternRef};

/// Inclusive range for both shifts.
pub const SHIFT_RANGE: std::ops::RangeInclusive<i32> = -100..=100;
/// Half-open range for the scale.
pub const SCALE_RANGE: std::ops::Range<f64> = 1.0..5.0;

/// One randomize action's worth of values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomDraw {
    pub x_shift: i32,
    pub y_shift: i32,
    pub scale: f64,
    pub pattern: Option<PatternRef>,
}

impl RandomDraw {
    /// Copy shifts and scale into `params`. The mode is left alone.
    pub fn apply_to(&self, params: &mut DisplacementParams) {
        params.x_shift = self.x_shift;
        params.y_shift = self.y_shift;
        params.scale = self.scale;
    }

    /// Apply the whole draw to the current selection. A drawn pattern replaces
    /// `pattern`, and unless `mode_pinned` the mode follows its gallery slot,
    /// the same pairing a manual pattern pick gets.
    pub fn apply_with_pattern(
        &self,
        params: &mut DisplacementParams,
        pattern: &mut PatternRef,
        gallery: &PatternGallery,
        mode_pinned: bool,
    ) {
        self.apply_to(params);
        if let Some(drawn) = self.pattern {
            *pattern = drawn;
            if !mode_pinned {
                let slot = gallery.slot(drawn).unwrap_or(0);
                params.mode = DisplacementMode::for_slot(slot);
            }
        }
    }
}

pub struct Randomizer<R> {
    rng: R,
}

impl Randomizer<rand::rngs::ThreadRng> {
    /// Backed by the thread-local generator.
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl<R: Rng> Randomizer<R> {
    /// Use a specific generator (seeded ones make draws reproducible).
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Shifts uniform in [-100, 100], scale uniform in [1, 5).
    pub fn draw(&mut self) -> RandomDraw {
        RandomDraw {
            x_shift: self.rng.random_range(SHIFT_RANGE),
            y_shift: self.rng.random_range(SHIFT_RANGE),
            scale: self.rng.random_range(SCALE_RANGE),
            pattern: None,
        }
    }

    /// Like [`draw`](Self::draw), plus a pattern picked uniformly over the whole gallery.
    pub fn draw_with_pattern(&mut self, gallery: &PatternGallery) -> RandomDraw {
        let mut d = self.draw();
        if !gallery.is_empty() {
            let slot = self.rng.random_range(0..gallery.len());
            d.pattern = gallery.at_slot(slot);
        }
        log::debug!("random draw {d:?}");
        d
    }
}

impl Default for Randomizer<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}
