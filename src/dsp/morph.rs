//! Continuous waveform morphing across a five-shape palette.

/*
Waveform Morph
==============

The morph knob sweeps a single position through five shapes:

    0 ────── 1 ────── 2 ────── 3 ────── 4
    sine   triangle   saw     pulse   square

Between two integer stops the output is a straight crossfade:

    region = floor(morph)
    blend  = morph - region
    out    = palette[region] + (palette[region + 1] - palette[region]) · blend

so at every integer stop the two neighbouring regions agree and the sweep
has no jumps.

The pulse slot is special: its duty cycle moves with the knob.

    region 2 (saw → pulse)     width = 0.1 + 0.8 · blend     10% → 90%
    region 3 (pulse → square)  width = 0.9 - 0.4 · blend     90% → 50%
    elsewhere                  width = 0.5

Both formulas give 0.9 at morph = 3.0, and region 3 ends at 50% duty, which
is exactly the square. The pulse therefore narrows, widens, then melts into
the square without a step anywhere on the knob.
*/

/// Number of shapes the morph position travels through.
pub const PALETTE_LEN: usize = 5;

/// Highest morph position.
pub const MORPH_MAX: f32 = (PALETTE_LEN - 1) as f32;

/// Shapes in morph order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSlot {
    Sine,
    Triangle,
    Saw,
    Pulse,
    Square,
}

impl PaletteSlot {
    pub const ALL: [PaletteSlot; PALETTE_LEN] = [
        PaletteSlot::Sine,
        PaletteSlot::Triangle,
        PaletteSlot::Saw,
        PaletteSlot::Pulse,
        PaletteSlot::Square,
    ];
}

/// One frame's worth of candidate samples, indexed by `PaletteSlot`.
pub type Palette = [i32; PALETTE_LEN];

/// A morph knob position split into region and blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphPosition {
    region: usize,
    blend: f32,
}

impl MorphPosition {
    /// Split a raw morph value. Out-of-range and non-finite input is clamped.
    pub fn new(morph: f32) -> Self {
        let morph = if morph.is_finite() {
            morph.clamp(0.0, MORPH_MAX)
        } else {
            0.0
        };
        let region = (morph as usize).min(PALETTE_LEN - 1);
        Self {
            region,
            blend: morph - region as f32,
        }
    }

    pub fn region(&self) -> usize {
        self.region
    }

    pub fn blend(&self) -> f32 {
        self.blend
    }

    /// Duty cycle of the pulse slot at this position.
    pub fn pulse_width(&self) -> f32 {
        match self.region {
            2 => 0.1 + 0.8 * self.blend,
            3 => 0.9 - 0.4 * self.blend,
            _ => 0.5,
        }
    }

    /// Palette entry by index; anything past the end reads the square.
    #[inline]
    pub fn select_wave(palette: &Palette, index: usize) -> i32 {
        palette[index.min(PALETTE_LEN - 1)]
    }

    /// Crossfade between this region's shape and the next one.
    #[inline]
    pub fn mix(&self, palette: &Palette) -> i32 {
        let first = Self::select_wave(palette, self.region);
        let second = Self::select_wave(palette, self.region + 1);
        first + ((second - first) as f32 * self.blend) as i32
    }
}
