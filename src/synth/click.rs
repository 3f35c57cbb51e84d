/// Peak amplitude of the click transient in output sample units.
pub const CLICK_AMPLITUDE: f32 = 6_000.0;

/// Short alternating-sign tick mixed on top of the output, used as audible
/// feedback for sequencer steps and UI actions.
#[derive(Debug, Clone, Copy)]
pub struct ClickOverlay {
    length: u16,
    remaining: u16,
}

impl ClickOverlay {
    /// Click lasting 2.5 ms, at least one sample.
    pub fn new(sample_rate: f32) -> Self {
        let length = (sample_rate / 400.0) as u32;
        Self {
            length: length.clamp(1, u16::MAX as u32) as u16,
            remaining: 0,
        }
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Re-arm from full length, even if a click is still decaying.
    pub fn trigger(&mut self) {
        self.remaining = self.length;
    }

    /// This frame's contribution; zero once the click has run out.
    #[inline]
    pub fn next(&mut self) -> i32 {
        if self.remaining == 0 {
            return 0;
        }
        let env = self.remaining as f32 / self.length as f32;
        let sign = if self.remaining & 1 == 1 { 1.0 } else { -1.0 };
        self.remaining -= 1;
        (sign * env * CLICK_AMPLITUDE) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_with_alternating_sign_then_stops() {
        let mut click = ClickOverlay::new(16_384.0);
        let length = click.length() as usize;
        assert_eq!(length, 40);

        click.trigger();
        let values: Vec<i32> = (0..length + 10).map(|_| click.next()).collect();

        let (burst, tail) = values.split_at(length);
        assert!(burst.windows(2).all(|w| w[0].signum() == -w[1].signum()));
        assert!(burst.windows(2).all(|w| w[1].abs() < w[0].abs()));
        assert_eq!(burst[0].abs(), CLICK_AMPLITUDE as i32);
        assert!(tail.iter().all(|&v| v == 0));
        assert!(!click.is_active());
    }

    #[test]
    fn tiny_sample_rates_still_click() {
        let mut click = ClickOverlay::new(100.0);
        assert_eq!(click.length(), 1);
        click.trigger();
        assert_ne!(click.next(), 0);
        assert_eq!(click.next(), 0);
    }
}
