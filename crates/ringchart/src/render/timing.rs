use crate::color::Color;

pub const ICON_FADE_DURATION: f64 = 0.3;
pub const CAPTION_FADE_DURATION: f64 = 0.3;

/// A moment of the chart animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    time: f64,
    duration: f64,
}

impl FrameClock {
    /// A NaN `time` counts as the first frame and a NaN `duration` as an instant animation.
    pub fn new(time: f64, duration: f64) -> Self {
        let duration = if duration.is_nan() {
            0.0
        } else {
            duration.max(0.0)
        };
        let time = if time.is_nan() { 0.0 } else { time };
        Self {
            time: time.clamp(0.0, duration),
            duration,
        }
    }

    /// Fraction of the animation elapsed; a zero-length animation is always complete.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else if self.duration.is_infinite() {
            0.0
        } else {
            self.time / self.duration
        }
    }

    /// Icons fade in from the very first frame.
    pub fn icon_alpha(&self) -> f64 {
        let window = ICON_FADE_DURATION.min(self.duration);
        if window <= 0.0 {
            1.0
        } else {
            (self.time / window).clamp(0.0, 1.0)
        }
    }

    /// Captions stay opaque unless hidden, then fade out right before the end.
    pub fn caption_alpha(&self, auto_hide: bool) -> f64 {
        if !auto_hide {
            return 1.0;
        }
        let remaining = self.duration - self.time;
        let window = CAPTION_FADE_DURATION.min(self.duration);
        if window <= 0.0 {
            if remaining > 0.0 { 1.0 } else { 0.0 }
        } else {
            (remaining / window).clamp(0.0, 1.0)
        }
    }
}

/// Angle in radians the band has swept at `progress`.
pub fn sweep_angle(value: f64, progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    value.max(0.0) * std::f64::consts::TAU * progress.clamp(0.0, 1.0)
}

/// Color of a band at local arc progress `p`: flat `start` over the first half, then a
/// linear blend that lands exactly on `end` at `p == 1`.
pub fn band_color(start: Color, end: Color, p: f64) -> Color {
    if p < 0.5 {
        start
    } else if p >= 1.0 {
        end
    } else {
        start.mix(end, (p - 0.5) * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: Color, b: Color) -> f64 {
        let (r1, g1, b1, a1) = a.components();
        let (r2, g2, b2, a2) = b.components();
        (r1 - r2).abs() + (g1 - g2).abs() + (b1 - b2).abs() + (a1 - a2).abs()
    }

    #[test]
    fn test_first_half_is_exactly_start_color() {
        let start = Color::rgb(0.1, 0.2, 0.3);
        let end = Color::rgb(0.9, 0.8, 0.7);
        for p in [0.0, 0.1, 0.25, 0.4999] {
            assert_eq!(band_color(start, end, p), start);
        }
        assert_eq!(band_color(start, end, 0.5), start);
        assert_eq!(band_color(start, end, 1.0), end);
        assert_eq!(band_color(start, end, 1.7), end);
    }

    #[test]
    fn test_second_half_moves_monotonically_to_end_color() {
        let start = Color::rgb(0.1, 0.2, 0.3);
        let end = Color::rgb(0.9, 0.8, 0.7);
        let mut previous = distance(band_color(start, end, 0.5), end);
        for step in 1..=50 {
            let p = 0.5 + step as f64 / 100.0;
            let current = distance(band_color(start, end, p), end);
            assert!(current < previous, "not closer to end color at p = {p}");
            previous = current;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(FrameClock::new(-1.0, 2.0).progress(), 0.0);
        assert_eq!(FrameClock::new(1.0, 2.0).progress(), 0.5);
        assert_eq!(FrameClock::new(5.0, 2.0).progress(), 1.0);
        assert_eq!(FrameClock::new(0.0, 0.0).progress(), 1.0);
    }

    #[test]
    fn test_non_finite_moments_stay_in_range() {
        assert_eq!(FrameClock::new(f64::NAN, 2.0).progress(), 0.0);
        assert_eq!(FrameClock::new(f64::INFINITY, 2.0).progress(), 1.0);
        assert_eq!(FrameClock::new(1.0, f64::NAN).progress(), 1.0);
        assert_eq!(FrameClock::new(1.0, f64::INFINITY).progress(), 0.0);
        assert_eq!(FrameClock::new(f64::INFINITY, f64::INFINITY).progress(), 0.0);
        assert_eq!(FrameClock::new(f64::NAN, 2.0).icon_alpha(), 0.0);
        assert_eq!(sweep_angle(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_sweep_grows_with_progress() {
        assert_eq!(sweep_angle(1.0, 0.0), 0.0);
        assert_eq!(sweep_angle(0.5, 1.0), std::f64::consts::PI);
        assert_eq!(sweep_angle(-0.5, 1.0), 0.0);
    }

    #[test]
    fn test_icon_fades_in() {
        assert_eq!(FrameClock::new(0.0, 2.0).icon_alpha(), 0.0);
        assert!((FrameClock::new(0.15, 2.0).icon_alpha() - 0.5).abs() < 1e-9);
        assert_eq!(FrameClock::new(2.0, 2.0).icon_alpha(), 1.0);
        assert_eq!(FrameClock::new(0.0, 0.0).icon_alpha(), 1.0);
    }

    #[test]
    fn test_caption_auto_hide() {
        assert_eq!(FrameClock::new(0.0, 2.0).caption_alpha(true), 1.0);
        assert_eq!(FrameClock::new(1.0, 2.0).caption_alpha(true), 1.0);
        assert_eq!(FrameClock::new(2.0, 2.0).caption_alpha(true), 0.0);
        assert_eq!(FrameClock::new(2.0, 2.0).caption_alpha(false), 1.0);
        assert_eq!(FrameClock::new(0.0, 0.0).caption_alpha(true), 0.0);
    }
}
